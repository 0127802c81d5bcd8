//! Validation of event search input.

use crate::error::ValidationError;
use serde::Deserialize;

/// The category used when the client does not ask for one. It applies no filter.
pub const DEFAULT_CATEGORY: &str = "default";

/// The search radius, in miles, used when the client does not ask for one.
pub const DEFAULT_DISTANCE: f64 = 10.0;

/// Search parameters exactly as they arrive in the query string.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct RawSearchQuery {
    /// The search keyword.
    pub keyword: Option<String>,
    /// The search radius in miles.
    pub distance: Option<String>,
    /// A front-end category name, such as "music".
    pub category: Option<String>,
    /// Latitude in degrees.
    pub lat: Option<String>,
    /// Longitude in degrees.
    pub lon: Option<String>,
}

/// A validated event search. Constructed per request through
/// [`SearchQuery::validate`].
#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    /// The search keyword, trimmed and never empty.
    pub keyword: String,
    /// The lower-cased category name.
    pub category: String,
    /// The search radius in miles. Always finite and positive.
    pub distance: f64,
    /// Latitude in degrees, within -90 to 90.
    pub latitude: f64,
    /// Longitude in degrees, within -180 to 180.
    pub longitude: f64,
}

impl SearchQuery {
    /// Validate raw query string values.
    ///
    /// Blank values are treated the same as missing ones. Fields are checked
    /// in order: keyword, position, then distance.
    ///
    /// # Errors
    /// A [`ValidationError`] naming the first field that is unusable.
    pub fn validate(raw: &RawSearchQuery) -> Result<Self, ValidationError> {
        let keyword = present(&raw.keyword).ok_or(ValidationError::MissingKeyword)?;

        let (latitude, longitude) = position(&raw.lat, &raw.lon)?;

        let distance = match present(&raw.distance) {
            None => DEFAULT_DISTANCE,
            Some(distance) => distance
                .parse::<f64>()
                .ok()
                .filter(|d| d.is_finite() && *d > 0.0)
                .ok_or(ValidationError::InvalidDistance)?,
        };

        let category = present(&raw.category)
            .unwrap_or(DEFAULT_CATEGORY)
            .to_lowercase();

        Ok(Self {
            keyword: keyword.to_string(),
            category,
            distance,
            latitude,
            longitude,
        })
    }
}

/// Validate a latitude and longitude given as query string values.
///
/// # Errors
/// [`ValidationError::MissingPosition`] if either is missing or blank, and
/// [`ValidationError::InvalidPosition`] if either is not a number of degrees
/// within range.
pub fn position(lat: &Option<String>, lon: &Option<String>) -> Result<(f64, f64), ValidationError> {
    match (present(lat), present(lon)) {
        (Some(lat), Some(lon)) => Ok((parse_degrees(lat, 90.0)?, parse_degrees(lon, 180.0)?)),
        _ => Err(ValidationError::MissingPosition),
    }
}

/// The trimmed value, if there is a non-blank one.
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Parse a coordinate and check it is within `-limit..=limit` degrees.
fn parse_degrees(value: &str, limit: f64) -> Result<f64, ValidationError> {
    value
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && v.abs() <= limit)
        .ok_or(ValidationError::InvalidPosition)
}

#[cfg(test)]
mod tests {
    use super::*;
    use parameterized::parameterized;
    use pretty_assertions::assert_eq;

    fn raw(keyword: &str, distance: &str, category: &str, lat: &str, lon: &str) -> RawSearchQuery {
        let opt = |s: &str| (!s.is_empty()).then(|| s.to_string());
        RawSearchQuery {
            keyword: opt(keyword),
            distance: opt(distance),
            category: opt(category),
            lat: opt(lat),
            lon: opt(lon),
        }
    }

    #[test]
    fn full_query_is_accepted() {
        let query = SearchQuery::validate(&raw(" Taylor Swift ", "25", "Music", "34.05", "-118.24"))
            .expect("query should be valid");
        assert_eq!(
            query,
            SearchQuery {
                keyword: "Taylor Swift".to_string(),
                category: "music".to_string(),
                distance: 25.0,
                latitude: 34.05,
                longitude: -118.24,
            }
        );
    }

    #[test]
    fn defaults_fill_optional_fields() {
        let query = SearchQuery::validate(&raw("jazz", "", "", "1", "2")).unwrap();
        assert_eq!(query.distance, DEFAULT_DISTANCE);
        assert_eq!(query.category, DEFAULT_CATEGORY);
    }

    #[parameterized(keyword = { "", "   " })]
    fn blank_keyword_is_rejected(keyword: &str) {
        assert_eq!(
            SearchQuery::validate(&raw(keyword, "10", "", "1", "2")),
            Err(ValidationError::MissingKeyword)
        );
    }

    #[test]
    fn keyword_is_checked_before_position() {
        assert_eq!(
            SearchQuery::validate(&RawSearchQuery::default()),
            Err(ValidationError::MissingKeyword)
        );
    }

    #[parameterized(lat = { "", "34", "" }, lon = { "", "", "-118" })]
    fn missing_position_is_rejected(lat: &str, lon: &str) {
        assert_eq!(
            SearchQuery::validate(&raw("jazz", "", "", lat, lon)),
            Err(ValidationError::MissingPosition)
        );
    }

    #[parameterized(lat = { "north", "91", "NaN", "10" }, lon = { "0", "0", "0", "-180.5" })]
    fn invalid_position_is_rejected(lat: &str, lon: &str) {
        assert_eq!(
            SearchQuery::validate(&raw("jazz", "", "", lat, lon)),
            Err(ValidationError::InvalidPosition)
        );
    }

    #[parameterized(distance = { "far", "0", "-5", "inf" })]
    fn invalid_distance_is_rejected(distance: &str) {
        assert_eq!(
            SearchQuery::validate(&raw("jazz", distance, "", "1", "2")),
            Err(ValidationError::InvalidDistance)
        );
    }

    #[test]
    fn position_alone() {
        let some = |s: &str| Some(s.to_string());
        assert_eq!(position(&some(" 34.05 "), &some("-118.24")), Ok((34.05, -118.24)));
        assert_eq!(position(&some("34"), &None), Err(ValidationError::MissingPosition));
        assert_eq!(
            position(&some("34"), &some("west")),
            Err(ValidationError::InvalidPosition)
        );
    }

    #[test]
    fn boundary_coordinates_are_valid() {
        let query = SearchQuery::validate(&raw("jazz", "1.5", "", "-90", "180")).unwrap();
        assert_eq!((query.latitude, query.longitude), (-90.0, 180.0));
        assert_eq!(query.distance, 1.5);
    }
}
