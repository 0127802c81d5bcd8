//! Translation of validated searches into Discovery API query parameters.

use crate::{category, geohash, query::SearchQuery};
use marquee_settings::{LocationEncoding, TicketmasterSettings};

/// The largest page the Discovery API is asked for.
pub const MAX_PAGE_SIZE: usize = 50;

/// Build the query parameters for an `events.json` search.
///
/// The API key is not included, the client adds it to every request. The
/// position is encoded according to `settings.location_encoding`, and the
/// segment filter is only present when the category maps to a segment.
pub fn search_parameters(
    query: &SearchQuery,
    settings: &TicketmasterSettings,
) -> Vec<(&'static str, String)> {
    let mut params = vec![("keyword", query.keyword.clone())];

    params.push(match settings.location_encoding {
        LocationEncoding::Geohash => (
            "geoPoint",
            geohash::encode(query.latitude, query.longitude, geohash::SEARCH_PRECISION),
        ),
        LocationEncoding::LatLong => (
            "latlong",
            format!("{},{}", query.latitude, query.longitude),
        ),
    });

    params.extend([
        ("radius", query.distance.to_string()),
        ("unit", "miles".to_string()),
        ("sort", "date,asc".to_string()),
        ("size", page_size(settings.page_size).to_string()),
        // Without this, events that have no English locale are filtered out.
        ("locale", "*".to_string()),
    ]);

    if let Some(segment_id) = category::segment_id(&query.category) {
        params.push(("segmentId", segment_id.to_string()));
    }

    params
}

/// Clamp a configured page size to what the Discovery API accepts.
pub fn page_size(configured: usize) -> usize {
    configured.clamp(1, MAX_PAGE_SIZE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    fn settings(location_encoding: LocationEncoding, page_size: usize) -> TicketmasterSettings {
        TicketmasterSettings {
            base_url: "https://example.com/".to_string(),
            api_key: Some("key".to_string()),
            location_encoding,
            page_size,
            timeout: Duration::from_secs(15),
            connect_timeout: Duration::from_secs(5),
        }
    }

    fn query(category: &str) -> SearchQuery {
        SearchQuery {
            keyword: "Lakers".to_string(),
            category: category.to_string(),
            distance: 10.0,
            latitude: 34.0522,
            longitude: -118.2437,
        }
    }

    fn get<'a>(params: &'a [(&'static str, String)], name: &str) -> Option<&'a str> {
        params
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }

    #[test]
    fn geohash_encoding() {
        let params = search_parameters(&query("sports"), &settings(LocationEncoding::Geohash, 20));
        assert_eq!(
            params,
            vec![
                ("keyword", "Lakers".to_string()),
                ("geoPoint", "9q5ctr1".to_string()),
                ("radius", "10".to_string()),
                ("unit", "miles".to_string()),
                ("sort", "date,asc".to_string()),
                ("size", "20".to_string()),
                ("locale", "*".to_string()),
                ("segmentId", "KZFzniwnSyZfZ7v7nE".to_string()),
            ]
        );
    }

    #[test]
    fn lat_long_encoding() {
        let params = search_parameters(&query("sports"), &settings(LocationEncoding::LatLong, 20));
        assert_eq!(get(&params, "latlong"), Some("34.0522,-118.2437"));
        assert_eq!(get(&params, "geoPoint"), None);
    }

    #[test]
    fn default_category_has_no_filter() {
        let params = search_parameters(&query("default"), &settings(LocationEncoding::Geohash, 20));
        assert_eq!(get(&params, "segmentId"), None);
    }

    #[test]
    fn fractional_distance_is_kept() {
        let mut q = query("default");
        q.distance = 2.5;
        let params = search_parameters(&q, &settings(LocationEncoding::Geohash, 20));
        assert_eq!(get(&params, "radius"), Some("2.5"));
    }

    #[test]
    fn page_size_is_clamped() {
        assert_eq!(page_size(0), 1);
        assert_eq!(page_size(20), 20);
        assert_eq!(page_size(500), MAX_PAGE_SIZE);
        let params = search_parameters(&query("default"), &settings(LocationEncoding::Geohash, 99));
        assert_eq!(get(&params, "size"), Some("50"));
    }
}
