//! Lenient models of the Discovery API's JSON.
//!
//! Every field is optional, and every field tolerates values of the wrong
//! type by falling back to its default. Upstream records are often partially
//! populated, and one odd field should never cost us the rest of a record.
//! The accessor methods here are the only place that decides what "missing"
//! turns into, so the normalizers don't repeat that logic.

use serde::Deserialize;
use serde_with::{serde_as, DefaultOnError};

/// Shorthand for the text of an optional field, or an empty string.
pub(crate) fn text(value: &Option<String>) -> String {
    value.as_deref().map(str::trim).unwrap_or_default().to_string()
}

/// The text of an optional field, or `fallback` if it is missing or blank.
pub(crate) fn text_or(value: &Option<String>, fallback: &str) -> String {
    match value.as_deref().map(str::trim) {
        Some(value) if !value.is_empty() => value.to_string(),
        _ => fallback.to_string(),
    }
}

/// An event, from either the search results or the event lookup.
#[serde_as]
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Event {
    #[allow(missing_docs)]
    #[serde_as(deserialize_as = "DefaultOnError")]
    pub id: Option<String>,

    #[allow(missing_docs)]
    #[serde_as(deserialize_as = "DefaultOnError")]
    pub name: Option<String>,

    /// Where tickets can be bought.
    #[serde_as(deserialize_as = "DefaultOnError")]
    pub url: Option<String>,

    #[allow(missing_docs)]
    #[serde_as(deserialize_as = "DefaultOnError")]
    pub dates: Dates,

    /// Variants of the same promotional image, in different sizes.
    #[serde_as(deserialize_as = "DefaultOnError<Vec<DefaultOnError>>")]
    pub images: Vec<Image>,

    #[allow(missing_docs)]
    #[serde_as(deserialize_as = "DefaultOnError<Vec<DefaultOnError>>")]
    pub classifications: Vec<Classification>,

    #[allow(missing_docs)]
    #[serde_as(deserialize_as = "DefaultOnError<Vec<DefaultOnError>>")]
    pub price_ranges: Vec<PriceRange>,

    #[allow(missing_docs)]
    #[serde_as(deserialize_as = "DefaultOnError")]
    pub seatmap: Seatmap,

    /// Related venues and attractions.
    #[serde(rename = "_embedded")]
    #[serde_as(deserialize_as = "DefaultOnError")]
    pub embedded: EventEmbedded,
}

impl Event {
    /// The first venue the event is held at.
    pub fn first_venue(&self) -> Option<&Venue> {
        self.embedded.venues.first()
    }

    /// The name of the first venue, or an empty string.
    pub fn first_venue_name(&self) -> String {
        self.first_venue()
            .map(|venue| text(&venue.name))
            .unwrap_or_default()
    }

    /// The primary classification of the event.
    pub fn first_classification(&self) -> Option<&Classification> {
        self.classifications.first()
    }

    /// The name of the primary classification's segment, such as "Music".
    pub fn segment_name(&self) -> String {
        self.first_classification()
            .map(|classification| text(&classification.segment.name))
            .unwrap_or_default()
    }

    /// The local date and time of the start of the event, separated by a
    /// space. Missing parts are left out, along with their separator.
    pub fn local_date_time(&self) -> String {
        let start = &self.dates.start;
        [text(&start.local_date), text(&start.local_time)]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// The URL of the image whose width is closest to `target`, or an empty
    /// string.
    pub fn image_closest_to(&self, target: f64) -> String {
        closest_image(&self.images, target)
            .map(|image| text(&image.url))
            .unwrap_or_default()
    }
}

/// Pick the image with a width closest to `target`.
///
/// Images without a width are never closer than any image with one. On ties
/// the earliest image wins.
pub fn closest_image(images: &[Image], target: f64) -> Option<&Image> {
    let distance = |image: &Image| {
        image
            .width
            .filter(|w| w.is_finite())
            .map_or(f64::INFINITY, |width| (width - target).abs())
    };

    images.iter().fold(None, |best, image| match best {
        Some(current) if distance(current) <= distance(image) => Some(current),
        _ => Some(image),
    })
}

#[allow(missing_docs)]
#[serde_as]
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct Dates {
    #[serde_as(deserialize_as = "DefaultOnError")]
    pub start: Start,
    #[serde_as(deserialize_as = "DefaultOnError")]
    pub status: Status,
}

#[allow(missing_docs)]
#[serde_as]
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Start {
    #[serde_as(deserialize_as = "DefaultOnError")]
    pub local_date: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    pub local_time: Option<String>,
}

/// The sale status of an event.
#[serde_as]
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct Status {
    /// A code such as "onsale", "offsale", or "cancelled".
    #[serde_as(deserialize_as = "DefaultOnError")]
    pub code: Option<String>,
}

#[allow(missing_docs)]
#[serde_as]
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Image {
    #[serde_as(deserialize_as = "DefaultOnError")]
    pub url: Option<String>,
    /// Width in pixels.
    #[serde_as(deserialize_as = "DefaultOnError")]
    pub width: Option<f64>,
}

/// One entry of the upstream taxonomy. Each facet is progressively more
/// specific.
#[allow(missing_docs)]
#[serde_as]
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Classification {
    #[serde_as(deserialize_as = "DefaultOnError")]
    pub segment: Named,
    #[serde_as(deserialize_as = "DefaultOnError")]
    pub genre: Named,
    #[serde_as(deserialize_as = "DefaultOnError")]
    pub sub_genre: Named,
    #[serde(rename = "type")]
    #[serde_as(deserialize_as = "DefaultOnError")]
    pub kind: Named,
    #[serde_as(deserialize_as = "DefaultOnError")]
    pub sub_type: Named,
}

impl Classification {
    /// The facet names from segment to sub-type, skipping blank ones.
    ///
    /// The upstream uses "Undefined" as a facet name too. It is kept, since
    /// it is what the upstream says.
    pub fn facet_names(&self) -> impl Iterator<Item = String> + '_ {
        [
            &self.segment,
            &self.genre,
            &self.sub_genre,
            &self.kind,
            &self.sub_type,
        ]
        .into_iter()
        .map(|facet| text(&facet.name))
        .filter(|name| !name.is_empty())
    }
}

/// Any upstream object that is only interesting for its name.
#[serde_as]
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct Named {
    #[allow(missing_docs)]
    #[serde_as(deserialize_as = "DefaultOnError")]
    pub name: Option<String>,
}

#[allow(missing_docs)]
#[serde_as]
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct PriceRange {
    #[serde_as(deserialize_as = "DefaultOnError")]
    pub min: Option<f64>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    pub max: Option<f64>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    pub currency: Option<String>,
}

impl PriceRange {
    /// Format as `"<min> - <max> <currency>"`. Numbers are written without
    /// trailing zeros, so 25.0 is "25". `None` unless both bounds are present.
    pub fn display(&self) -> Option<String> {
        let (min, max) = (self.min?, self.max?);
        Some(
            format!("{} - {} {}", min, max, text(&self.currency))
                .trim()
                .to_string(),
        )
    }
}

#[allow(missing_docs)]
#[serde_as]
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Seatmap {
    #[serde_as(deserialize_as = "DefaultOnError")]
    pub static_url: Option<String>,
}

/// The `_embedded` object of an event.
#[allow(missing_docs)]
#[serde_as]
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct EventEmbedded {
    #[serde_as(deserialize_as = "DefaultOnError<Vec<DefaultOnError>>")]
    pub venues: Vec<Venue>,
    #[serde_as(deserialize_as = "DefaultOnError<Vec<DefaultOnError>>")]
    pub attractions: Vec<Attraction>,
}

#[allow(missing_docs)]
#[serde_as]
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Venue {
    #[serde_as(deserialize_as = "DefaultOnError")]
    pub name: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    pub url: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    pub postal_code: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    pub address: Address,
    #[serde_as(deserialize_as = "DefaultOnError")]
    pub city: Named,
    #[serde_as(deserialize_as = "DefaultOnError")]
    pub state: State,
    #[serde_as(deserialize_as = "DefaultOnError<Vec<DefaultOnError>>")]
    pub images: Vec<Image>,
}

#[allow(missing_docs)]
#[serde_as]
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct Address {
    #[serde_as(deserialize_as = "DefaultOnError")]
    pub line1: Option<String>,
}

#[allow(missing_docs)]
#[serde_as]
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct State {
    #[serde_as(deserialize_as = "DefaultOnError")]
    pub state_code: Option<String>,
}

/// A performer, team, or other act appearing at an event.
#[allow(missing_docs)]
#[serde_as]
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct Attraction {
    #[serde_as(deserialize_as = "DefaultOnError")]
    pub name: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    pub url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn image(width: Option<f64>, url: &str) -> Image {
        Image {
            url: Some(url.to_string()),
            width,
        }
    }

    #[test]
    fn closest_image_by_width() {
        let images = vec![
            image(Some(100.0), "a"),
            image(Some(180.0), "b"),
            image(Some(400.0), "c"),
        ];
        assert_eq!(closest_image(&images, 200.0), Some(&images[1]));
    }

    #[test]
    fn closest_image_ties_keep_first() {
        let images = vec![image(Some(150.0), "a"), image(Some(250.0), "b")];
        assert_eq!(closest_image(&images, 200.0), Some(&images[0]));
    }

    #[test]
    fn widthless_images_lose() {
        let images = vec![image(None, "a"), image(Some(2048.0), "b")];
        assert_eq!(closest_image(&images, 200.0), Some(&images[1]));

        let only = vec![image(None, "a"), image(None, "b")];
        assert_eq!(closest_image(&only, 200.0), Some(&only[0]));
        assert_eq!(closest_image(&[], 200.0), None);
    }

    #[test]
    fn wrongly_typed_fields_default() {
        let event: Event = serde_json::from_value(json!({
            "id": 12,
            "name": "Show",
            "dates": "tomorrow",
            "images": [{"url": "x", "width": "wide"}, 7],
            "_embedded": {"venues": {"name": "not a list"}},
        }))
        .unwrap();

        assert_eq!(event.id, None);
        assert_eq!(event.name.as_deref(), Some("Show"));
        assert_eq!(event.local_date_time(), "");
        assert_eq!(event.images.len(), 2);
        assert_eq!(event.images[0].width, None);
        assert_eq!(event.first_venue_name(), "");
    }

    #[test]
    fn date_time_joining() {
        let event: Event = serde_json::from_value(json!({
            "dates": {"start": {"localDate": "2024-05-01", "localTime": "19:30:00"}}
        }))
        .unwrap();
        assert_eq!(event.local_date_time(), "2024-05-01 19:30:00");

        let event: Event = serde_json::from_value(json!({
            "dates": {"start": {"localTime": "19:30:00"}}
        }))
        .unwrap();
        assert_eq!(event.local_date_time(), "19:30:00");
    }

    #[test]
    fn price_range_display() {
        let range = PriceRange {
            min: Some(25.0),
            max: Some(75.5),
            currency: Some("USD".to_string()),
        };
        assert_eq!(range.display().as_deref(), Some("25 - 75.5 USD"));

        let no_currency = PriceRange {
            currency: None,
            ..range.clone()
        };
        assert_eq!(no_currency.display().as_deref(), Some("25 - 75.5"));

        let open_ended = PriceRange {
            max: None,
            ..range
        };
        assert_eq!(open_ended.display(), None);
    }

    #[test]
    fn text_fallbacks() {
        assert_eq!(text(&None), "");
        assert_eq!(text(&Some(" a ".to_string())), "a");
        assert_eq!(text_or(&Some("  ".to_string()), "N/A"), "N/A");
        assert_eq!(text_or(&Some("Forum".to_string()), "N/A"), "Forum");
    }
}
