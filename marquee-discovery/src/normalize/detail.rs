//! The event detail card.

use super::object_record;
use crate::model::{text, Event};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A performer or team appearing at an event.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artist {
    #[allow(missing_docs)]
    pub name: String,
    /// The attraction's Ticketmaster page.
    pub url: String,
}

/// Everything the detail view shows about one event.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDetail {
    #[allow(missing_docs)]
    pub id: String,
    #[allow(missing_docs)]
    pub name: String,
    /// Local start date.
    pub date: String,
    /// Local start time.
    pub time: String,
    /// Sale status code, such as "onsale".
    pub status: String,
    /// Distinct classification names, from broadest to most specific.
    pub genres: Vec<String>,
    #[allow(missing_docs)]
    pub artists: Vec<Artist>,
    /// Name of the first venue, used to look up the venue card.
    pub venue_name: String,
    /// Where tickets can be bought.
    pub buy_url: String,
    /// URL of a static seat map image.
    pub seatmap: String,
    /// "min - max currency", or empty when there is no price data.
    pub price_range: String,
}

impl From<&Event> for EventDetail {
    fn from(event: &Event) -> Self {
        let mut genres: Vec<String> = Vec::new();
        if let Some(classification) = event.first_classification() {
            for name in classification.facet_names() {
                if !genres.contains(&name) {
                    genres.push(name);
                }
            }
        }

        Self {
            id: text(&event.id),
            name: text(&event.name),
            date: text(&event.dates.start.local_date),
            time: text(&event.dates.start.local_time),
            status: text(&event.dates.status.code),
            genres,
            artists: event
                .embedded
                .attractions
                .iter()
                .map(|attraction| Artist {
                    name: text(&attraction.name),
                    url: text(&attraction.url),
                })
                .collect(),
            venue_name: event.first_venue_name(),
            buy_url: text(&event.url),
            seatmap: text(&event.seatmap.static_url),
            price_range: event
                .price_ranges
                .first()
                .and_then(|range| range.display())
                .unwrap_or_default(),
        }
    }
}

/// Extract the detail card from an `events/{id}.json` response.
///
/// # Errors
/// If the payload is not a JSON object. Individual fields never cause errors.
pub fn event_detail(payload: &Value) -> Result<EventDetail, serde_json::Error> {
    object_record::<Event>(payload).map(|event| EventDetail::from(&event))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn full_detail() {
        let payload = json!({
            "id": "vvG1",
            "name": "Lakers vs. Celtics",
            "url": "https://www.ticketmaster.com/event/vvG1",
            "dates": {
                "start": {"localDate": "2024-05-01", "localTime": "19:30:00"},
                "status": {"code": "onsale"}
            },
            "classifications": [
                {
                    "segment": {"name": "Sports"},
                    "genre": {"name": "Basketball"},
                    "subGenre": {"name": "NBA"},
                    "type": {"name": "Undefined"},
                    "subType": {"name": "Undefined"}
                },
                {"segment": {"name": "Ignored"}}
            ],
            "priceRanges": [
                {"type": "standard", "currency": "USD", "min": 25, "max": 75.5},
                {"type": "resale", "currency": "USD", "min": 300, "max": 900}
            ],
            "seatmap": {"staticUrl": "https://maps/seat.gif"},
            "_embedded": {
                "venues": [{"name": "Crypto.com Arena"}],
                "attractions": [
                    {"name": "Los Angeles Lakers", "url": "https://tm/lakers"},
                    {"name": "Boston Celtics"}
                ]
            }
        });

        assert_eq!(
            event_detail(&payload).unwrap(),
            EventDetail {
                id: "vvG1".to_string(),
                name: "Lakers vs. Celtics".to_string(),
                date: "2024-05-01".to_string(),
                time: "19:30:00".to_string(),
                status: "onsale".to_string(),
                genres: vec![
                    "Sports".to_string(),
                    "Basketball".to_string(),
                    "NBA".to_string(),
                    "Undefined".to_string(),
                ],
                artists: vec![
                    Artist {
                        name: "Los Angeles Lakers".to_string(),
                        url: "https://tm/lakers".to_string(),
                    },
                    Artist {
                        name: "Boston Celtics".to_string(),
                        url: "".to_string(),
                    },
                ],
                venue_name: "Crypto.com Arena".to_string(),
                buy_url: "https://www.ticketmaster.com/event/vvG1".to_string(),
                seatmap: "https://maps/seat.gif".to_string(),
                price_range: "25 - 75.5 USD".to_string(),
            }
        );
    }

    #[test]
    fn identical_facets_appear_once() {
        let payload = json!({
            "classifications": [{
                "segment": {"name": "Music"},
                "genre": {"name": "Music"},
                "subGenre": {"name": ""},
                "type": {"name": "Music"}
            }]
        });
        assert_eq!(event_detail(&payload).unwrap().genres, vec!["Music"]);
    }

    #[test]
    fn empty_event_has_every_field() {
        let detail = event_detail(&json!({})).unwrap();
        assert_eq!(detail, EventDetail::default());

        let serialized = serde_json::to_value(&detail).unwrap();
        let keys: Vec<_> = serialized.as_object().unwrap().keys().cloned().collect();
        for key in [
            "id",
            "name",
            "date",
            "time",
            "status",
            "genres",
            "artists",
            "venueName",
            "buyUrl",
            "seatmap",
            "priceRange",
        ] {
            assert!(keys.contains(&key.to_string()), "missing key {}", key);
        }
        assert_eq!(serialized["priceRange"], json!(""));
    }

    #[test]
    fn price_needs_both_bounds() {
        let payload = json!({"priceRanges": [{"currency": "USD", "min": 10}]});
        assert_eq!(event_detail(&payload).unwrap().price_range, "");
    }

    #[test]
    fn whole_number_prices_have_no_decimals() {
        let payload = json!({"priceRanges": [{"currency": "EUR", "min": 30.0, "max": 120.50}]});
        assert_eq!(event_detail(&payload).unwrap().price_range, "30 - 120.5 EUR");
    }

    #[test]
    fn non_object_payload_is_an_error() {
        assert!(event_detail(&json!(["vvG1"])).is_err());
        assert!(event_detail(&Value::Null).is_err());
    }
}
