//! The rows of the search results table.

use super::{embedded_list, json_type, object_record};
use crate::model::{text, Event};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The image width, in pixels, that the results table displays.
pub const IMAGE_TARGET_WIDTH: f64 = 200.0;

/// One row of the search results.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventSummary {
    /// The upstream event id, used to look up details.
    pub id: String,
    /// The event's display name.
    pub event: String,
    /// Local start date, followed by the local start time if known.
    pub date: String,
    /// Name of the first venue.
    pub venue: String,
    /// The event's top level classification, such as "Music".
    pub genre: String,
    /// URL of the image closest to [`IMAGE_TARGET_WIDTH`].
    pub icon: String,
}

impl From<&Event> for EventSummary {
    fn from(event: &Event) -> Self {
        Self {
            id: text(&event.id),
            event: text(&event.name),
            date: event.local_date_time(),
            venue: event.first_venue_name(),
            genre: event.segment_name(),
            icon: event.image_closest_to(IMAGE_TARGET_WIDTH),
        }
    }
}

/// Summarize the events of an `events.json` search response, in upstream order.
///
/// A response without `_embedded.events` has no results. Records that are not
/// objects at all are skipped.
pub fn event_summaries(payload: &Value) -> Vec<EventSummary> {
    embedded_list(payload, "/_embedded/events")
        .iter()
        .enumerate()
        .filter_map(|(index, record)| match object_record::<Event>(record) {
            Ok(event) => Some(EventSummary::from(&event)),
            Err(error) => {
                tracing::warn!(
                    r#type = "discovery.normalize.skipped-event",
                    index,
                    found = json_type(record),
                    %error,
                    "Skipping unreadable event record"
                );
                None
            }
        })
        .collect()
}
