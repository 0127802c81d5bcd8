//! The venue card.

use super::{embedded_list, object_record};
use crate::model::{text, text_or, Venue};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Shown in place of venue details the upstream does not have.
pub const NOT_AVAILABLE: &str = "N/A";

/// What the venue card shows about a venue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VenueInfo {
    #[allow(missing_docs)]
    pub name: String,
    /// The first line of the street address.
    pub address: String,
    #[allow(missing_docs)]
    pub city: String,
    /// The state or province code, such as "CA".
    pub state: String,
    #[allow(missing_docs)]
    pub postal_code: String,
    /// The venue's Ticketmaster page, or empty.
    pub url: String,
    /// URL of the venue's first image, or empty.
    pub image: String,
}

impl From<&Venue> for VenueInfo {
    fn from(venue: &Venue) -> Self {
        Self {
            name: text_or(&venue.name, NOT_AVAILABLE),
            address: text_or(&venue.address.line1, NOT_AVAILABLE),
            city: text_or(&venue.city.name, NOT_AVAILABLE),
            state: text_or(&venue.state.state_code, NOT_AVAILABLE),
            postal_code: text_or(&venue.postal_code, NOT_AVAILABLE),
            url: text(&venue.url),
            image: venue
                .images
                .first()
                .map(|image| text(&image.url))
                .unwrap_or_default(),
        }
    }
}

/// The first venue of a `venues.json` response.
///
/// `None` when the search found no venues, which is a normal outcome and not
/// an error.
pub fn venue(payload: &Value) -> Option<VenueInfo> {
    let first = embedded_list(payload, "/_embedded/venues").first()?;
    match object_record::<Venue>(first) {
        Ok(venue) => Some(VenueInfo::from(&venue)),
        Err(error) => {
            tracing::warn!(
                r#type = "discovery.normalize.skipped-venue",
                %error,
                "Upstream venue is unreadable"
            );
            None
        }
    }
}
