//! Conversion of upstream JSON into the payloads served to the front-end.
//!
//! Every field of every output type is always present. Missing upstream data
//! becomes an empty string (or "N/A" for the venue card), never a missing key.
//! Normalizing is a pure function of the payload, so the same input always
//! serializes to the same bytes.

mod detail;
mod events;
mod suggest;
mod venue;

pub use self::detail::{event_detail, Artist, EventDetail};
pub use self::events::{event_summaries, EventSummary, IMAGE_TARGET_WIDTH};
pub use self::suggest::{suggestions, MAX_SUGGESTIONS};
pub use self::venue::{venue, VenueInfo, NOT_AVAILABLE};

use serde::{de::DeserializeOwned, de::Error as _};
use serde_json::Value;

/// The array found at `pointer`, if there is one.
///
/// Missing nesting and explicit nulls both count as "no entries". A value of
/// any other type is logged and also treated as empty.
fn embedded_list<'a>(payload: &'a Value, pointer: &str) -> &'a [Value] {
    match payload.pointer(pointer) {
        Some(Value::Array(entries)) => entries,
        None | Some(Value::Null) => &[],
        Some(other) => {
            tracing::warn!(
                r#type = "discovery.normalize.unexpected-type",
                %pointer,
                found = json_type(other),
                "Expected a list in the upstream response"
            );
            &[]
        }
    }
}

/// A short name of a JSON value's type, for logging.
fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Read one upstream record, which must be a JSON object.
///
/// Derived `Deserialize` impls also accept arrays and fill fields by
/// position, so the shape is checked first.
fn object_record<T: DeserializeOwned>(record: &Value) -> Result<T, serde_json::Error> {
    if !record.is_object() {
        return Err(serde_json::Error::custom(format!(
            "expected an object, found {}",
            json_type(record)
        )));
    }
    T::deserialize(record)
}
