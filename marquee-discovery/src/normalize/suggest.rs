//! Keyword autocompletion from attraction names.

use super::embedded_list;
use serde_json::Value;

/// The most suggestions returned for one keyword.
pub const MAX_SUGGESTIONS: usize = 10;

/// Attraction names from a `suggest.json` response, in upstream order.
pub fn suggestions(payload: &Value) -> Vec<String> {
    embedded_list(payload, "/_embedded/attractions")
        .iter()
        .filter_map(|attraction| attraction.get("name").and_then(Value::as_str))
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .take(MAX_SUGGESTIONS)
        .map(ToString::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn names_are_collected() {
        let payload = json!({"_embedded": {
            "attractions": [{"name": "Taylor Swift"}, {"name": " "}, {"id": 3}, {"name": "Tay-K"}],
            "venues": [{"name": "Not an attraction"}]
        }});
        assert_eq!(suggestions(&payload), vec!["Taylor Swift", "Tay-K"]);
    }

    #[test]
    fn at_most_ten() {
        let attractions: Vec<_> = (0..15).map(|i| json!({"name": format!("Act {}", i)})).collect();
        let payload = json!({"_embedded": {"attractions": attractions}});
        let names = suggestions(&payload);
        assert_eq!(names.len(), MAX_SUGGESTIONS);
        assert_eq!(names[9], "Act 9");
    }

    #[test]
    fn empty_response() {
        assert!(suggestions(&json!({})).is_empty());
    }
}
