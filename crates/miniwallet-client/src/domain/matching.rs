//! Subset matching of event payloads.

use serde_json::{Map, Value};

use super::entities::Event;

/// Fields an event payload must contain, with equal values.
pub type MatchFields = Map<String, Value>;

/// True when every key of `query` is present in `payload` with an equal value.
///
/// Extra payload keys are ignored and an empty query matches anything. A
/// payload that is not a JSON object only matches the empty query.
pub fn is_subset_match(payload: &Value, query: &MatchFields) -> bool {
    if query.is_empty() {
        return true;
    }
    match payload.as_object() {
        Some(object) => query
            .iter()
            .all(|(key, expected)| object.get(key) == Some(expected)),
        None => false,
    }
}

/// True when the event has the given type and its decoded payload is a
/// superset of `query`. Undecodable payloads only match the empty query.
pub fn event_matches(event: &Event, event_type: &str, query: &MatchFields) -> bool {
    if event.event_type != event_type {
        return false;
    }
    if query.is_empty() {
        return true;
    }
    event
        .decoded_data()
        .is_some_and(|payload| is_subset_match(&payload, query))
}

/// Builds match fields from a `json!({...})` object; anything else yields an
/// empty query.
pub fn match_fields(value: Value) -> MatchFields {
    match value {
        Value::Object(map) => map,
        _ => MatchFields::new(),
    }
}
