//! Human readable rendering of bodies and events for logs.

use serde_json::Value;

use super::entities::Event;

/// Renders a response body for a log record.
///
/// - JSON object: one `key: value` line per entry (server error stack traces
///   come back as objects and read better this way)
/// - any other JSON value: indented JSON
/// - not JSON: the text unchanged
pub fn render_body(text: &str) -> String {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(object)) => object
            .iter()
            .map(|(key, value)| format!("{}: {}", key, display_value(value)))
            .collect::<Vec<_>>()
            .join("\n"),
        Ok(other) => serde_json::to_string_pretty(&other).unwrap_or_else(|_| text.to_string()),
        Err(_) => text.to_string(),
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// The event as a JSON object with `data` decoded when it holds valid JSON.
pub fn event_as_value(event: &Event) -> Value {
    let mut value = serde_json::json!({
        "account_id": event.account_id,
        "type": event.event_type,
        "data": event.data,
        "timestamp": event.timestamp,
    });
    if let Some(decoded) = event.decoded_data() {
        value["data"] = decoded;
    }
    value
}

/// Indented JSON array of the events, payloads decoded where possible.
pub fn dump_events(events: &[Event]) -> String {
    let values: Vec<Value> = events.iter().map(event_as_value).collect();
    serde_json::to_string_pretty(&values).unwrap_or_default()
}
