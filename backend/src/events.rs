//! Backend-pushed status events
//!
//! A status event is a transient notification describing progress or failure.
//! The feed keeps only the most recent one; a new event fully replaces the
//! previous one.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Event type that routes a status event to the error channel
pub const ERROR_EVENT_TYPE: &str = "error";

/// A single status event as pushed by the backend
///
/// Every field is optional on the wire. Identity for change detection is `id`,
/// which doubles as a translation key for the message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusEvent {
    /// Event identifier, usually a message key such as `STATUS$STARTING_RUNTIME`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Free-form message text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Event type (`"error"` or anything else)
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub event_type: Option<String>,
    /// Arbitrary key-value data attached by the backend
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl StatusEvent {
    /// Create an event with an id and a message
    pub fn new(id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            message: Some(message.into()),
            ..Default::default()
        }
    }

    /// Set the event type
    pub fn with_type(mut self, event_type: impl Into<String>) -> Self {
        self.event_type = Some(event_type.into());
        self
    }

    /// Attach a metadata entry
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Whether this event belongs on the error channel
    pub fn is_error(&self) -> bool {
        self.event_type.as_deref() == Some(ERROR_EVENT_TYPE)
    }

    /// Whether the event carries nothing at all (no id, message or type)
    pub fn is_blank(&self) -> bool {
        self.id.is_none() && self.message.is_none() && self.event_type.is_none()
    }

    /// The whole event as a JSON object, for attaching to error reports
    pub fn to_metadata(&self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_with_missing_fields() {
        let event: StatusEvent = serde_json::from_str("{}").unwrap();
        assert_eq!(event, StatusEvent::default());
        assert!(event.is_blank());
        assert!(!event.is_error());
    }

    #[test]
    fn test_type_field_uses_wire_name() {
        let event: StatusEvent =
            serde_json::from_str(r#"{"id":"e1","message":"Disk full","type":"error"}"#).unwrap();
        assert!(event.is_error());
        assert_eq!(event.message.as_deref(), Some("Disk full"));

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "error");
    }

    #[test]
    fn test_non_error_types() {
        assert!(!StatusEvent::new("x", "y").with_type("info").is_error());
        assert!(!StatusEvent::new("x", "y").with_type("ERROR").is_error());
    }

    #[test]
    fn test_to_metadata_contains_event_fields() {
        let event = StatusEvent::new("e1", "Disk full")
            .with_type("error")
            .with_metadata("volume", "/dev/sda1");
        let metadata = event.to_metadata();

        assert_eq!(metadata["id"], json!("e1"));
        assert_eq!(metadata["message"], json!("Disk full"));
        assert_eq!(metadata["type"], json!("error"));
        assert_eq!(metadata["metadata"]["volume"], json!("/dev/sda1"));
    }
}
