//! Inbound message classification.
//!
//! The protocol has no request ids; a decoded payload is either the reply to
//! the one outstanding request or, once event watching is active, a
//! compositor-pushed event. The two are told apart by a single key: event
//! envelopes carry `event`, replies never do.

use serde_json::Value;

use crate::error::{Error, Result};

/// A decoded inbound message, split into its two possible shapes.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    /// Direct reply to the request in flight.
    Reply(Value),
    /// Compositor-pushed event, unsolicited.
    Event {
        /// Event name, e.g. `command-binding`.
        event: String,
        /// The full event object, including the `event` key.
        payload: Value,
    },
}

impl Message {
    /// Classify a decoded payload by the presence of an `event` key.
    pub fn from_value(value: Value) -> Self {
        match value.get("event").and_then(Value::as_str) {
            Some(event) => Message::Event {
                event: event.to_owned(),
                payload: value,
            },
            None => Message::Reply(value),
        }
    }

    /// The event name, if this is an event.
    pub fn event(&self) -> Option<&str> {
        match self {
            Message::Event { event, .. } => Some(event),
            Message::Reply(_) => None,
        }
    }
}

/// Surface a compositor-reported failure as a typed error.
///
/// A reply with a top-level `error` key is a failed call; the value of that
/// key is the compositor's human-readable message and is carried verbatim.
pub fn into_reply(value: Value) -> Result<Value> {
    if let Some(err) = value.get("error") {
        let message = match err.as_str() {
            Some(s) => s.to_owned(),
            None => err.to_string(),
        };
        return Err(Error::Remote(message));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_reply_without_event_key() {
        let msg = Message::from_value(json!({"methods": ["a", "b"]}));

        assert_eq!(msg, Message::Reply(json!({"methods": ["a", "b"]})));
        assert_eq!(msg.event(), None);
    }

    #[test]
    fn test_event_key_classifies_as_event() {
        let msg = Message::from_value(json!({"event": "command-binding", "binding-id": 7}));

        assert_eq!(msg.event(), Some("command-binding"));
        match msg {
            Message::Event { payload, .. } => {
                assert_eq!(payload["binding-id"], json!(7));
            }
            Message::Reply(_) => panic!("expected event"),
        }
    }

    #[test]
    fn test_error_key_becomes_remote_error() {
        let err = into_reply(json!({"error": "no such view"})).unwrap_err();

        match err {
            Error::Remote(msg) => assert_eq!(msg, "no such view"),
            other => panic!("expected Remote, got {other:?}"),
        }
    }

    #[test]
    fn test_non_string_error_is_stringified() {
        let err = into_reply(json!({"error": {"code": 4}})).unwrap_err();

        match err {
            Error::Remote(msg) => assert_eq!(msg, r#"{"code":4}"#),
            other => panic!("expected Remote, got {other:?}"),
        }
    }

    #[test]
    fn test_reply_without_error_passes_through() {
        let reply = into_reply(json!({"output": {"id": 1}})).unwrap();

        assert_eq!(reply, json!({"output": {"id": 1}}));
    }
}
