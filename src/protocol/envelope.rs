//! Request envelope construction.

use serde::Serialize;
use serde_json::{json, Map, Value};

/// One outbound request: a slash-delimited method name plus method-specific
/// data fields.
///
/// Built fresh per call and serialized compact; the compositor reads nothing
/// beyond these two keys.
///
/// # Example
///
/// ```
/// use wayfire_ipc::protocol::Envelope;
///
/// let envelope = Envelope::new("window-rules/focus-view").with("id", 42);
/// let json = serde_json::to_string(&envelope).unwrap();
/// assert_eq!(json, r#"{"method":"window-rules/focus-view","data":{"id":42}}"#);
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct Envelope {
    /// Namespaced method identifier, e.g. `window-rules/list-views`.
    pub method: String,
    /// Method-specific fields.
    pub data: Map<String, Value>,
}

impl Envelope {
    /// Create an envelope with empty data.
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            data: Map::new(),
        }
    }

    /// Create an envelope carrying a prebuilt data mapping.
    pub fn with_data(method: impl Into<String>, data: Map<String, Value>) -> Self {
        Self {
            method: method.into(),
            data,
        }
    }

    /// Set a data field, consuming and returning the envelope.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    /// Set a data field in place.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.data.insert(key.into(), value.into());
    }
}

/// Build a `{x, y, width, height}` geometry object.
pub fn geometry(x: i32, y: i32, width: i32, height: i32) -> Value {
    json!({
        "x": x,
        "y": y,
        "width": width,
        "height": height,
    })
}
