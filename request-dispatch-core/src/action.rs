//! Signals: the action records dispatched through a request-aware reducer

use std::fmt::Debug;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::path::get_path;

/// Marker trait for actions that can be dispatched to a store
///
/// Actions represent intents to change state. They should be:
/// - Clone: Actions may be logged, replayed, or sent to multiple handlers
/// - Debug: For debugging and logging
/// - Send + 'static: For dispatch across threads
pub trait Action: Clone + Debug + Send + 'static {
    /// Get the action name for logging and filtering
    fn name(&self) -> &str;
}

/// One-line description of an action for logs
pub trait ActionSummary: Action {
    fn summary(&self) -> String {
        format!("{:?}", self)
    }
}

/// A plain action record: a `type` plus optional `payload` and `error` flag.
///
/// Serializes to the conventional wire shape:
///
/// ```
/// use request_dispatch_core::Signal;
/// use serde_json::json;
///
/// let signal = Signal::new("USER.REQUEST.LOGIN.FAILED").with_error(json!({ "status": 401 }));
/// assert_eq!(
///     serde_json::to_value(&signal).unwrap(),
///     json!({ "type": "USER.REQUEST.LOGIN.FAILED", "payload": { "status": 401 }, "error": true })
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub error: bool,
}

impl Signal {
    /// Create a signal carrying only a type.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            payload: None,
            error: false,
        }
    }

    /// Attach a payload.
    pub fn with_payload(mut self, payload: Value) -> Self {
        self.payload = Some(payload);
        self
    }

    /// Attach a payload and mark the signal as an error.
    pub fn with_error(mut self, payload: Value) -> Self {
        self.payload = Some(payload);
        self.error = true;
        self
    }

    /// The signal type string.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Look up a nested value below `payload`.
    pub fn payload_at<S: AsRef<str>>(&self, segments: &[S]) -> Option<&Value> {
        self.payload
            .as_ref()
            .and_then(|payload| get_path(payload, segments))
    }
}

impl Action for Signal {
    fn name(&self) -> &str {
        &self.kind
    }
}

impl ActionSummary for Signal {
    fn summary(&self) -> String {
        match (&self.payload, self.error) {
            (None, _) => self.kind.clone(),
            (Some(payload), false) => format!("{} {}", self.kind, payload),
            (Some(payload), true) => format!("{} error={}", self.kind, payload),
        }
    }
}
