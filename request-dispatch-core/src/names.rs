//! Action type names for request lifecycles
//!
//! Every declared operation gets four identifiers of the shape
//! `STORE.REQUEST.OPERATION.PHASE`, one per [`Phase`]. The whole-store reset
//! identifier is always present alongside them.
//!
//! ```
//! use request_dispatch_core::names::action_types;
//!
//! let types = action_types("USER", &["LOGIN", "SIGNUP"]);
//! assert_eq!(types.get("LOGIN").unwrap().start, "USER.REQUEST.LOGIN.START");
//! assert_eq!(types.reset_store(), "RESET_STORE");
//! ```

use std::fmt;

use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

use crate::conventions::{Conventions, ResetSentinel};

/// Literal segment separating the store name from the operation.
pub const REQUEST_SEGMENT: &str = "REQUEST";

/// Stage of an asynchronous operation's lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Start,
    Success,
    Failed,
    Reset,
}

impl Phase {
    /// All phases in declaration order.
    pub const ALL: [Phase; 4] = [Phase::Start, Phase::Success, Phase::Failed, Phase::Reset];

    /// Uppercase form used in signal identifiers.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Start => "START",
            Self::Success => "SUCCESS",
            Self::Failed => "FAILED",
            Self::Reset => "RESET",
        }
    }

    /// Title-case form used in creator names.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Start => "Start",
            Self::Success => "Success",
            Self::Failed => "Failed",
            Self::Reset => "Reset",
        }
    }

    /// Parse the uppercase form.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|phase| phase.as_str() == s)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Format a single request identifier.
pub fn request_type(store: &str, operation: &str, phase: Phase) -> String {
    format!("{}.{}.{}.{}", store, REQUEST_SEGMENT, operation, phase)
}

/// The four identifiers of one operation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct RequestNames {
    pub start: String,
    pub success: String,
    pub failed: String,
    pub reset: String,
}

impl RequestNames {
    pub fn new(store: &str, operation: &str) -> Self {
        Self {
            start: request_type(store, operation, Phase::Start),
            success: request_type(store, operation, Phase::Success),
            failed: request_type(store, operation, Phase::Failed),
            reset: request_type(store, operation, Phase::Reset),
        }
    }

    pub fn for_phase(&self, phase: Phase) -> &str {
        match phase {
            Phase::Start => &self.start,
            Phase::Success => &self.success,
            Phase::Failed => &self.failed,
            Phase::Reset => &self.reset,
        }
    }
}

/// Generated action types for a store, in declaration order.
///
/// Serializes to `{ "REQUEST": { <op>: { "START": .., .. } }, "resetStore": "RESET_STORE" }`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionTypes {
    request: Vec<(String, RequestNames)>,
    reset_sentinel: ResetSentinel,
}

impl ActionTypes {
    /// Names for one operation, by its raw name.
    pub fn get(&self, operation: &str) -> Option<&RequestNames> {
        self.request
            .iter()
            .find(|(name, _)| name == operation)
            .map(|(_, names)| names)
    }

    /// Declared operations in order.
    pub fn operations(&self) -> impl Iterator<Item = &str> {
        self.request.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RequestNames)> {
        self.request.iter().map(|(name, names)| (name.as_str(), names))
    }

    pub fn len(&self) -> usize {
        self.request.len()
    }

    pub fn is_empty(&self) -> bool {
        self.request.is_empty()
    }

    /// The whole-store reset identifier.
    pub fn reset_store(&self) -> &'static str {
        self.reset_sentinel.as_str()
    }

    pub fn reset_sentinel(&self) -> ResetSentinel {
        self.reset_sentinel
    }
}

impl Serialize for ActionTypes {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        struct Requests<'a>(&'a [(String, RequestNames)]);

        impl Serialize for Requests<'_> {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                let mut map = serializer.serialize_map(Some(self.0.len()))?;
                for (name, names) in self.0 {
                    map.serialize_entry(name, names)?;
                }
                map.end()
            }
        }

        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry(REQUEST_SEGMENT, &Requests(&self.request))?;
        map.serialize_entry(self.reset_sentinel.field_name(), self.reset_store())?;
        map.end()
    }
}

/// Insert `value` under `key`, replacing an existing entry in place.
///
/// Generated collections keep first-declaration order with one entry per key.
pub(crate) fn upsert<V>(entries: &mut Vec<(String, V)>, key: String, value: V) {
    match entries.iter_mut().find(|(existing, _)| *existing == key) {
        Some(entry) => entry.1 = value,
        None => entries.push((key, value)),
    }
}

/// Generate action types with the canonical conventions.
///
/// An empty store name or operation list yields no request types; the reset
/// identifier is still present.
pub fn action_types<S: AsRef<str>>(store: &str, operations: &[S]) -> ActionTypes {
    action_types_with(&Conventions::default(), store, operations)
}

/// Generate action types with explicit conventions.
pub fn action_types_with<S: AsRef<str>>(
    conventions: &Conventions,
    store: &str,
    operations: &[S],
) -> ActionTypes {
    let mut request = Vec::with_capacity(operations.len());
    if !store.is_empty() {
        for op in operations {
            let op = op.as_ref();
            upsert(&mut request, op.to_string(), RequestNames::new(store, op));
        }
    }

    ActionTypes {
        request,
        reset_sentinel: conventions.reset_sentinel,
    }
}
