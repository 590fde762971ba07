//! Request-aware reducer wrapper
//!
//! [`enhance_reducer`] sits in front of a store's own reducer. For each
//! signal it evaluates, in order:
//!
//! 1. **Request lifecycle**: a type of the shape `<STORE>.REQUEST.<OP>.<PHASE>`
//!    whose store segment matches replaces `requests.<OP>` with a fresh
//!    [`RequestStatus`].
//! 2. **Store reset**: the reset sentinel returns a copy of the default state
//!    and skips the fallback reducer.
//! 3. **Fallthrough**: the fallback reducer receives the state, already
//!    updated by step 1 if it applied.
//!
//! Lifecycle signals therefore reach the fallback reducer too, so a store can
//! react to `SUCCESS` (e.g. to keep a token) while the status is tracked here.
//!
//! ```
//! use request_dispatch_core::{enhance_reducer, Signal};
//! use serde_json::json;
//!
//! let next = enhance_reducer(
//!     "USER",
//!     json!({}),
//!     &Signal::new("USER.REQUEST.LOGIN.START"),
//!     &json!({}),
//!     |state, _| state,
//! )
//! .unwrap();
//! assert_eq!(next, json!({ "requests": { "LOGIN": { "loading": true, "failed": false } } }));
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::action::Signal;
use crate::conventions::{Conventions, ErrorPath};
use crate::names::{Phase, REQUEST_SEGMENT};
use crate::path::is_truthy;

/// Key of the request status map inside a state slice.
pub const REQUESTS_KEY: &str = "requests";

/// Failure marker of a request: a plain flag or a decoded error body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Failure {
    Flag(bool),
    Error(Value),
}

impl Failure {
    pub fn is_failed(&self) -> bool {
        match self {
            Self::Flag(failed) => *failed,
            Self::Error(_) => true,
        }
    }

    /// The decoded error body, if the failure carried one.
    pub fn error(&self) -> Option<&Value> {
        match self {
            Self::Flag(_) => None,
            Self::Error(error) => Some(error),
        }
    }
}

impl Default for Failure {
    fn default() -> Self {
        Self::Flag(false)
    }
}

impl From<&Failure> for Value {
    fn from(failure: &Failure) -> Self {
        match failure {
            Failure::Flag(failed) => Value::Bool(*failed),
            Failure::Error(error) => error.clone(),
        }
    }
}

/// Loading/failure state of one operation
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestStatus {
    pub loading: bool,
    pub failed: Failure,
}

impl RequestStatus {
    /// Neither loading nor failed.
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn is_failed(&self) -> bool {
        self.failed.is_failed()
    }
}

impl From<&RequestStatus> for Value {
    fn from(status: &RequestStatus) -> Self {
        let mut map = Map::new();
        map.insert("loading".to_string(), Value::Bool(status.loading));
        map.insert("failed".to_string(), Value::from(&status.failed));
        Value::Object(map)
    }
}

/// Errors raised while reducing a signal
#[derive(Debug)]
pub enum ReduceError {
    /// The error text carried by a lifecycle signal is not valid JSON.
    MalformedErrorPayload {
        signal_type: String,
        path: &'static str,
        source: serde_json::Error,
    },
}

impl fmt::Display for ReduceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReduceError::MalformedErrorPayload {
                signal_type,
                path,
                source,
            } => write!(
                f,
                "Malformed error payload at {} on {}: {}",
                path, signal_type, source
            ),
        }
    }
}

impl std::error::Error for ReduceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ReduceError::MalformedErrorPayload { source, .. } => Some(source),
        }
    }
}

/// The segments of a request lifecycle signal type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestMatch<'a> {
    pub store: &'a str,
    pub operation: &'a str,
    pub phase: &'a str,
}

impl RequestMatch<'_> {
    /// The phase, if it is one of the four known ones.
    pub fn known_phase(&self) -> Option<Phase> {
        Phase::parse(self.phase)
    }
}

/// Split `<STORE>.REQUEST.<OP>.<PHASE>` into its parts.
///
/// The phase is everything after the last dot and the store is everything
/// before the last `.REQUEST.` that precedes it, so both store names and
/// operations may themselves contain dots.
pub fn parse_request_type(signal_type: &str) -> Option<RequestMatch<'_>> {
    let (head, phase) = signal_type.rsplit_once('.')?;
    let marker = format!(".{}.", REQUEST_SEGMENT);
    let idx = head.rfind(&marker)?;
    Some(RequestMatch {
        store: &head[..idx],
        operation: &head[idx + marker.len()..],
        phase,
    })
}

/// Run the request-aware reducer with the canonical conventions.
pub fn enhance_reducer<F>(
    store: &str,
    state: Value,
    signal: &Signal,
    default_state: &Value,
    fallback: F,
) -> Result<Value, ReduceError>
where
    F: FnOnce(Value, &Signal) -> Value,
{
    enhance_reducer_with(
        &Conventions::default(),
        store,
        state,
        signal,
        default_state,
        fallback,
    )
}

/// Run the request-aware reducer with explicit conventions.
///
/// `state` is consumed and a new state returned. On error the input state is
/// dropped; callers that need it afterwards should pass a clone.
pub fn enhance_reducer_with<F>(
    conventions: &Conventions,
    store: &str,
    state: Value,
    signal: &Signal,
    default_state: &Value,
    fallback: F,
) -> Result<Value, ReduceError>
where
    F: FnOnce(Value, &Signal) -> Value,
{
    let mut state = state;

    if let Some(request) = parse_request_type(&signal.kind).filter(|m| m.store == store) {
        let failed = match decode_error(conventions.error_path, signal)? {
            Some(error) if is_truthy(&error) => Failure::Error(error),
            _ => Failure::Flag(request.phase == Phase::Failed.as_str()),
        };
        let status = RequestStatus {
            loading: request.phase == Phase::Start.as_str(),
            failed,
        };
        tracing::debug!(
            store = %store,
            operation = %request.operation,
            phase = %request.phase,
            loading = status.loading,
            failed = status.is_failed(),
            "Request status updated"
        );
        state = with_request_status(state, request.operation, &status);
    }

    if signal.kind == conventions.reset_sentinel.as_str() {
        tracing::debug!(store = %store, "Store reset to default state");
        return Ok(default_state.clone());
    }

    Ok(fallback(state, signal))
}

/// Decode the serialized error body of a signal, if it carries one.
///
/// Only non-empty strings are decoded; any other value at the path is ignored.
pub fn decode_error(path: ErrorPath, signal: &Signal) -> Result<Option<Value>, ReduceError> {
    let text = match signal.payload_at(path.segments()) {
        Some(Value::String(text)) if !text.is_empty() => text,
        _ => return Ok(None),
    };

    serde_json::from_str(text).map(Some).map_err(|source| {
        tracing::warn!(
            signal = %signal.kind,
            path = path.display_path(),
            error = %source,
            "Malformed error payload"
        );
        ReduceError::MalformedErrorPayload {
            signal_type: signal.kind.clone(),
            path: path.display_path(),
            source,
        }
    })
}

/// Return `state` with `requests.<operation>` replaced by `status`.
///
/// A state that is not an object is treated as an empty one.
pub fn with_request_status(state: Value, operation: &str, status: &RequestStatus) -> Value {
    let mut slice = match state {
        Value::Object(map) => map,
        _ => Map::new(),
    };

    let mut requests = match slice.remove(REQUESTS_KEY) {
        Some(Value::Object(map)) => map,
        _ => Map::new(),
    };
    requests.insert(operation.to_string(), Value::from(status));
    slice.insert(REQUESTS_KEY.to_string(), Value::Object(requests));

    Value::Object(slice)
}

/// Read the status of `operation` from a state slice.
///
/// Missing fields default to `false`.
pub fn request_status(state: &Value, operation: &str) -> Option<RequestStatus> {
    let entry = state.get(REQUESTS_KEY)?.get(operation)?;
    RequestStatus::deserialize(entry).ok()
}

/// A default state holding an idle status for every operation.
///
/// ```
/// use request_dispatch_core::reducer::default_state;
/// use serde_json::json;
///
/// assert_eq!(
///     default_state(&["SIGNUP"]),
///     json!({ "requests": { "SIGNUP": { "loading": false, "failed": false } } })
/// );
/// ```
pub fn default_state<S: AsRef<str>>(operations: &[S]) -> Value {
    merge_default_state(Value::Object(Map::new()), operations)
}

/// Add idle statuses for `operations` to `base`, keeping its other fields.
///
/// Entries already present under `requests` are left untouched.
pub fn merge_default_state<S: AsRef<str>>(base: Value, operations: &[S]) -> Value {
    let mut slice = match base {
        Value::Object(map) => map,
        _ => Map::new(),
    };

    let mut requests = match slice.remove(REQUESTS_KEY) {
        Some(Value::Object(map)) => map,
        _ => Map::new(),
    };
    for op in operations {
        requests
            .entry(op.as_ref().to_string())
            .or_insert_with(|| Value::from(&RequestStatus::idle()));
    }
    slice.insert(REQUESTS_KEY.to_string(), Value::Object(requests));

    Value::Object(slice)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn identity(state: Value, _signal: &Signal) -> Value {
        state
    }

    fn reduce(store: &str, state: Value, signal: &Signal) -> Value {
        enhance_reducer(store, state, signal, &json!({}), identity).unwrap()
    }

    #[test]
    fn test_passthrough_unknown_signal() {
        let state = json!({ "trophies": ["yeah"] });
        let output = reduce("USER", state, &Signal::new("USER.TROPHIES.UNLOCK"));
        assert_eq!(output, json!({ "trophies": ["yeah"] }));
    }

    #[test]
    fn test_passthrough_matches_fallback() {
        let fallback = |state: Value, signal: &Signal| {
            json!({ "seen": signal.kind, "before": state })
        };
        let state = json!({ "a": 1 });
        let signal = Signal::new("OTHER");
        let via_wrapper =
            enhance_reducer("USER", state.clone(), &signal, &json!({}), fallback).unwrap();
        assert_eq!(via_wrapper, fallback(state, &signal));
    }

    #[test]
    fn test_reset_store_returns_default() {
        let output = enhance_reducer(
            "MODULE",
            json!({ "full": 1e300 }),
            &Signal::new("RESET_STORE"),
            &json!({ "empty": 0 }),
            identity,
        )
        .unwrap();
        assert_eq!(output, json!({ "empty": 0 }));
    }

    #[test]
    fn test_reset_store_skips_fallback() {
        let output = enhance_reducer(
            "USER",
            json!({ "x": 1 }),
            &Signal::new("RESET_STORE"),
            &json!({}),
            |_, _| panic!("fallback must not run on reset"),
        )
        .unwrap();
        assert_eq!(output, json!({}));
    }

    #[test]
    fn test_legacy_sentinel_only_under_legacy() {
        let signal = Signal::new("EMPTY_STORE");
        let default = json!({ "empty": true });

        let canonical = enhance_reducer("USER", json!({ "x": 1 }), &signal, &default, identity);
        assert_eq!(canonical.unwrap(), json!({ "x": 1 }));

        let legacy = enhance_reducer_with(
            &Conventions::legacy(),
            "USER",
            json!({ "x": 1 }),
            &signal,
            &default,
            identity,
        );
        assert_eq!(legacy.unwrap(), default);
    }

    #[test]
    fn test_start_sets_loading() {
        let output = reduce("USER", json!({}), &Signal::new("USER.REQUEST.LOGIN.START"));
        assert_eq!(
            output,
            json!({ "requests": { "LOGIN": { "loading": true, "failed": false } } })
        );
    }

    #[test]
    fn test_success_clears_loading() {
        let output = reduce("USER", json!({}), &Signal::new("USER.REQUEST.LOGIN.SUCCESS"));
        assert_eq!(
            output,
            json!({ "requests": { "LOGIN": { "loading": false, "failed": false } } })
        );
    }

    #[test]
    fn test_failed_sets_failed() {
        let output = reduce("USER", json!({}), &Signal::new("USER.REQUEST.LOGIN.FAILED"));
        assert_eq!(
            output,
            json!({ "requests": { "LOGIN": { "loading": false, "failed": true } } })
        );
    }

    #[test]
    fn test_reset_clears_status() {
        let state = json!({ "requests": { "LOGIN": { "loading": true, "failed": false } } });
        let output = reduce("USER", state, &Signal::new("USER.REQUEST.LOGIN.RESET"));
        assert_eq!(
            output,
            json!({ "requests": { "LOGIN": { "loading": false, "failed": false } } })
        );
    }

    #[test]
    fn test_other_fields_and_requests_preserved() {
        let state = json!({
            "token": "abc",
            "requests": { "SIGNUP": { "loading": true, "failed": false } },
        });
        let output = reduce("USER", state, &Signal::new("USER.REQUEST.LOGIN.START"));
        assert_eq!(
            output,
            json!({
                "token": "abc",
                "requests": {
                    "SIGNUP": { "loading": true, "failed": false },
                    "LOGIN": { "loading": true, "failed": false },
                },
            })
        );
    }

    #[test]
    fn test_other_store_is_ignored() {
        let output = reduce("USER", json!({}), &Signal::new("CART.REQUEST.CHECKOUT.START"));
        assert_eq!(output, json!({}));
    }

    #[test]
    fn test_fallback_sees_updated_state() {
        let output = enhance_reducer(
            "USER",
            json!({}),
            &Signal::new("USER.REQUEST.LOGIN.SUCCESS").with_payload(json!({ "token": "t1" })),
            &json!({}),
            |mut state, signal| {
                assert_eq!(state["requests"]["LOGIN"]["loading"], json!(false));
                if let Some(token) = signal.payload_at(&["token"]) {
                    state["token"] = token.clone();
                }
                state
            },
        )
        .unwrap();
        assert_eq!(output["token"], json!("t1"));
        assert_eq!(output["requests"]["LOGIN"]["failed"], json!(false));
    }

    #[test]
    fn test_decoded_error_replaces_flag() {
        let signal = Signal::new("USER.REQUEST.LOGIN.FAILED").with_error(json!({
            "response": { "text": r#"{"message":"bad credentials","code":401}"# }
        }));
        let output = reduce("USER", json!({}), &signal);
        assert_eq!(
            output["requests"]["LOGIN"],
            json!({ "loading": false, "failed": { "message": "bad credentials", "code": 401 } })
        );

        let status = request_status(&output, "LOGIN").unwrap();
        assert!(status.is_failed());
        assert_eq!(status.failed.error().unwrap()["code"], json!(401));
    }

    #[test]
    fn test_legacy_error_path() {
        let signal = Signal::new("USER.REQUEST.LOGIN.FAILED").with_error(json!({
            "err": { "response": { "text": "\"nope\"" } }
        }));

        let canonical = reduce("USER", json!({}), &signal);
        assert_eq!(canonical["requests"]["LOGIN"]["failed"], json!(true));

        let legacy = enhance_reducer_with(
            &Conventions::legacy(),
            "USER",
            json!({}),
            &signal,
            &json!({}),
            identity,
        )
        .unwrap();
        assert_eq!(legacy["requests"]["LOGIN"]["failed"], json!("nope"));
    }

    #[test]
    fn test_falsy_decoded_error_keeps_flag() {
        let signal = Signal::new("USER.REQUEST.LOGIN.FAILED")
            .with_error(json!({ "response": { "text": "false" } }));
        let output = reduce("USER", json!({}), &signal);
        assert_eq!(output["requests"]["LOGIN"]["failed"], json!(true));
    }

    #[test]
    fn test_non_string_error_text_is_ignored() {
        let signal = Signal::new("USER.REQUEST.LOGIN.FAILED")
            .with_error(json!({ "response": { "text": 5 } }));
        let output = reduce("USER", json!({}), &signal);
        assert_eq!(
            output["requests"]["LOGIN"],
            json!({ "loading": false, "failed": true })
        );
    }

    #[test]
    fn test_decoded_error_on_start_replaces_flag() {
        let signal = Signal::new("USER.REQUEST.LOGIN.START")
            .with_payload(json!({ "response": { "text": r#"{"retry":true}"# } }));
        let output = reduce("USER", json!({}), &signal);
        assert_eq!(
            output["requests"]["LOGIN"],
            json!({ "loading": true, "failed": { "retry": true } })
        );
    }

    #[test]
    fn test_malformed_error_payload_is_an_error() {
        let signal = Signal::new("USER.REQUEST.LOGIN.FAILED")
            .with_error(json!({ "response": { "text": "<html>502</html>" } }));
        let err = enhance_reducer("USER", json!({}), &signal, &json!({}), identity).unwrap_err();
        match &err {
            ReduceError::MalformedErrorPayload {
                signal_type, path, ..
            } => {
                assert_eq!(signal_type, "USER.REQUEST.LOGIN.FAILED");
                assert_eq!(*path, "payload.response.text");
            }
        }
        assert!(std::error::Error::source(&err).is_some());
        assert!(err.to_string().contains("payload.response.text"));
    }

    #[test]
    fn test_non_object_state_treated_as_empty() {
        let output = reduce("USER", Value::Null, &Signal::new("USER.REQUEST.LOGIN.START"));
        assert_eq!(
            output,
            json!({ "requests": { "LOGIN": { "loading": true, "failed": false } } })
        );
    }

    #[test]
    fn test_parse_request_type() {
        let m = parse_request_type("USER.REQUEST.LOGIN.START").unwrap();
        assert_eq!((m.store, m.operation, m.phase), ("USER", "LOGIN", "START"));
        assert_eq!(m.known_phase(), Some(Phase::Start));

        let nested = parse_request_type("app.user.REQUEST.LOAD.MORE.SUCCESS").unwrap();
        assert_eq!(nested.store, "app.user");
        assert_eq!(nested.operation, "LOAD.MORE");
        assert_eq!(nested.phase, "SUCCESS");

        assert!(parse_request_type("USER.REQUEST.START").is_none());
        assert!(parse_request_type("RESET_STORE").is_none());
        assert!(parse_request_type("USER.LOGIN.START").is_none());
    }

    #[test]
    fn test_default_state_and_merge() {
        assert_eq!(
            default_state(&["LOGIN", "SIGNUP"]),
            json!({ "requests": {
                "LOGIN": { "loading": false, "failed": false },
                "SIGNUP": { "loading": false, "failed": false },
            } })
        );

        let merged = merge_default_state(
            json!({ "token": null, "requests": { "LOGIN": { "loading": true, "failed": false } } }),
            &["LOGIN", "SIGNUP"],
        );
        assert_eq!(merged["token"], Value::Null);
        assert_eq!(merged["requests"]["LOGIN"]["loading"], json!(true));
        assert_eq!(merged["requests"]["SIGNUP"]["loading"], json!(false));
    }

    #[test]
    fn test_request_status_partial_record() {
        let state = json!({ "requests": { "LOGIN": { "loading": true } } });
        assert_eq!(
            request_status(&state, "LOGIN"),
            Some(RequestStatus {
                loading: true,
                failed: Failure::Flag(false),
            })
        );
        assert_eq!(request_status(&state, "SIGNUP"), None);
    }
}
