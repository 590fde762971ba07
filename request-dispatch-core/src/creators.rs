//! Action creators for request lifecycles
//!
//! For each operation the generator yields four creators named
//! `request<Operation><Phase>` (`requestLoginStart`, `requestSignUpFailed`, ..)
//! followed by a single parameterless creator for the whole-store reset.
//!
//! ```
//! use request_dispatch_core::creators::action_creators;
//! use request_dispatch_core::names::action_types;
//! use serde_json::json;
//!
//! let types = action_types("USER", &["LOGIN"]);
//! let creators = action_creators("USER", &["LOGIN"], &types);
//!
//! let signal = creators.call("requestLoginSuccess", Some(json!({ "token": "t" }))).unwrap();
//! assert_eq!(signal.kind, "USER.REQUEST.LOGIN.SUCCESS");
//! assert_eq!(signal.payload, Some(json!({ "token": "t" })));
//! ```

use serde_json::Value;

use crate::action::Signal;
use crate::case::pascal_case;
use crate::conventions::ResetSentinel;
use crate::names::{upsert, ActionTypes, Phase, RequestNames};

/// What a creator produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CreatorKind {
    Request(Phase),
    ResetStore,
}

/// A pure function from an optional payload to a [`Signal`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionCreator {
    signal_type: String,
    kind: CreatorKind,
}

impl ActionCreator {
    pub fn new(signal_type: impl Into<String>, kind: CreatorKind) -> Self {
        Self {
            signal_type: signal_type.into(),
            kind,
        }
    }

    pub fn signal_type(&self) -> &str {
        &self.signal_type
    }

    pub fn kind(&self) -> CreatorKind {
        self.kind
    }

    /// Build the signal.
    ///
    /// START and SUCCESS carry the payload when one is given, FAILED always
    /// sets `error` and carries the payload, RESET and the store reset ignore it.
    pub fn create(&self, payload: Option<Value>) -> Signal {
        let signal = Signal::new(self.signal_type.clone());
        match (self.kind, payload) {
            (CreatorKind::Request(Phase::Failed), payload) => Signal {
                payload,
                error: true,
                ..signal
            },
            (CreatorKind::Request(Phase::Start | Phase::Success), Some(payload)) => {
                signal.with_payload(payload)
            }
            _ => signal,
        }
    }

    /// Build the signal without a payload.
    pub fn call(&self) -> Signal {
        self.create(None)
    }
}

/// Name of the creator for `operation` in `phase` (`requestLoginStart`).
pub fn creator_name(operation: &str, phase: Phase) -> String {
    format!("request{}{}", pascal_case(operation), phase.label())
}

/// Generated creators in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionCreators {
    entries: Vec<(String, ActionCreator)>,
    reset_sentinel: ResetSentinel,
}

impl ActionCreators {
    pub fn get(&self, name: &str) -> Option<&ActionCreator> {
        self.entries
            .iter()
            .find(|(entry, _)| entry == name)
            .map(|(_, creator)| creator)
    }

    /// Invoke a creator by name. Returns `None` for unknown names.
    pub fn call(&self, name: &str, payload: Option<Value>) -> Option<Signal> {
        self.get(name).map(|creator| creator.create(payload))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ActionCreator)> {
        self.entries
            .iter()
            .map(|(name, creator)| (name.as_str(), creator))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The whole-store reset signal.
    pub fn reset_store(&self) -> Signal {
        Signal::new(self.reset_sentinel.as_str())
    }
}

/// Generate creators for `operations`, taking identifiers from `types`.
///
/// Identifiers are looked up by raw operation name. Operations `types` does
/// not know about get identifiers formatted from `store`.
pub fn action_creators<S: AsRef<str>>(
    store: &str,
    operations: &[S],
    types: &ActionTypes,
) -> ActionCreators {
    let mut entries = Vec::with_capacity(operations.len() * Phase::ALL.len() + 1);

    for op in operations {
        let op = op.as_ref();
        let names = match types.get(op) {
            Some(names) => names.clone(),
            None => RequestNames::new(store, op),
        };
        for phase in Phase::ALL {
            upsert(
                &mut entries,
                creator_name(op, phase),
                ActionCreator::new(names.for_phase(phase), CreatorKind::Request(phase)),
            );
        }
    }

    let reset_sentinel = types.reset_sentinel();
    upsert(
        &mut entries,
        reset_sentinel.field_name().to_string(),
        ActionCreator::new(reset_sentinel.as_str(), CreatorKind::ResetStore),
    );

    ActionCreators {
        entries,
        reset_sentinel,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conventions::Conventions;
    use crate::names::{action_types, action_types_with};
    use serde_json::json;

    fn user_creators() -> ActionCreators {
        let ops = ["LOGIN", "SIGNUP"];
        action_creators("USER", &ops, &action_types("USER", &ops))
    }

    #[test]
    fn test_key_set_in_order() {
        let names: Vec<_> = user_creators().names().map(str::to_string).collect();
        assert_eq!(
            names,
            vec![
                "requestLoginStart",
                "requestLoginSuccess",
                "requestLoginFailed",
                "requestLoginReset",
                "requestSignupStart",
                "requestSignupSuccess",
                "requestSignupFailed",
                "requestSignupReset",
                "resetStore",
            ]
        );
    }

    #[test]
    fn test_start_without_payload() {
        let signal = user_creators().call("requestLoginStart", None).unwrap();
        assert_eq!(signal, Signal::new("USER.REQUEST.LOGIN.START"));
    }

    #[test]
    fn test_start_with_payload() {
        let signal = user_creators()
            .call("requestSignupStart", Some(json!({ "email": "a@b.c" })))
            .unwrap();
        assert_eq!(
            serde_json::to_value(&signal).unwrap(),
            json!({ "type": "USER.REQUEST.SIGNUP.START", "payload": { "email": "a@b.c" } })
        );
    }

    #[test]
    fn test_failed_sets_error() {
        let signal = user_creators()
            .call("requestLoginFailed", Some(json!("bad password")))
            .unwrap();
        assert_eq!(signal.kind, "USER.REQUEST.LOGIN.FAILED");
        assert_eq!(signal.payload, Some(json!("bad password")));
        assert!(signal.error);
    }

    #[test]
    fn test_reset_ignores_payload() {
        let creators = user_creators();
        let signal = creators.call("requestLoginReset", Some(json!(1))).unwrap();
        assert_eq!(signal, Signal::new("USER.REQUEST.LOGIN.RESET"));
        assert_eq!(creators.reset_store(), Signal::new("RESET_STORE"));
        assert_eq!(creators.call("resetStore", None), Some(Signal::new("RESET_STORE")));
    }

    #[test]
    fn test_unknown_creator() {
        assert!(user_creators().call("requestLogoutStart", None).is_none());
    }

    #[test]
    fn test_multi_word_operation() {
        let ops = ["FETCH_USER_PROFILE"];
        let creators = action_creators("APP", &ops, &action_types("APP", &ops));
        let creator = creators.get("requestFetchUserProfileSuccess").unwrap();
        assert_eq!(creator.signal_type(), "APP.REQUEST.FETCH_USER_PROFILE.SUCCESS");
        assert_eq!(creator.kind(), CreatorKind::Request(Phase::Success));
    }

    #[test]
    fn test_operation_missing_from_types() {
        let types = action_types("USER", &["LOGIN"]);
        let creators = action_creators("USER", &["LOGIN", "LOGOUT"], &types);
        assert_eq!(creators.len(), 9);
        assert_eq!(
            creators.get("requestLogoutStart").unwrap().signal_type(),
            "USER.REQUEST.LOGOUT.START"
        );
    }

    #[test]
    fn test_repeated_operation_yields_one_creator_set() {
        let ops = ["LOGIN", "LOGIN"];
        let creators = action_creators("USER", &ops, &action_types("USER", &ops));
        assert_eq!(creators.len(), 5);
        assert_eq!(creators.names().last(), Some("resetStore"));
    }

    #[test]
    fn test_colliding_names_keep_first_position_last_value() {
        let ops = ["SIGN_UP", "LOGIN", "SIGN-UP"];
        let creators = action_creators("USER", &ops, &action_types("USER", &ops));
        assert_eq!(creators.len(), 9);
        assert_eq!(creators.names().next(), Some("requestSignUpStart"));
        assert_eq!(
            creators.get("requestSignUpStart").unwrap().signal_type(),
            "USER.REQUEST.SIGN-UP.START"
        );
    }

    #[test]
    fn test_legacy_reset_creator() {
        let types = action_types_with(&Conventions::legacy(), "USER", &["LOGIN"]);
        let creators = action_creators("USER", &["LOGIN"], &types);
        assert_eq!(creators.names().last(), Some("emptyStore"));
        assert_eq!(creators.reset_store(), Signal::new("EMPTY_STORE"));
    }
}
