//! Core types and generators for request-dispatch
//!
//! This crate removes the boilerplate of tracking asynchronous requests in a
//! Redux-style store. For a store name and a list of operations it generates:
//!
//! - **Action types**: `STORE.REQUEST.OP.{START,SUCCESS,FAILED,RESET}` plus a
//!   whole-store reset identifier ([`names`])
//! - **Action creators**: `requestOpStart`, `requestOpSuccess`, .. ([`creators`])
//! - **Reducer wrapper**: records `{ loading, failed }` per operation under
//!   `requests` and handles the store reset ([`reducer`])
//! - **Selectors**: `opLoading` / `opFailed` lookups on the root state ([`selectors`])
//!
//! State slices are `serde_json::Value` objects. Only the `requests` key is
//! touched; every other field belongs to the slice's own reducer.
//!
//! # Example
//!
//! ```
//! use request_dispatch_core::prelude::*;
//! use serde_json::{json, Value};
//!
//! const STORE: &str = "USER";
//! const OPERATIONS: [&str; 1] = ["SIGNUP"];
//!
//! fn user_reducer(mut state: Value, signal: &Signal) -> Value {
//!     if signal.kind == "USER.REQUEST.SIGNUP.SUCCESS" {
//!         state["token"] = signal.payload_at(&["token"]).cloned().unwrap_or(Value::Null);
//!     }
//!     state
//! }
//!
//! let types = action_types(STORE, &OPERATIONS);
//! let creators = action_creators(STORE, &OPERATIONS, &types);
//! let selectors = selectors("user", &OPERATIONS);
//!
//! let mut store = Store::new(STORE, default_state(&OPERATIONS), user_reducer);
//! store.dispatch(creators.call("requestSignupStart", None).unwrap()).unwrap();
//!
//! let root = json!({ "user": store.state() });
//! assert!(selectors.is_loading("SIGNUP", &root));
//! ```

pub mod action;
pub mod case;
pub mod conventions;
pub mod creators;
pub mod names;
pub mod path;
pub mod reducer;
pub mod selectors;
pub mod store;
pub mod testing;

// Core trait exports
pub use action::{Action, ActionSummary, Signal};

// Convention exports
pub use conventions::{Conventions, ErrorPath, ResetSentinel, SelectorNamespace};

// Generator exports
pub use creators::{action_creators, ActionCreator, ActionCreators, CreatorKind};
pub use names::{action_types, action_types_with, ActionTypes, Phase, RequestNames};
pub use selectors::{selectors, selectors_with, Selector, SelectorField, Selectors};

// Reducer exports
pub use reducer::{
    default_state, enhance_reducer, enhance_reducer_with, merge_default_state, request_status,
    Failure, ReduceError, RequestStatus,
};

// Store exports
pub use store::{
    LoggingConfig, LoggingMiddleware, Middleware, NoopMiddleware, Reducer, Store,
    StoreWithMiddleware,
};

// Testing exports
pub use testing::{RecordingMiddleware, TestHarness};

#[doc(hidden)]
pub use serde_json;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::action::{Action, Signal};
    pub use crate::conventions::Conventions;
    pub use crate::creators::{action_creators, ActionCreators};
    pub use crate::names::{action_types, ActionTypes, Phase};
    pub use crate::reducer::{
        default_state, enhance_reducer, enhance_reducer_with, Failure, ReduceError,
        RequestStatus,
    };
    pub use crate::selectors::{selectors, Selectors};
    pub use crate::store::{LoggingMiddleware, Middleware, Store, StoreWithMiddleware};
}
