//! request-dispatch: request lifecycle tracking for Redux-style stores
//!
//! Declare the asynchronous operations of a store once and get matching
//! action types, action creators, a reducer wrapper and selectors.
//!
//! # Example
//! ```
//! use request_dispatch::prelude::*;
//! use serde_json::json;
//!
//! let types = action_types("USER", &["LOGIN"]);
//! let creators = action_creators("USER", &["LOGIN"], &types);
//!
//! let state = enhance_reducer(
//!     "USER",
//!     json!({}),
//!     &creators.call("requestLoginFailed", None).unwrap(),
//!     &json!({}),
//!     |state, _| state,
//! )
//! .unwrap();
//! assert_eq!(state["requests"]["LOGIN"]["failed"], json!(true));
//! ```

// Re-export everything from core
pub use request_dispatch_core::*;

/// Prelude for convenient imports
pub mod prelude {
    // Signals
    pub use request_dispatch_core::{Action, Signal};

    // Generators
    pub use request_dispatch_core::{
        action_creators, action_types, selectors, ActionCreators, ActionTypes, Phase, Selectors,
    };

    // Reducer
    pub use request_dispatch_core::{
        default_state, enhance_reducer, enhance_reducer_with, merge_default_state,
        request_status, Conventions, Failure, ReduceError, RequestStatus,
    };

    // Store
    pub use request_dispatch_core::{
        LoggingMiddleware, Middleware, NoopMiddleware, Store, StoreWithMiddleware,
    };
}
