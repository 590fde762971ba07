//! Test utilities for request-dispatch stores
//!
//! - [`RecordingMiddleware`]: captures every signal a store processes
//! - [`TestHarness`]: a [`Store`] wired to a recording middleware
//! - [`assert_request!`](crate::assert_request): check a status in a state slice
//!
//! # Example
//!
//! ```
//! use request_dispatch_core::assert_request;
//! use request_dispatch_core::store::{passthrough, Store};
//! use request_dispatch_core::testing::TestHarness;
//! use request_dispatch_core::Signal;
//! use serde_json::json;
//!
//! let mut harness = TestHarness::new(Store::new("USER", json!({}), passthrough));
//! harness.dispatch(Signal::new("USER.REQUEST.LOGIN.START")).unwrap();
//!
//! assert_request!(harness.state(), "LOGIN", loading: true, failed: false);
//! assert_eq!(harness.drain_processed().len(), 1);
//! ```

use serde_json::Value;

use crate::action::{Action, Signal};
use crate::reducer::ReduceError;
use crate::store::{Middleware, Store, StoreWithMiddleware};

/// Middleware that keeps every signal it sees.
#[derive(Debug, Clone)]
pub struct RecordingMiddleware<A: Action = Signal> {
    /// Signals passed to `before`, in order
    pub dispatched: Vec<A>,
    /// Signals that reached `after`, with their change flag
    pub processed: Vec<(A, bool)>,
}

impl<A: Action> Default for RecordingMiddleware<A> {
    fn default() -> Self {
        Self {
            dispatched: Vec::new(),
            processed: Vec::new(),
        }
    }
}

impl<A: Action> Middleware<A> for RecordingMiddleware<A> {
    fn before(&mut self, action: &A) {
        self.dispatched.push(action.clone());
    }

    fn after(&mut self, action: &A, state_changed: bool) {
        self.processed.push((action.clone(), state_changed));
    }
}

/// A store that records what it processes.
pub struct TestHarness {
    store: StoreWithMiddleware<RecordingMiddleware>,
}

impl TestHarness {
    pub fn new(store: Store) -> Self {
        Self {
            store: StoreWithMiddleware::new(store, RecordingMiddleware::default()),
        }
    }

    pub fn dispatch(&mut self, signal: Signal) -> Result<bool, ReduceError> {
        self.store.dispatch(signal)
    }

    /// Dispatch signals in order, stopping at the first error.
    pub fn dispatch_all<I>(&mut self, signals: I) -> Result<(), ReduceError>
    where
        I: IntoIterator<Item = Signal>,
    {
        for signal in signals {
            self.store.dispatch(signal)?;
        }
        Ok(())
    }

    pub fn state(&self) -> &Value {
        self.store.state()
    }

    pub fn state_mut(&mut self) -> &mut Value {
        self.store.state_mut()
    }

    /// Every signal dispatched so far, including ones that failed.
    pub fn dispatched(&self) -> &[Signal] {
        &self.store.middleware().dispatched
    }

    /// Take the signals processed successfully since the last drain.
    pub fn drain_processed(&mut self) -> Vec<(Signal, bool)> {
        std::mem::take(&mut self.store.middleware_mut().processed)
    }
}

/// Assert the status of an operation inside a state slice.
///
/// `failed` accepts anything convertible with `serde_json::json!`, so a
/// decoded error body can be checked as well as a flag.
///
/// ```
/// use request_dispatch_core::assert_request;
/// use serde_json::json;
///
/// let state = json!({ "requests": { "LOGIN": { "loading": false, "failed": { "code": 401 } } } });
/// assert_request!(state, "LOGIN", loading: false, failed: { "code": 401 });
/// ```
#[macro_export]
macro_rules! assert_request {
    ($state:expr, $operation:expr, loading: $loading:expr, failed: $($failed:tt)+) => {{
        let entry = $state
            .get("requests")
            .and_then(|requests| requests.get($operation))
            .unwrap_or_else(|| {
                panic!(
                    "Expected request `{}` in state, but got: {}",
                    $operation, $state
                )
            });
        assert_eq!(
            entry,
            &$crate::serde_json::json!({ "loading": $loading, "failed": $($failed)+ }),
            "Unexpected status for request `{}`",
            $operation
        );
    }};
}

/// Assert that no status exists for an operation.
#[macro_export]
macro_rules! assert_no_request {
    ($state:expr, $operation:expr) => {
        assert!(
            $state
                .get("requests")
                .and_then(|requests| requests.get($operation))
                .is_none(),
            "Expected no request `{}` in state, but got: {}",
            $operation,
            $state
        );
    };
}
