//! Request-aware state store with middleware
//!
//! [`Store`] owns one named state slice and routes every dispatched
//! [`Signal`] through [`enhance_reducer_with`] before handing it to the
//! slice's own reducer.

use serde_json::Value;

use crate::action::{Action, ActionSummary, Signal};
use crate::conventions::Conventions;
use crate::reducer::{enhance_reducer_with, ReduceError};

/// A slice reducer: consumes the current state and returns the next one.
pub type Reducer = fn(Value, &Signal) -> Value;

/// A reducer that leaves the state unchanged.
pub fn passthrough(state: Value, _signal: &Signal) -> Value {
    state
}

/// State container for one named slice
///
/// # Example
/// ```
/// use request_dispatch_core::{Signal, Store};
/// use serde_json::{json, Value};
///
/// fn reducer(mut state: Value, signal: &Signal) -> Value {
///     if signal.kind == "USER.REQUEST.LOGIN.SUCCESS" {
///         state["token"] = signal.payload.clone().unwrap_or(Value::Null);
///     }
///     state
/// }
///
/// let mut store = Store::new("USER", json!({ "token": null }), reducer);
/// store.dispatch(Signal::new("USER.REQUEST.LOGIN.START")).unwrap();
/// assert_eq!(store.state()["requests"]["LOGIN"]["loading"], json!(true));
/// ```
pub struct Store {
    name: String,
    state: Value,
    default_state: Value,
    conventions: Conventions,
    reducer: Reducer,
}

impl Store {
    /// Create a store starting from `default_state`
    pub fn new(name: impl Into<String>, default_state: Value, reducer: Reducer) -> Self {
        Self {
            name: name.into(),
            state: default_state.clone(),
            default_state,
            conventions: Conventions::default(),
            reducer,
        }
    }

    /// Use explicit conventions instead of the canonical ones
    pub fn with_conventions(mut self, conventions: Conventions) -> Self {
        self.conventions = conventions;
        self
    }

    /// Dispatch a signal to the store
    ///
    /// Returns `true` if the state changed. On error the previous state is kept.
    pub fn dispatch(&mut self, signal: Signal) -> Result<bool, ReduceError> {
        let next = enhance_reducer_with(
            &self.conventions,
            &self.name,
            self.state.clone(),
            &signal,
            &self.default_state,
            self.reducer,
        )?;
        let changed = next != self.state;
        self.state = next;
        Ok(changed)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get a reference to the current state
    pub fn state(&self) -> &Value {
        &self.state
    }

    /// Get a mutable reference to the state
    ///
    /// Prefer dispatching signals; this is meant for seeding state.
    pub fn state_mut(&mut self) -> &mut Value {
        &mut self.state
    }

    pub fn default_state(&self) -> &Value {
        &self.default_state
    }

    pub fn conventions(&self) -> &Conventions {
        &self.conventions
    }

    /// Restore the default state without dispatching
    pub fn reset(&mut self) {
        self.state = self.default_state.clone();
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("name", &self.name)
            .field("state", &self.state)
            .field("conventions", &self.conventions)
            .finish()
    }
}

/// Store with middleware support
pub struct StoreWithMiddleware<M: Middleware<Signal>> {
    store: Store,
    middleware: M,
}

impl<M: Middleware<Signal>> StoreWithMiddleware<M> {
    pub fn new(store: Store, middleware: M) -> Self {
        Self { store, middleware }
    }

    /// Dispatch a signal through middleware and store
    ///
    /// `after` only runs when the reducer succeeds.
    pub fn dispatch(&mut self, signal: Signal) -> Result<bool, ReduceError> {
        self.middleware.before(&signal);
        let changed = self.store.dispatch(signal.clone())?;
        self.middleware.after(&signal, changed);
        Ok(changed)
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn state(&self) -> &Value {
        self.store.state()
    }

    pub fn state_mut(&mut self) -> &mut Value {
        self.store.state_mut()
    }

    pub fn middleware(&self) -> &M {
        &self.middleware
    }

    pub fn middleware_mut(&mut self) -> &mut M {
        &mut self.middleware
    }
}

/// Middleware trait for intercepting actions
pub trait Middleware<A: Action> {
    /// Called before the action is dispatched to the reducer
    fn before(&mut self, action: &A);

    /// Called after the action is processed by the reducer
    fn after(&mut self, action: &A, state_changed: bool);
}

/// A no-op middleware that does nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopMiddleware;

impl<A: Action> Middleware<A> for NoopMiddleware {
    fn before(&mut self, _action: &A) {}
    fn after(&mut self, _action: &A, _state_changed: bool) {}
}

/// Filter for which actions get logged, using glob patterns.
///
/// Patterns support `*` (any sequence) and `?` (any single character).
///
/// ```
/// use request_dispatch_core::store::LoggingConfig;
///
/// let config = LoggingConfig::new(Some("USER.REQUEST.*"), Some("*.RESET"));
/// assert!(config.should_log("USER.REQUEST.LOGIN.START"));
/// assert!(!config.should_log("USER.REQUEST.LOGIN.RESET"));
/// assert!(!config.should_log("CART.ADD"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoggingConfig {
    /// If non-empty, only log actions matching these patterns
    pub include_patterns: Vec<String>,
    /// Exclude actions matching these patterns (applied after include)
    pub exclude_patterns: Vec<String>,
}

impl LoggingConfig {
    /// Create a config from comma-separated pattern strings
    pub fn new(include: Option<&str>, exclude: Option<&str>) -> Self {
        Self {
            include_patterns: include.map(split_patterns).unwrap_or_default(),
            exclude_patterns: exclude.map(split_patterns).unwrap_or_default(),
        }
    }

    pub fn should_log(&self, action_name: &str) -> bool {
        if !self.include_patterns.is_empty()
            && !self
                .include_patterns
                .iter()
                .any(|p| glob_match(p, action_name))
        {
            return false;
        }

        !self
            .exclude_patterns
            .iter()
            .any(|p| glob_match(p, action_name))
    }
}

fn split_patterns(s: &str) -> Vec<String> {
    s.split(',')
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .collect()
}

/// Middleware that logs actions through `tracing`
#[derive(Debug, Clone, Default)]
pub struct LoggingMiddleware {
    /// Whether to log before dispatch
    pub log_before: bool,
    /// Whether to log after dispatch
    pub log_after: bool,
    pub config: LoggingConfig,
}

impl LoggingMiddleware {
    /// Log after dispatch only
    pub fn new() -> Self {
        Self {
            log_before: false,
            log_after: true,
            config: LoggingConfig::default(),
        }
    }

    /// Log both before and after dispatch
    pub fn verbose() -> Self {
        Self {
            log_before: true,
            ..Self::new()
        }
    }

    pub fn with_config(mut self, config: LoggingConfig) -> Self {
        self.config = config;
        self
    }
}

impl<A: ActionSummary> Middleware<A> for LoggingMiddleware {
    fn before(&mut self, action: &A) {
        if self.log_before && self.config.should_log(action.name()) {
            tracing::debug!(
                action = %action.name(),
                summary = %action.summary(),
                "Dispatching action"
            );
        }
    }

    fn after(&mut self, action: &A, state_changed: bool) {
        if self.log_after && self.config.should_log(action.name()) {
            tracing::debug!(
                action = %action.name(),
                state_changed = state_changed,
                "Action processed"
            );
        }
    }
}

/// Simple glob matching supporting `*` and `?`
pub fn glob_match(pattern: &str, text: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let text: Vec<char> = text.chars().collect();

    let mut pi = 0;
    let mut ti = 0;
    let mut star_pi = None;
    let mut star_ti = 0;

    while ti < text.len() {
        if pi < pattern.len() && (pattern[pi] == '?' || pattern[pi] == text[ti]) {
            pi += 1;
            ti += 1;
        } else if pi < pattern.len() && pattern[pi] == '*' {
            star_pi = Some(pi);
            star_ti = ti;
            pi += 1;
        } else if let Some(spi) = star_pi {
            pi = spi + 1;
            star_ti += 1;
            ti = star_ti;
        } else {
            return false;
        }
    }

    while pi < pattern.len() && pattern[pi] == '*' {
        pi += 1;
    }

    pi == pattern.len()
}
