//! Naming conventions shared by the generators and the reducer
//!
//! Two conventions exist in the wild for request-lifecycle slices. They
//! differ on the whole-store reset identifier and on where the reducer finds
//! a serialized error body. [`Conventions::default`] is the canonical one;
//! [`Conventions::legacy`] matches stores written against the older shape.
//!
//! Conventions can be loaded from JSON configuration:
//!
//! ```
//! use request_dispatch_core::conventions::{Conventions, ResetSentinel};
//!
//! let conventions = Conventions::from_json(r#"{ "resetSentinel": "EMPTY_STORE" }"#).unwrap();
//! assert_eq!(conventions.reset_sentinel, ResetSentinel::EmptyStore);
//! ```

use serde::{Deserialize, Serialize};

/// Canonical identifier for the whole-store reset signal.
pub const RESET_STORE: &str = "RESET_STORE";

/// Legacy identifier for the whole-store reset signal.
pub const EMPTY_STORE: &str = "EMPTY_STORE";

/// Which identifier resets an entire store slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResetSentinel {
    #[default]
    ResetStore,
    EmptyStore,
}

impl ResetSentinel {
    /// The signal type string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ResetStore => RESET_STORE,
            Self::EmptyStore => EMPTY_STORE,
        }
    }

    /// Key used for the sentinel in generated names and creators.
    pub fn field_name(&self) -> &'static str {
        match self {
            Self::ResetStore => "resetStore",
            Self::EmptyStore => "emptyStore",
        }
    }
}

/// Where a failed request's serialized error body lives, relative to the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorPath {
    /// `payload.response.text`
    #[default]
    Response,
    /// `payload.err.response.text`
    LegacyErr,
}

impl ErrorPath {
    /// Path segments below `payload`.
    pub fn segments(&self) -> &'static [&'static str] {
        match self {
            Self::Response => &["response", "text"],
            Self::LegacyErr => &["err", "response", "text"],
        }
    }

    /// Full dotted path on the signal, for diagnostics.
    pub fn display_path(&self) -> &'static str {
        match self {
            Self::Response => "payload.response.text",
            Self::LegacyErr => "payload.err.response.text",
        }
    }
}

/// How selectors derive the root-state key from the store name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectorNamespace {
    /// Use the store name verbatim.
    #[default]
    Raw,
    /// Camel-case the store name (`USER_PROFILE` -> `userProfile`).
    CamelCase,
}

/// Convention settings consumed by the generators and the reducer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Conventions {
    pub reset_sentinel: ResetSentinel,
    pub error_path: ErrorPath,
    pub selector_namespace: SelectorNamespace,
}

impl Conventions {
    /// The older convention: `EMPTY_STORE` and `payload.err.response.text`.
    pub fn legacy() -> Self {
        Self {
            reset_sentinel: ResetSentinel::EmptyStore,
            error_path: ErrorPath::LegacyErr,
            selector_namespace: SelectorNamespace::Raw,
        }
    }

    pub fn with_reset_sentinel(mut self, reset_sentinel: ResetSentinel) -> Self {
        self.reset_sentinel = reset_sentinel;
        self
    }

    pub fn with_error_path(mut self, error_path: ErrorPath) -> Self {
        self.error_path = error_path;
        self
    }

    pub fn with_selector_namespace(mut self, selector_namespace: SelectorNamespace) -> Self {
        self.selector_namespace = selector_namespace;
        self
    }

    /// Parse conventions from a JSON object. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
