//! Read-only selectors over a root state tree
//!
//! Each operation gets two selectors, `<operation>Loading` and
//! `<operation>Failed`, reading `<store>.requests.<OPERATION>.<field>`.
//! Lookups never fail: a missing segment anywhere yields `None`.
//!
//! ```
//! use request_dispatch_core::selectors::selectors;
//! use serde_json::json;
//!
//! let root = json!({ "user": { "requests": { "LOGIN": { "loading": true } } } });
//! let selectors = selectors("user", &["LOGIN"]);
//! assert_eq!(selectors.select("loginLoading", &root), Some(&json!(true)));
//! assert_eq!(selectors.select("loginFailed", &root), None);
//! ```

use serde_json::Value;

use crate::case::camel_case;
use crate::conventions::{Conventions, SelectorNamespace};
use crate::names::upsert;
use crate::path::{get_path, is_truthy, split_path};
use crate::reducer::REQUESTS_KEY;

/// Which field of a request status a selector reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SelectorField {
    Loading,
    Failed,
}

impl SelectorField {
    pub const ALL: [SelectorField; 2] = [SelectorField::Loading, SelectorField::Failed];

    /// Field name in the status record.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Loading => "loading",
            Self::Failed => "failed",
        }
    }

    /// Suffix of the generated selector name.
    pub fn suffix(&self) -> &'static str {
        match self {
            Self::Loading => "Loading",
            Self::Failed => "Failed",
        }
    }
}

/// A safe nested-path accessor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    operation: String,
    field: SelectorField,
    segments: Vec<String>,
}

impl Selector {
    pub fn new(namespace: &str, operation: &str, field: SelectorField) -> Self {
        let path = format!(
            "{}.{}.{}.{}",
            namespace,
            REQUESTS_KEY,
            operation,
            field.as_str()
        );
        Self {
            operation: operation.to_string(),
            field,
            segments: split_path(&path),
        }
    }

    pub fn operation(&self) -> &str {
        &self.operation
    }

    pub fn field(&self) -> SelectorField {
        self.field
    }

    /// The dotted lookup path.
    pub fn path(&self) -> String {
        self.segments.join(".")
    }

    pub fn select<'a>(&self, root: &'a Value) -> Option<&'a Value> {
        get_path(root, &self.segments)
    }
}

/// Name of the selector for `operation` and `field` (`loginLoading`).
pub fn selector_name(operation: &str, field: SelectorField) -> String {
    format!("{}{}", camel_case(operation), field.suffix())
}

/// Generated selectors in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selectors {
    entries: Vec<(String, Selector)>,
}

impl Selectors {
    pub fn get(&self, name: &str) -> Option<&Selector> {
        self.entries
            .iter()
            .find(|(entry, _)| entry == name)
            .map(|(_, selector)| selector)
    }

    /// Run a selector by name. Unknown names select nothing.
    pub fn select<'a>(&self, name: &str, root: &'a Value) -> Option<&'a Value> {
        self.get(name).and_then(|selector| selector.select(root))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Selector)> {
        self.entries
            .iter()
            .map(|(name, selector)| (name.as_str(), selector))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn by_operation(&self, operation: &str, field: SelectorField) -> Option<&Selector> {
        self.entries
            .iter()
            .map(|(_, selector)| selector)
            .find(|selector| selector.operation == operation && selector.field == field)
    }

    /// Whether `operation` is in flight. Missing state reads as `false`.
    pub fn is_loading(&self, operation: &str, root: &Value) -> bool {
        self.by_operation(operation, SelectorField::Loading)
            .and_then(|selector| selector.select(root))
            .is_some_and(is_truthy)
    }

    /// Whether `operation` failed. Missing state reads as `false`.
    pub fn is_failed(&self, operation: &str, root: &Value) -> bool {
        self.failure(operation, root).is_some_and(is_truthy)
    }

    /// The raw `failed` value of `operation`: a flag or a decoded error body.
    pub fn failure<'a>(&self, operation: &str, root: &'a Value) -> Option<&'a Value> {
        self.by_operation(operation, SelectorField::Failed)
            .and_then(|selector| selector.select(root))
    }
}

/// Generate selectors namespaced under the raw store name.
pub fn selectors<S: AsRef<str>>(store: &str, operations: &[S]) -> Selectors {
    selectors_with(&Conventions::default(), store, operations)
}

/// Generate selectors with explicit conventions.
pub fn selectors_with<S: AsRef<str>>(
    conventions: &Conventions,
    store: &str,
    operations: &[S],
) -> Selectors {
    let namespace = match conventions.selector_namespace {
        SelectorNamespace::Raw => store.to_string(),
        SelectorNamespace::CamelCase => camel_case(store),
    };

    let mut entries = Vec::with_capacity(operations.len() * SelectorField::ALL.len());
    for op in operations {
        let op = op.as_ref();
        for field in SelectorField::ALL {
            upsert(
                &mut entries,
                selector_name(op, field),
                Selector::new(&namespace, op, field),
            );
        }
    }

    Selectors { entries }
}
