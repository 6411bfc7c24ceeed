//! Predicates over check properties, used for menu selectors and item filters.

use std::{fmt, sync::Arc};

use serde::Deserialize;
use serde_json::Value;

use crate::props::{Props, lookup};

/// Signature of a predicate installed from code rather than configuration.
pub type PredicateFn = dyn Fn(&Props) -> bool + Send + Sync;

/// A boolean test over check properties.
///
/// The declarative variants can be written in RON, e.g.
/// `all([present("nearbyToolData"), eq("toolName", "Length")])`.
#[derive(Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Predicate {
    /// Always matches.
    Always,
    /// Never matches.
    Never,
    /// Matches when the path resolves to a non-null value.
    Present(String),
    /// Matches when the path is missing or null.
    Absent(String),
    /// Matches when the path resolves to exactly this value.
    Eq(String, Value),
    /// Matches when the path resolves to any of the listed values.
    OneOf(String, Vec<Value>),
    /// Matches when every inner predicate matches (true when empty).
    All(Vec<Self>),
    /// Matches when at least one inner predicate matches (false when empty).
    Any(Vec<Self>),
    /// Negation.
    Not(Box<Self>),
    /// Closure installed from code.
    #[serde(skip)]
    Custom(Arc<PredicateFn>),
}

impl Predicate {
    /// Wrap a closure as a predicate.
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&Props) -> bool + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(f))
    }

    /// Evaluate against a set of check properties.
    pub fn eval(&self, props: &Props) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Present(path) => lookup(props, path).is_some(),
            Self::Absent(path) => lookup(props, path).is_none(),
            Self::Eq(path, want) => lookup(props, path) == Some(want),
            Self::OneOf(path, options) => {
                lookup(props, path).is_some_and(|v| options.iter().any(|o| o == v))
            }
            Self::All(inner) => inner.iter().all(|p| p.eval(props)),
            Self::Any(inner) => inner.iter().any(|p| p.eval(props)),
            Self::Not(inner) => !inner.eval(props),
            Self::Custom(f) => f(props),
        }
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Always => f.write_str("Always"),
            Self::Never => f.write_str("Never"),
            Self::Present(p) => f.debug_tuple("Present").field(p).finish(),
            Self::Absent(p) => f.debug_tuple("Absent").field(p).finish(),
            Self::Eq(p, v) => f.debug_tuple("Eq").field(p).field(v).finish(),
            Self::OneOf(p, v) => f.debug_tuple("OneOf").field(p).field(v).finish(),
            Self::All(v) => f.debug_tuple("All").field(v).finish(),
            Self::Any(v) => f.debug_tuple("Any").field(v).finish(),
            Self::Not(v) => f.debug_tuple("Not").field(v).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl PartialEq for Predicate {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Always, Self::Always) | (Self::Never, Self::Never) => true,
            (Self::Present(a), Self::Present(b)) | (Self::Absent(a), Self::Absent(b)) => a == b,
            (Self::Eq(a, x), Self::Eq(b, y)) => a == b && x == y,
            (Self::OneOf(a, x), Self::OneOf(b, y)) => a == b && x == y,
            (Self::All(a), Self::All(b)) | (Self::Any(a), Self::Any(b)) => a == b,
            (Self::Not(a), Self::Not(b)) => a == b,
            (Self::Custom(a), Self::Custom(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}
