//! Routing error definitions.

use axum::http::Method;
use thiserror::Error;

/// Errors returned when generating a URL for a route.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UrlError {
    /// No route was registered under the requested name.
    #[error("{name}: route not found")]
    RouteNotFound { name: String },

    /// Fewer values than the route has placeholders.
    #[error("not enough parameters ({given} < {expected})")]
    NotEnoughParameters { given: usize, expected: usize },

    /// A value was rejected by the condition at its position.
    #[error("invalid parameter: {value:?} does not match the conditions")]
    InvalidParameter { value: String },
}

/// Route table definition mistakes.
///
/// These are raised as panics during registration: a table that produces
/// them cannot serve correctly.
#[derive(Debug, Error)]
pub enum RouteError {
    /// A condition referenced a name that is not a placeholder.
    #[error("unknown parameter: {name} (in {pattern:?})")]
    UnknownParameter { name: String, pattern: String },

    /// The path matcher refused a compiled pattern.
    #[error("cannot register {method} {pattern:?}: {source}")]
    Conflict {
        method: Method,
        pattern: String,
        #[source]
        source: matchit::InsertError,
    },
}
