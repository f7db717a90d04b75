//! Fallback responses produced by the router itself.
//!
//! # Responsibilities
//! - Default not-found and method-not-allowed handlers
//! - Automatic OPTIONS answers
//! - Trailing-slash redirects
//! - Panic reporting hook
//!
//! # Design Decisions
//! - GET/HEAD redirects use 301; other methods use 308 so the body and
//!   method survive the redirect

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
};

use crate::http::handler::Handler;

/// Methods accepted for a path, attached to requests that reach the
/// method-not-allowed handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowedMethods(pub Vec<Method>);

impl AllowedMethods {
    /// Comma-separated form used by the `Allow` header.
    pub fn header_value(&self) -> String {
        self.0
            .iter()
            .map(Method::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

pub fn not_found() -> Handler {
    Handler::fixed((StatusCode::NOT_FOUND, "404 page not found\n"))
}

/// Default 405 handler; sets `Allow` from the request's [`AllowedMethods`].
pub fn method_not_allowed() -> Handler {
    Handler::new(|req: axum::http::Request<axum::body::Body>| {
        let allow = req
            .extensions()
            .get::<AllowedMethods>()
            .map(AllowedMethods::header_value)
            .unwrap_or_default();
        async move {
            (
                StatusCode::METHOD_NOT_ALLOWED,
                [(header::ALLOW, allow)],
                "405 method not allowed\n",
            )
        }
    })
}

/// Empty 200 answer to an OPTIONS request, listing the accepted methods.
pub fn options(allowed: &AllowedMethods) -> Response {
    (StatusCode::OK, [(header::ALLOW, allowed.header_value())]).into_response()
}

/// Redirect to `location`, keeping the query string of `uri`.
pub fn redirect(method: &Method, uri: &Uri, location: &str) -> Response {
    let status = if *method == Method::GET || *method == Method::HEAD {
        StatusCode::MOVED_PERMANENTLY
    } else {
        StatusCode::PERMANENT_REDIRECT
    };

    let target = match uri.query() {
        Some(query) => format!("{location}?{query}"),
        None => location.to_string(),
    };

    match HeaderValue::from_str(&target) {
        Ok(value) => (status, [(header::LOCATION, value)]).into_response(),
        Err(_) => StatusCode::BAD_REQUEST.into_response(),
    }
}

/// Details handed to a panic handler.
pub struct PanicReport {
    pub method: Method,
    pub uri: Uri,
    pub payload: Box<dyn Any + Send>,
}

impl PanicReport {
    /// Panic message when the payload is a string.
    pub fn message(&self) -> Option<&str> {
        self.payload
            .downcast_ref::<&'static str>()
            .copied()
            .or_else(|| self.payload.downcast_ref::<String>().map(String::as_str))
    }
}

impl fmt::Debug for PanicReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PanicReport")
            .field("method", &self.method)
            .field("uri", &self.uri)
            .field("message", &self.message())
            .finish()
    }
}

/// Recovers from a handler panic by producing a response.
pub type PanicHandler = Arc<dyn Fn(PanicReport) -> Response + Send + Sync>;
