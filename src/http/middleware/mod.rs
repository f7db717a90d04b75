//! Handler-wrapping middleware and ordered middleware chains.
//!
//! # Data Flow
//! ```text
//! chain [m0, m1, m2] wrapping handler h
//!     → m0(m1(m2(h)))
//!     → m0 sees the request first and the response last
//! ```
//!
//! # Design Decisions
//! - A chain is append-only inside a scope and copied, never shared, into
//!   child scopes
//! - Middleware identity is the shared closure, so two chains cloned from a
//!   common ancestor can tell which entries they have in common

pub mod request_id;

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use axum::{body::Body, http::Request, response::IntoResponse};

use crate::http::handler::Handler;

pub use request_id::{request_id, RequestId, RequestIdExt, X_REQUEST_ID};

/// A function from the next handler to a wrapping handler.
#[derive(Clone)]
pub struct Middleware(Arc<dyn Fn(Handler) -> Handler + Send + Sync>);

impl Middleware {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(Handler) -> Handler + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Build middleware from an async function receiving the request and the
    /// next handler, in the manner of `axum::middleware::from_fn`.
    pub fn from_fn<F, Fut, R>(f: F) -> Self
    where
        F: Fn(Request<Body>, Handler) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = R> + Send + 'static,
        R: IntoResponse,
    {
        let f = Arc::new(f);
        Self::new(move |next| {
            let f = Arc::clone(&f);
            Handler::new(move |req| f(req, next.clone()))
        })
    }

    pub fn apply(&self, next: Handler) -> Handler {
        (self.0)(next)
    }

    fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Middleware {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Middleware(..)")
    }
}

/// Ordered middleware, outermost first.
#[derive(Debug, Clone, Default)]
pub struct MiddlewareChain {
    entries: Vec<Middleware>,
}

impl MiddlewareChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, middleware: impl IntoIterator<Item = Middleware>) {
        self.entries.extend(middleware);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Compose around `handler` so that index 0 is outermost.
    pub fn wrap(&self, handler: Handler) -> Handler {
        self.entries
            .iter()
            .rev()
            .fold(handler, |next, middleware| middleware.apply(next))
    }

    /// Longest run of leading entries `self` and `other` share by identity.
    pub(crate) fn shared_prefix(&self, other: &MiddlewareChain) -> MiddlewareChain {
        MiddlewareChain {
            entries: self.entries[..self.shared_len(other)].to_vec(),
        }
    }

    /// Entries of `self` not already present, by identity, at the front of
    /// `applied`.
    pub(crate) fn remaining_after(&self, applied: &MiddlewareChain) -> MiddlewareChain {
        MiddlewareChain {
            entries: self.entries[self.shared_len(applied)..].to_vec(),
        }
    }

    fn shared_len(&self, other: &MiddlewareChain) -> usize {
        self.entries
            .iter()
            .zip(&other.entries)
            .take_while(|(a, b)| a.ptr_eq(b))
            .count()
    }
}
