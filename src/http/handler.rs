//! Type-erased request handlers.
//!
//! # Design Decisions
//! - A handler is a shared async function `Request -> Response`
//! - Anything returning `impl IntoResponse` can be turned into a handler
//! - Cloning a handler clones an `Arc`, never the closure

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use axum::{
    body::Body,
    http::Request,
    response::{IntoResponse, Response},
};
use futures_util::future::BoxFuture;

/// Boxed future produced by a [`Handler`].
pub type HandlerFuture = BoxFuture<'static, Response>;

/// A terminal request handler.
#[derive(Clone)]
pub struct Handler(Arc<dyn Fn(Request<Body>) -> HandlerFuture + Send + Sync>);

impl Handler {
    /// Wrap an async function.
    pub fn new<F, Fut, R>(f: F) -> Self
    where
        F: Fn(Request<Body>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = R> + Send + 'static,
        R: IntoResponse,
    {
        Self(Arc::new(move |req| {
            let fut = f(req);
            Box::pin(async move { fut.await.into_response() })
        }))
    }

    /// A handler that always answers with the same response parts.
    pub fn fixed<R>(response: R) -> Self
    where
        R: IntoResponse + Clone + Send + Sync + 'static,
    {
        Self::new(move |_req| {
            let response = response.clone();
            async move { response }
        })
    }

    pub fn call(&self, req: Request<Body>) -> HandlerFuture {
        (self.0)(req)
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Handler(..)")
    }
}
