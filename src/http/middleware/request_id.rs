//! Request ID middleware.
//!
//! # Responsibilities
//! - Reuse an incoming `x-request-id` header or generate a UUID v4
//! - Expose the ID to handlers through request extensions
//! - Echo the ID on the response
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing

use axum::{
    body::Body,
    http::{HeaderValue, Request},
};
use uuid::Uuid;

use crate::http::handler::Handler;
use crate::http::middleware::Middleware;

pub const X_REQUEST_ID: &str = "x-request-id";

/// Correlation ID attached to each request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(pub String);

/// Access the request ID stored by [`request_id`].
pub trait RequestIdExt {
    fn request_id(&self) -> Option<&RequestId>;
}

impl<B> RequestIdExt for Request<B> {
    fn request_id(&self) -> Option<&RequestId> {
        self.extensions().get::<RequestId>()
    }
}

/// Middleware that assigns every request an ID.
pub fn request_id() -> Middleware {
    Middleware::from_fn(|mut req: Request<Body>, next: Handler| async move {
        let id = req
            .headers()
            .get(X_REQUEST_ID)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        req.extensions_mut().insert(RequestId(id.clone()));
        let mut res = next.call(req).await;
        if let Ok(value) = HeaderValue::from_str(&id) {
            res.headers_mut().insert(X_REQUEST_ID, value);
        }
        res
    })
}
