//! HTTP-facing types used by routes.
//!
//! # Data Flow
//! ```text
//! Request
//!     → middleware/ (wrap handlers: request IDs, custom layers)
//!     → handler.rs (type-erased async route handler)
//!     → params.rs (named parameters read from request extensions)
//!     → response.rs (404/405 fallbacks, redirects, panic reports)
//!     → Response
//! ```

pub mod handler;
pub mod middleware;
pub mod params;
pub mod response;

pub use handler::{Handler, HandlerFuture};
pub use middleware::{request_id, Middleware, MiddlewareChain, RequestId, RequestIdExt, X_REQUEST_ID};
pub use params::{Param, Params, ParamsExt};
pub use response::{AllowedMethods, PanicHandler, PanicReport};
