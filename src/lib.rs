//! Scoped HTTP request router.
//!
//! Routes are declared with `{name}` and `{name...}` placeholders inside
//! nested scopes that contribute a path prefix, per-parameter conditions and
//! middleware. Routes sharing a compiled pattern are told apart by their
//! conditions at dispatch time; named routes generate URLs.
//!
//! # Architecture Overview
//!
//! ```text
//!     Registration                           Serving
//!     ────────────                           ───────
//!     Router ──group/prefix──▶ Scope         RouterService (tower::Service)
//!        │                       │               │
//!        └──────────┬────────────┘               ▼
//!                   ▼                        matcher (matchit, per method)
//!              Registry ──into_service()──▶      │
//!       routes · candidates · names              ▼
//!                                            first candidate whose
//!                                            conditions accept
//! ```

// Core subsystems
pub mod http;
pub mod routing;

// Cross-cutting concerns
pub mod config;
pub mod observability;

pub use config::schema::{AppConfig, RouterConfig};
pub use http::{Handler, Middleware, Params, ParamsExt};
pub use routing::{Registrar, RouteBuilder, Router, RouterService, Scope, UrlError};
