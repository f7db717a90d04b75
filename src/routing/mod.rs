//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route Registration (at startup):
//!     Router / Scope (prefix, conditions, middleware)
//!     → pattern.rs (placeholders, compiled matcher pattern)
//!     → route.rs (Route + RouteBuilder: conditions, name, handler)
//!     → registry.rs (candidate lists per method + compiled pattern)
//!     → router.rs (freeze into RouterService)
//!
//! Incoming Request (method, path):
//!     → matcher.rs (radix lookup per method)
//!     → dispatch.rs (first candidate whose conditions accept the captures)
//!     → route handler, or a fallback handler
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - Regexes only run when several routes share one compiled pattern, or
//!   when a route constrains its parameters
//! - Deterministic: same input always matches same route
//! - First registered candidate wins among routes sharing a pattern

pub mod conditions;
pub mod dispatch;
pub mod error;
pub(crate) mod matcher;
pub mod pattern;
pub mod registry;
pub mod route;
pub mod router;
pub mod scope;

pub use conditions::{Condition, Conditions};
pub use dispatch::RouterService;
pub use error::{RouteError, UrlError};
pub use pattern::Pattern;
pub use route::{Route, RouteBuilder, RouteId};
pub use router::Router;
pub use scope::{Registrar, Scope, ScopeState};
