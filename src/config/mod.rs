//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → AppConfig (validated, immutable)
//!     → RouterConfig handed to Router::with_config
//!
//! route map file (TOML/JSON)
//!     → loader.rs (parse into toml::Table)
//!     → route_map.rs (register scopes and routes)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod route_map;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_route_map, ConfigError};
pub use route_map::{RouteMapError, RouteMapParser};
pub use schema::{AppConfig, ListenerConfig, ObservabilityConfig, RouterConfig};
pub use validation::{validate_config, ValidationError};
