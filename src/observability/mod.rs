//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Registration and dispatch produce:
//!     → logging.rs (structured log events via `tracing`)
//!     → metrics.rs (dispatch outcome counters)
//!
//! Consumers:
//!     → stdout (fmt subscriber, filtered by RUST_LOG or config)
//!     → Prometheus scrape endpoint (optional)
//! ```
//!
//! # Design Decisions
//! - The library only emits events; installing subscribers and exporters is
//!   left to the binary
//! - Metric updates are no-ops until a recorder is installed

pub mod logging;
pub mod metrics;
