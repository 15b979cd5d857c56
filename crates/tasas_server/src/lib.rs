//! HTTP API for the interest-rate dashboard.
//!
//! Serves the dashboard recomputation over [`tasas_core`], the dropdown
//! options, the rating guide, and the CSV/Excel downloads. The dataset is
//! loaded once at startup and shared read-only through the router state.

pub mod config;
pub mod error;
pub mod routes;
pub mod server;

pub use tasas_core;

/// Server version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
