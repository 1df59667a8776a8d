//! Utility modules for common functionality.
//!
//! - client_storage: keyed storage of shared clients with single initialization
//! - http: retryable HTTP client construction
//! - logging: logging setup and the structured error context
//! - macros: macros for common functionality
//! - metrics: Prometheus metrics and their HTTP server
//! - parsing: parsing utilities
//! - tests: test builders and helpers

pub mod client_storage;
pub mod http;
pub mod logging;
pub mod macros;
pub mod metrics;
pub mod parsing;

pub use client_storage::ClientStorage;
pub use http::*;
pub use parsing::*;
