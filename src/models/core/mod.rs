//! Core domain models.
//!
//! - Networks: chain definitions and their RPC endpoints
//! - Selection: endpoint pool parameters and the registry key derived from them

mod network;
mod selection;

pub use network::{Network, RpcUrl};
pub use selection::{
	normalize_endpoint, GapBoundary, RegistryKey, SelectionConfig, DEFAULT_REQUEST_TIMEOUT,
};
