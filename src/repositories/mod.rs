//! Repository implementations for configuration management.
//!
//! Network definitions are loaded from a directory of JSON files, validated, and served
//! through [`NetworkService`].

mod error;
mod network;

pub use error::RepositoryError;
pub use network::{NetworkRepository, NetworkRepositoryTrait, NetworkService};
