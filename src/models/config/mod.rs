//! Configuration loading and validation.
//!
//! Network definitions are read from JSON files through the [`ConfigLoader`] trait.

#![allow(clippy::result_large_err)]

use async_trait::async_trait;
use std::path::Path;

mod error;
mod network_config;

pub use error::ConfigError;

/// Common interface for loading configuration files
#[async_trait]
pub trait ConfigLoader: Sized {
	/// Load all configuration files from a directory
	///
	/// If no path is provided, uses the default config directory.
	async fn load_all<T>(path: Option<&Path>) -> Result<T, ConfigError>
	where
		T: FromIterator<(String, Self)>;

	/// Load configuration from a specific file path
	async fn load_from_path(path: &Path) -> Result<Self, ConfigError>;

	/// Validate the configuration
	fn validate(&self) -> Result<(), ConfigError>;

	/// Logs a warning when the configuration uses an insecure protocol
	fn validate_protocol(&self);

	/// Check if a file is a JSON file based on extension
	fn is_json_file(path: &Path) -> bool {
		path.extension()
			.map(|ext| ext.to_string_lossy().to_lowercase() == "json")
			.unwrap_or(false)
	}

	/// Resolve all secrets in the configuration
	async fn resolve_secrets(&self) -> Result<Self, ConfigError>;

	/// Rejects `current_instance` if it collides with one of `instances`.
	///
	/// `file_path` is only used in the error metadata.
	fn validate_uniqueness(
		instances: &[&Self],
		current_instance: &Self,
		file_path: &str,
	) -> Result<(), ConfigError>;
}
