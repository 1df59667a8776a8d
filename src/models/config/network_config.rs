//! Network configuration loading and validation.
//!
//! Implements [`ConfigLoader`] for [`Network`] so chain definitions can be read from a
//! directory of JSON files.

use async_trait::async_trait;
use std::{collections::HashMap, path::Path};

use crate::{
	models::{config::error::ConfigError, BlockChainType, ConfigLoader, Network, SecretValue},
	utils::normalize_string,
};

/// Lower bound of `poll_interval_ms`
const MIN_POLL_INTERVAL_MS: u64 = 100;

fn path_metadata(path: &Path) -> Option<HashMap<String, String>> {
	Some(HashMap::from([(
		"path".to_string(),
		path.display().to_string(),
	)]))
}

#[async_trait]
impl ConfigLoader for Network {
	/// Resolve all secrets in the network configuration
	async fn resolve_secrets(&self) -> Result<Self, ConfigError> {
		dotenvy::dotenv().ok();
		let mut network = self.clone();

		for rpc_url in &mut network.rpc_urls {
			let resolved_url = rpc_url.url.resolve().await.map_err(|e| {
				ConfigError::parse_error(
					format!("failed to resolve RPC URL: {}", e),
					Some(Box::new(e)),
					None,
				)
			})?;
			rpc_url.url = SecretValue::Plain(resolved_url);
		}
		Ok(network)
	}

	/// Load all network configurations from a directory
	///
	/// Every `*.json` file is parsed, resolved and validated; entries are keyed by file stem.
	async fn load_all<T>(path: Option<&Path>) -> Result<T, ConfigError>
	where
		T: FromIterator<(String, Self)>,
	{
		let network_dir = path.unwrap_or(Path::new("config/networks"));
		let mut pairs = Vec::new();

		if !network_dir.exists() {
			return Err(ConfigError::file_error(
				"networks directory not found",
				None,
				path_metadata(network_dir),
			));
		}

		let mut paths = Vec::new();
		for entry in std::fs::read_dir(network_dir).map_err(|e| {
			ConfigError::file_error(
				format!("failed to read networks directory: {}", e),
				Some(Box::new(e)),
				path_metadata(network_dir),
			)
		})? {
			let entry = entry.map_err(|e| {
				ConfigError::file_error(
					format!("failed to read directory entry: {}", e),
					Some(Box::new(e)),
					path_metadata(network_dir),
				)
			})?;
			paths.push(entry.path());
		}
		// Directory order is platform dependent
		paths.sort();

		for path in paths {
			if !Self::is_json_file(&path) {
				continue;
			}

			let name = path
				.file_stem()
				.and_then(|s| s.to_str())
				.unwrap_or("unknown")
				.to_string();

			let network = Self::load_from_path(&path).await?;

			let existing_networks: Vec<&Network> =
				pairs.iter().map(|(_, network)| network).collect();
			Self::validate_uniqueness(&existing_networks, &network, &path.display().to_string())?;

			pairs.push((name, network));
		}

		Ok(T::from_iter(pairs))
	}

	/// Load a network configuration from a specific file
	async fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
		let file = std::fs::File::open(path).map_err(|e| {
			ConfigError::file_error(
				format!("failed to open network config file: {}", e),
				Some(Box::new(e)),
				path_metadata(path),
			)
		})?;
		let config: Network = serde_json::from_reader(file).map_err(|e| {
			ConfigError::parse_error(
				format!("failed to parse network config: {}", e),
				Some(Box::new(e)),
				path_metadata(path),
			)
		})?;

		let config = config.resolve_secrets().await?;
		config.validate()?;

		Ok(config)
	}

	/// Validate the network configuration
	///
	/// Ensures that:
	/// - The network has a name and a well-formed slug
	/// - At least one enabled `rpc` endpoint with an http(s) URL is configured
	/// - The poll interval and request timeout are usable
	/// - Neo N3 networks declare their network magic
	fn validate(&self) -> Result<(), ConfigError> {
		if self.name.is_empty() {
			return Err(ConfigError::validation_error(
				"Network name is required",
				None,
				None,
			));
		}

		if !self
			.slug
			.chars()
			.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
		{
			return Err(ConfigError::validation_error(
				"Slug must contain only lowercase letters, numbers, and underscores",
				None,
				None,
			));
		}

		let supported_types = ["rpc"];
		if !self
			.rpc_urls
			.iter()
			.all(|rpc_url| supported_types.contains(&rpc_url.type_.as_str()))
		{
			return Err(ConfigError::validation_error(
				format!(
					"RPC URL type must be one of: {}",
					supported_types.join(", ")
				),
				None,
				None,
			));
		}

		if !self.rpc_urls.iter().all(|rpc_url| {
			rpc_url.url.starts_with("http://") || rpc_url.url.starts_with("https://")
		}) {
			return Err(ConfigError::validation_error(
				"All RPC URLs must start with http:// or https://",
				None,
				None,
			));
		}

		if !self.rpc_urls.iter().all(|rpc_url| rpc_url.weight <= 100) {
			return Err(ConfigError::validation_error(
				"All RPC URL weights must be between 0 and 100",
				None,
				None,
			));
		}

		if !self.rpc_urls.iter().any(|rpc_url| rpc_url.weight > 0) {
			return Err(ConfigError::validation_error(
				"At least one RPC URL with a weight above 0 is required",
				None,
				None,
			));
		}

		if self.poll_interval_ms < MIN_POLL_INTERVAL_MS {
			return Err(ConfigError::validation_error(
				format!("Poll interval must be at least {}ms", MIN_POLL_INTERVAL_MS),
				None,
				None,
			));
		}

		if self.request_timeout_ms == Some(0) {
			return Err(ConfigError::validation_error(
				"Request timeout must be greater than 0",
				None,
				None,
			));
		}

		if self.network_type == BlockChainType::Neo3 && self.network_magic.is_none() {
			return Err(ConfigError::validation_error(
				"Neo3 networks require a network_magic",
				None,
				Some(HashMap::from([(
					"network_slug".to_string(),
					self.slug.clone(),
				)])),
			));
		}

		self.validate_protocol();

		Ok(())
	}

	fn validate_protocol(&self) {
		for rpc_url in &self.rpc_urls {
			if rpc_url.url.starts_with("http://") {
				tracing::warn!(
					"Network '{}' uses an insecure RPC URL: {}",
					self.slug,
					rpc_url.url.as_str()
				);
			}
		}
	}

	fn validate_uniqueness(
		instances: &[&Self],
		current_instance: &Self,
		file_path: &str,
	) -> Result<(), ConfigError> {
		let fields = [
			("name", &current_instance.name),
			("slug", &current_instance.slug),
		];

		for (field_name, field_value) in fields {
			if instances.iter().any(|existing_network| {
				let existing_value = match field_name {
					"name" => &existing_network.name,
					_ => &existing_network.slug,
				};
				normalize_string(existing_value) == normalize_string(field_value)
			}) {
				return Err(ConfigError::validation_error(
					format!("Duplicate network {} found: '{}'", field_name, field_value),
					None,
					Some(HashMap::from([
						(format!("network_{}", field_name), field_value.to_string()),
						("path".to_string(), file_path.to_string()),
					])),
				));
			}
		}
		Ok(())
	}
}
