use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::{
	models::{BlockChainType, GapBoundary, SecretValue, SelectionConfig},
	utils::http::RetryConfig,
};

/// Configuration of one chain served by an endpoint pool.
///
/// Defines the endpoints and the polling and selection parameters of a chain, for both
/// Neo N3 and EVM-compatible networks.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Network {
	/// Type of blockchain (Neo3, EVM)
	pub network_type: BlockChainType,

	/// Unique identifier for this network
	pub slug: String,

	/// Human-readable name of the network
	pub name: String,

	/// Chain identifier used by the relayer
	pub chain_id: u64,

	/// RPC endpoints in priority order
	pub rpc_urls: Vec<RpcUrl>,

	/// How often every endpoint's height is polled
	pub poll_interval_ms: u64,

	/// Maximum distance from the best height for an endpoint to stay selectable
	pub max_gap: u64,

	/// Whether an endpoint exactly `max_gap` behind is still selectable
	#[serde(default)]
	pub gap_boundary: GapBoundary,

	/// Network magic of Neo N3 networks
	#[serde(default)]
	pub network_magic: Option<u32>,

	/// Timeout of a single RPC call
	#[serde(default)]
	pub request_timeout_ms: Option<u64>,

	/// Refuse to build the pool when no endpoint is reachable
	#[serde(default)]
	pub require_reachable_on_start: bool,

	/// HTTP retry policy for transient failures (disabled by default)
	#[serde(default)]
	pub rpc_retry: RetryConfig,
}

/// RPC endpoint configuration
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RpcUrl {
	/// Type of RPC endpoint (e.g. "rpc")
	pub type_: String,

	/// URL of the RPC endpoint (can be a secret value)
	pub url: SecretValue,

	/// Weight of the endpoint, 0 disables it (0-100)
	pub weight: u32,
}

impl Network {
	/// Selection parameters of this network.
	///
	/// Only enabled `rpc` endpoints are kept, in the order they appear in the file.
	/// Secrets must be resolved beforehand.
	pub fn selection_config(&self) -> SelectionConfig {
		let endpoints = self
			.rpc_urls
			.iter()
			.filter(|rpc_url| rpc_url.type_ == "rpc" && rpc_url.weight > 0)
			.map(|rpc_url| rpc_url.url.as_str().to_string())
			.collect();

		let mut config = SelectionConfig::new(
			self.chain_id,
			endpoints,
			Duration::from_millis(self.poll_interval_ms),
			self.max_gap,
		)
		.with_gap_boundary(self.gap_boundary)
		.with_require_reachable_on_start(self.require_reachable_on_start)
		.with_retry(self.rpc_retry.clone());

		if let Some(timeout_ms) = self.request_timeout_ms {
			config = config.with_request_timeout(Duration::from_millis(timeout_ms));
		}
		if let Some(magic) = self.network_magic {
			config = config.with_network_magic(magic);
		}
		config
	}
}
