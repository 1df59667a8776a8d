//! Endpoint selection parameters and the registry key derived from them.

use serde::{Deserialize, Serialize};
use std::{fmt, time::Duration};
use url::Url;

use crate::utils::http::RetryConfig;

/// Per-call timeout applied when a network does not configure one
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// How the max-gap distance is compared when deciding endpoint eligibility
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum GapBoundary {
	/// `max_height - height <= max_gap`
	#[default]
	Inclusive,
	/// `max_height - height < max_gap`
	Strict,
}

impl GapBoundary {
	/// Whether `height` is close enough to `max_height`
	pub fn within(&self, max_height: u64, height: u64, max_gap: u64) -> bool {
		let lag = max_height.saturating_sub(height);
		match self {
			GapBoundary::Inclusive => lag <= max_gap,
			GapBoundary::Strict => lag < max_gap,
		}
	}
}

impl fmt::Display for GapBoundary {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			GapBoundary::Inclusive => write!(f, "inclusive"),
			GapBoundary::Strict => write!(f, "strict"),
		}
	}
}

/// Runtime parameters of one endpoint pool.
///
/// Only the chain id, the endpoint list, the poll interval, the max gap and the gap
/// boundary take part in the [`RegistryKey`]. The remaining fields tune how endpoints are
/// constructed and are taken from whichever config created the pool first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionConfig {
	pub chain_id: u64,
	/// Endpoint addresses in priority order
	pub endpoints: Vec<String>,
	pub poll_interval: Duration,
	pub max_gap: u64,
	pub gap_boundary: GapBoundary,
	pub request_timeout: Duration,
	/// Fail construction when no endpoint answers the warm-up poll
	pub require_reachable_on_start: bool,
	pub retry: RetryConfig,
	/// Neo N3 network magic, checked against wallets before signing
	pub network_magic: Option<u32>,
}

impl SelectionConfig {
	pub fn new(chain_id: u64, endpoints: Vec<String>, poll_interval: Duration, max_gap: u64) -> Self {
		Self {
			chain_id,
			endpoints,
			poll_interval,
			max_gap,
			gap_boundary: GapBoundary::default(),
			request_timeout: DEFAULT_REQUEST_TIMEOUT,
			require_reachable_on_start: false,
			retry: RetryConfig::default(),
			network_magic: None,
		}
	}

	pub fn with_gap_boundary(mut self, gap_boundary: GapBoundary) -> Self {
		self.gap_boundary = gap_boundary;
		self
	}

	pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
		self.request_timeout = timeout;
		self
	}

	pub fn with_require_reachable_on_start(mut self, required: bool) -> Self {
		self.require_reachable_on_start = required;
		self
	}

	pub fn with_retry(mut self, retry: RetryConfig) -> Self {
		self.retry = retry;
		self
	}

	pub fn with_network_magic(mut self, magic: u32) -> Self {
		self.network_magic = Some(magic);
		self
	}

	pub fn key(&self) -> RegistryKey {
		RegistryKey::from_config(self)
	}
}

/// Deterministic identity of a [`SelectionConfig`].
///
/// Format: `{chain_id}:{addr1},{addr2},...:{interval_ms}:{max_gap}:{boundary}`.
/// Addresses are normalized but keep their order, which defines index priority. The poll
/// interval is keyed in whole milliseconds: configs differing only below a millisecond share
/// one pool and run at the interval of whichever created it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegistryKey(String);

impl RegistryKey {
	pub fn from_config(config: &SelectionConfig) -> Self {
		let endpoints = config
			.endpoints
			.iter()
			.map(|address| normalize_endpoint(address))
			.collect::<Vec<_>>()
			.join(",");

		Self(format!(
			"{}:{}:{}:{}:{}",
			config.chain_id,
			endpoints,
			config.poll_interval.as_millis(),
			config.max_gap,
			config.gap_boundary
		))
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for RegistryKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl AsRef<str> for RegistryKey {
	fn as_ref(&self) -> &str {
		&self.0
	}
}

/// Trims the address, lower-cases scheme and host and drops trailing slashes.
///
/// Addresses that do not parse as URLs are only trimmed.
pub fn normalize_endpoint(address: &str) -> String {
	let trimmed = address.trim();
	match Url::parse(trimmed) {
		Ok(url) => url.as_str().trim_end_matches('/').to_string(),
		Err(_) => trimmed.trim_end_matches('/').to_string(),
	}
}
