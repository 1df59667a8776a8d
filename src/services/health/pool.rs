//! Health records of the endpoints of one pool.
//!
//! [`NodePool`] keeps one [`EndpointHealth`] per configured endpoint, in configured order,
//! plus the highest known-good height across them. The height monitor is the only writer:
//! it applies a whole poll pass under a single write lock, so readers never observe a
//! partially applied pass.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;

/// Health of a single endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointHealth {
	/// Connection address, the endpoint's identity
	pub address: String,
	/// Last known-good height, 0 until the first successful poll
	pub height: u64,
	/// Error of the most recent poll, cleared on success
	pub last_error: Option<String>,
	/// Time of the most recent poll, successful or not
	pub last_updated: Option<DateTime<Utc>>,
	pub consecutive_failures: u32,
	/// Whether any poll ever succeeded
	pub has_observation: bool,
}

impl EndpointHealth {
	pub fn new(address: impl Into<String>) -> Self {
		Self {
			address: address.into(),
			height: 0,
			last_error: None,
			last_updated: None,
			consecutive_failures: 0,
			has_observation: false,
		}
	}

	pub fn record_success(&mut self, height: u64, at: DateTime<Utc>) {
		self.height = height;
		self.last_error = None;
		self.last_updated = Some(at);
		self.consecutive_failures = 0;
		self.has_observation = true;
	}

	/// Keeps the last known-good height
	pub fn record_failure(&mut self, error: impl Into<String>, at: DateTime<Utc>) {
		self.last_error = Some(error.into());
		self.last_updated = Some(at);
		self.consecutive_failures = self.consecutive_failures.saturating_add(1);
	}

	pub fn is_failing(&self) -> bool {
		self.last_error.is_some()
	}
}

/// Result of polling one endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
	Height(u64),
	Failed(String),
}

/// Point-in-time copy of a pool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolSnapshot {
	pub endpoints: Vec<EndpointHealth>,
	pub max_height: u64,
}

impl PoolSnapshot {
	/// Whether any endpoint ever answered
	pub fn is_warm(&self) -> bool {
		self.endpoints.iter().any(|e| e.has_observation)
	}

	/// Endpoints whose last poll succeeded
	pub fn healthy_count(&self) -> usize {
		self.endpoints
			.iter()
			.filter(|e| e.has_observation && !e.is_failing())
			.count()
	}
}

#[derive(Debug)]
struct PoolState {
	endpoints: Vec<EndpointHealth>,
	max_height: u64,
}

impl PoolState {
	fn recompute_max(&mut self) {
		self.max_height = self
			.endpoints
			.iter()
			.filter(|e| e.has_observation)
			.map(|e| e.height)
			.max()
			.unwrap_or(0);
	}
}

#[derive(Debug)]
pub struct NodePool {
	state: RwLock<PoolState>,
}

impl NodePool {
	pub fn new<S: AsRef<str>>(addresses: &[S]) -> Self {
		Self {
			state: RwLock::new(PoolState {
				endpoints: addresses
					.iter()
					.map(|a| EndpointHealth::new(a.as_ref()))
					.collect(),
				max_height: 0,
			}),
		}
	}

	pub fn len(&self) -> usize {
		self.state.read().endpoints.len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Applies one poll pass, `outcomes[i]` belonging to endpoint `i`, and returns the new
	/// max height.
	///
	/// Outcomes beyond the number of endpoints are ignored.
	pub fn apply(&self, outcomes: &[PollOutcome], at: DateTime<Utc>) -> u64 {
		let mut state = self.state.write();
		for (endpoint, outcome) in state.endpoints.iter_mut().zip(outcomes) {
			match outcome {
				PollOutcome::Height(height) => endpoint.record_success(*height, at),
				PollOutcome::Failed(error) => endpoint.record_failure(error.as_str(), at),
			}
		}
		state.recompute_max();
		state.max_height
	}

	pub fn max_height(&self) -> u64 {
		self.state.read().max_height
	}

	pub fn snapshot(&self) -> PoolSnapshot {
		let state = self.state.read();
		PoolSnapshot {
			endpoints: state.endpoints.clone(),
			max_height: state.max_height,
		}
	}

	/// Runs `f` over the endpoints and max height under the read lock
	pub fn with_endpoints<R>(&self, f: impl FnOnce(&[EndpointHealth], u64) -> R) -> R {
		let state = self.state.read();
		f(&state.endpoints, state.max_height)
	}
}
