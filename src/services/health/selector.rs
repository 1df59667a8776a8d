//! Endpoint selection over a [`NodePool`].
//!
//! - `index()` returns the endpoint with the highest known height
//! - `select()` returns a random endpoint among those close enough to the best height
//!
//! Both only take the pool's read lock and never perform I/O.

use rand::seq::IndexedRandom;
use std::sync::Arc;

use crate::{
	models::GapBoundary,
	services::health::{EndpointHealth, NodePool},
};

/// Position of the highest observed height, ties going to the lowest position.
///
/// Returns 0 when no endpoint has ever answered.
pub fn best_index(endpoints: &[EndpointHealth]) -> usize {
	let mut best: Option<(usize, u64)> = None;
	for (position, endpoint) in endpoints.iter().enumerate() {
		if !endpoint.has_observation {
			continue;
		}
		if best.is_none_or(|(_, height)| endpoint.height > height) {
			best = Some((position, endpoint.height));
		}
	}
	best.map(|(position, _)| position).unwrap_or(0)
}

/// Positions of observed endpoints within `max_gap` of `max_height`
pub fn eligible_indices(
	endpoints: &[EndpointHealth],
	max_height: u64,
	max_gap: u64,
	boundary: GapBoundary,
) -> Vec<usize> {
	endpoints
		.iter()
		.enumerate()
		.filter(|(_, e)| e.has_observation && boundary.within(max_height, e.height, max_gap))
		.map(|(position, _)| position)
		.collect()
}

#[derive(Debug, Clone)]
pub struct Selector {
	pool: Arc<NodePool>,
	max_gap: u64,
	boundary: GapBoundary,
}

impl Selector {
	pub fn new(pool: Arc<NodePool>, max_gap: u64, boundary: GapBoundary) -> Self {
		Self {
			pool,
			max_gap,
			boundary,
		}
	}

	/// Position of the most advanced endpoint
	pub fn index(&self) -> usize {
		self.pool.with_endpoints(|endpoints, _| best_index(endpoints))
	}

	/// Uniformly random position among eligible endpoints, falling back to [`Self::index`]
	pub fn select(&self) -> usize {
		self.pool.with_endpoints(|endpoints, max_height| {
			let eligible = eligible_indices(endpoints, max_height, self.max_gap, self.boundary);
			match eligible.choose(&mut rand::rng()) {
				Some(position) => *position,
				None => best_index(endpoints),
			}
		})
	}

	/// False until at least one endpoint has answered a poll
	pub fn is_warm(&self) -> bool {
		self.pool
			.with_endpoints(|endpoints, _| endpoints.iter().any(|e| e.has_observation))
	}

	pub fn max_gap(&self) -> u64 {
		self.max_gap
	}

	pub fn boundary(&self) -> GapBoundary {
		self.boundary
	}
}
