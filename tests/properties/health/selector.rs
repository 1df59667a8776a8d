use chrono::Utc;
use proptest::{prelude::*, test_runner::Config};

use relayer_chain_sdk::{
	models::GapBoundary,
	services::health::{best_index, eligible_indices, EndpointHealth, NodePool, PollOutcome, Selector},
};
use std::sync::Arc;

use crate::properties::strategies::{boundary_strategy, heights_strategy};

/// Pool where `None` marks an endpoint that never answered
fn pool(heights: &[Option<u64>]) -> Arc<NodePool> {
	let addresses: Vec<String> = (0..heights.len()).map(|i| format!("http://n{}", i)).collect();
	let pool = NodePool::new(&addresses);
	let outcomes: Vec<PollOutcome> = heights
		.iter()
		.map(|h| match h {
			Some(height) => PollOutcome::Height(*height),
			None => PollOutcome::Failed("unreachable".to_string()),
		})
		.collect();
	pool.apply(&outcomes, Utc::now());
	Arc::new(pool)
}

proptest! {
	#![proptest_config(Config {
		failure_persistence: None,
		..Config::default()
	})]

	#[test]
	fn test_index_is_first_maximum(heights in heights_strategy()) {
		let selector = Selector::new(pool(&heights), 0, GapBoundary::Inclusive);
		let index = selector.index();

		match heights.iter().flatten().max() {
			Some(max) => {
				prop_assert_eq!(heights[index], Some(*max));
				prop_assert!(heights[..index].iter().all(|h| h.is_none_or(|h| h < *max)));
			}
			None => prop_assert_eq!(index, 0),
		}
	}

	#[test]
	fn test_select_stays_within_gap(
		heights in heights_strategy(),
		max_gap in 0u64..10,
		boundary in boundary_strategy(),
	) {
		let selector = Selector::new(pool(&heights), max_gap, boundary);
		let max = heights.iter().flatten().max().copied();

		for _ in 0..16 {
			let position = selector.select();
			prop_assert!(position < heights.len());
			if let Some(max) = max {
				let eligible = heights.iter().flatten().any(|h| boundary.within(max, *h, max_gap));
				if eligible {
					let height = heights[position];
					prop_assert!(height.is_some());
					prop_assert!(boundary.within(max, height.unwrap_or_default(), max_gap));
				} else {
					prop_assert_eq!(position, selector.index());
				}
			}
		}
	}

	#[test]
	fn test_inclusive_tip_is_always_eligible(heights in heights_strategy(), max_gap in 0u64..10) {
		let pool = pool(&heights);
		let snapshot = pool.snapshot();
		let eligible = eligible_indices(&snapshot.endpoints, snapshot.max_height, max_gap, GapBoundary::Inclusive);

		if snapshot.is_warm() {
			prop_assert!(eligible.contains(&best_index(&snapshot.endpoints)));
		} else {
			prop_assert!(eligible.is_empty());
		}
	}

	#[test]
	fn test_best_index_ignores_unobserved(len in 1usize..8) {
		let endpoints: Vec<EndpointHealth> = (0..len).map(|i| EndpointHealth::new(format!("http://n{}", i))).collect();
		prop_assert_eq!(best_index(&endpoints), 0);
	}
}
