use proptest::{prelude::*, test_runner::Config};
use std::time::Duration;

use relayer_chain_sdk::models::{normalize_endpoint, RegistryKey, SelectionConfig};

use crate::properties::strategies::{boundary_strategy, endpoint_strategy};

fn config(chain_id: u64, endpoints: Vec<String>, interval_ms: u64, max_gap: u64) -> SelectionConfig {
	SelectionConfig::new(chain_id, endpoints, Duration::from_millis(interval_ms), max_gap)
}

proptest! {
	#![proptest_config(Config {
		failure_persistence: None,
		..Config::default()
	})]

	#[test]
	fn test_key_is_deterministic(
		chain_id in any::<u64>(),
		endpoints in prop::collection::vec(endpoint_strategy(), 1..5),
		interval_ms in 1u64..600_000,
		max_gap in 0u64..100,
		boundary in boundary_strategy(),
	) {
		let a = config(chain_id, endpoints.clone(), interval_ms, max_gap).with_gap_boundary(boundary);
		let decorated: Vec<String> = endpoints
			.iter()
			.map(|e| format!("  {}/ ", e.to_uppercase().replacen("HTTP://", "http://", 1)))
			.collect();
		let b = config(chain_id, decorated, interval_ms, max_gap)
			.with_gap_boundary(boundary)
			.with_request_timeout(Duration::from_secs(3));

		prop_assert_eq!(RegistryKey::from_config(&a), a.key());
		prop_assert_eq!(a.key(), b.key());
	}

	#[test]
	fn test_key_distinguishes_parameters(
		chain_id in 0u64..u64::MAX,
		endpoints in prop::collection::vec(endpoint_strategy(), 1..5),
		interval_ms in 1u64..600_000,
		max_gap in 0u64..100,
	) {
		let base = config(chain_id, endpoints.clone(), interval_ms, max_gap);
		prop_assert_ne!(base.key(), config(chain_id + 1, endpoints.clone(), interval_ms, max_gap).key());
		prop_assert_ne!(base.key(), config(chain_id, endpoints.clone(), interval_ms + 1, max_gap).key());
		prop_assert_ne!(base.key(), config(chain_id, endpoints.clone(), interval_ms, max_gap + 1).key());

		let mut extended = endpoints.clone();
		extended.push("http://extra.node:1".to_string());
		prop_assert_ne!(base.key(), config(chain_id, extended, interval_ms, max_gap).key());
	}

	#[test]
	fn test_normalize_endpoint_is_idempotent(endpoint in endpoint_strategy()) {
		let once = normalize_endpoint(&endpoint);
		prop_assert_eq!(normalize_endpoint(&once), once.clone());
		prop_assert!(!once.ends_with('/'));
	}
}
