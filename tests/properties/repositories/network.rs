use proptest::{prelude::*, test_runner::Config};
use std::collections::HashMap;

use relayer_chain_sdk::{
	models::{ConfigLoader, Network},
	repositories::{NetworkRepository, NetworkRepositoryTrait, NetworkService},
};

use crate::properties::strategies::network_strategy;

proptest! {
	#![proptest_config(Config {
		failure_persistence: None,
		..Config::default()
	})]

	#[test]
	fn test_query_operations(
		networks in proptest::collection::hash_map("[a-z0-9_]{1,10}", network_strategy(), 1..8)
	) {
		let repo = NetworkRepository { networks: networks.clone() };

		for (id, network) in &networks {
			let stored = repo.get(id);
			prop_assert_eq!(Some(network), stored.as_ref());
		}
		prop_assert_eq!(networks.clone(), repo.get_all());
		prop_assert_eq!(None, repo.get("non_existent_network"));

		let service = NetworkService::new_with_repository(repo);
		let sorted = service.sorted();
		prop_assert_eq!(sorted.len(), networks.len());
		prop_assert!(sorted.windows(2).all(|w| w[0].slug <= w[1].slug));
	}

	#[test]
	fn test_selection_config_keeps_rpc_order(network in network_strategy()) {
		let config = network.selection_config();
		let expected: Vec<String> = network.rpc_urls.iter().map(|u| u.url.as_str().to_string()).collect();

		prop_assert_eq!(config.endpoints, expected);
		prop_assert_eq!(config.chain_id, network.chain_id);
		prop_assert_eq!(config.max_gap, network.max_gap);
	}

	#[test]
	fn test_uniqueness_rejects_duplicate_slugs(network in network_strategy()) {
		let existing: Vec<&Network> = vec![&network];
		let mut duplicate = network.clone();
		duplicate.name = format!("{} copy", network.name);

		prop_assert!(Network::validate_uniqueness(&existing, &duplicate, "dup.json").is_err());
		let none: Vec<&Network> = Vec::new();
		prop_assert!(Network::validate_uniqueness(&none, &duplicate, "dup.json").is_ok());
	}
}

#[test]
fn test_empty_repository() {
	let repo = NetworkRepository {
		networks: HashMap::new(),
	};
	assert!(repo.get_all().is_empty());
	let service = NetworkService::new_with_repository(repo);
	assert!(service.get_by_slug("anything").is_err());
}
