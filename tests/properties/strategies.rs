//! Shared proptest strategies.

use proptest::{option, prelude::*};
use relayer_chain_sdk::{
	models::{BlockChainType, GapBoundary, Network},
	services::health::PollOutcome,
	utils::tests::builders::network::NetworkBuilder,
};

/// Heights near a common tip so that gaps and ties are frequent
pub fn heights_strategy() -> impl Strategy<Value = Vec<Option<u64>>> {
	prop::collection::vec(option::weighted(0.8, 1_000u64..1_020), 1..8)
}

pub fn outcomes_strategy(len: usize) -> impl Strategy<Value = Vec<PollOutcome>> {
	prop::collection::vec(
		prop_oneof![
			3 => (0u64..5_000).prop_map(PollOutcome::Height),
			1 => "[a-z ]{1,20}".prop_map(PollOutcome::Failed),
		],
		len,
	)
}

pub fn boundary_strategy() -> impl Strategy<Value = GapBoundary> {
	prop_oneof![Just(GapBoundary::Inclusive), Just(GapBoundary::Strict)]
}

pub fn endpoint_strategy() -> impl Strategy<Value = String> {
	("[a-z]{1,8}", 1u16..65_535).prop_map(|(host, port)| format!("http://{}.node:{}", host, port))
}

pub fn network_strategy() -> impl Strategy<Value = Network> {
	(
		"[a-z0-9_]{1,12}",
		"[A-Za-z ]{1,16}",
		any::<u64>(),
		prop::collection::vec(endpoint_strategy(), 1..4),
		1u64..120_000,
		0u64..16,
		prop_oneof![Just(BlockChainType::Neo3), Just(BlockChainType::EVM)],
	)
		.prop_map(|(slug, name, chain_id, urls, interval, max_gap, network_type)| {
			NetworkBuilder::new()
				.slug(&slug)
				.name(&name)
				.chain_id(chain_id)
				.network_type(network_type)
				.rpc_urls(urls.iter().map(String::as_str).collect())
				.poll_interval_ms(interval)
				.max_gap(max_gap)
				.build()
		})
}
