//! Bootstrap module for loading network configurations and starting endpoint pools.
//!
//! # Services
//! - `NetworkService`: Loaded network configurations
//! - `ChainRegistries`: One pool registry per chain family
//!
//! # Helpers
//! - `start_network_pool`: Starts (or reuses) the pool of a network
//! - `start_network_pools`: Starts the pools of every network, logging failures
//! - `log_pool_status`: Logs the health of every live pool

use std::{collections::HashMap, error::Error, path::Path, sync::Arc};
use tracing::{error, info, warn};

use crate::{
	models::{BlockChainType, Network},
	repositories::{NetworkRepositoryTrait, NetworkService},
	services::{
		blockchain::{BlockChainError, ChainEndpoint, ChainRegistries, ChainSdk},
		health::PoolSnapshot,
	},
};

/// Type alias for handling ServiceResult
pub type Result<T> = std::result::Result<T, Box<dyn Error>>;

type ServiceResult<N> = Result<(
	HashMap<String, Network>,
	Arc<NetworkService<N>>,
	Arc<ChainRegistries>,
)>;

/// Loads the network configurations and creates empty pool registries.
///
/// When no service is given the repository is loaded from `path`, or from
/// `config/networks` when `path` is `None`.
pub async fn initialize_services<N>(
	network_service: Option<NetworkService<N>>,
	path: Option<&Path>,
) -> ServiceResult<N>
where
	N: NetworkRepositoryTrait + Send + Sync + 'static,
{
	let network_service = match network_service {
		Some(service) => service,
		None => {
			let repository = N::new(path).await?;
			NetworkService::<N>::new_with_repository(repository)
		}
	};

	let networks = network_service.get_all();

	Ok((
		networks,
		Arc::new(network_service),
		Arc::new(ChainRegistries::new()),
	))
}

/// Starts the pool of `network`, or returns the state of the pool already serving it
pub async fn start_network_pool(
	registries: &ChainRegistries,
	network: &Network,
) -> std::result::Result<PoolSnapshot, BlockChainError> {
	let config = network.selection_config();
	let snapshot = match network.network_type {
		BlockChainType::Neo3 => registries.neo3.get_or_create(&config).await?.status(),
		BlockChainType::EVM => registries.evm.get_or_create(&config).await?.status(),
	};

	info!(
		network = %network.slug,
		healthy = snapshot.healthy_count(),
		endpoints = snapshot.endpoints.len(),
		max_height = snapshot.max_height,
		"Network pool ready"
	);
	Ok(snapshot)
}

/// Starts the pool of every network and returns how many are running
pub async fn start_network_pools<'a, I>(registries: &ChainRegistries, networks: I) -> usize
where
	I: IntoIterator<Item = &'a Network>,
{
	let mut started = 0;
	for network in networks {
		match start_network_pool(registries, network).await {
			Ok(_) => started += 1,
			Err(e) => error!(network = %network.slug, "Failed to start network pool: {}", e),
		}
	}
	started
}

/// Latest height of `network`, read through its pool
pub async fn read_latest_height(registries: &ChainRegistries, network: &Network) -> Result<u64> {
	let config = network.selection_config();
	let height = match network.network_type {
		BlockChainType::Neo3 => {
			registries
				.neo3
				.get_or_create(&config)
				.await?
				.get_latest_height()
				.await?
		}
		BlockChainType::EVM => {
			registries
				.evm
				.get_or_create(&config)
				.await?
				.get_latest_height()
				.await?
		}
	};
	Ok(height)
}

/// Next epoch height of the cross-chain manager `ccm_contract` on a Neo N3 network
pub async fn read_epoch_height(
	registries: &ChainRegistries,
	network: &Network,
	ccm_contract: &str,
) -> Result<u64> {
	if network.network_type != BlockChainType::Neo3 {
		return Err(Box::new(BlockChainError::request_error(
			"Epoch heights are only available on Neo N3 networks",
			None,
			Some(HashMap::from([(
				"network".to_string(),
				network.slug.clone(),
			)])),
		)));
	}

	let sdk = registries
		.neo3
		.get_or_create(&network.selection_config())
		.await?;
	Ok(sdk.get_epoch_height(ccm_contract).await?)
}

fn log_sdk_status<E: ChainEndpoint>(sdk: &ChainSdk<E>) {
	let snapshot = sdk.status();
	if !snapshot.is_warm() {
		warn!(chain_id = sdk.chain_id(), "No endpoint has answered yet");
		return;
	}

	let selected = snapshot
		.endpoints
		.get(sdk.index())
		.map(|e| e.address.as_str())
		.unwrap_or_default();
	info!(
		chain_id = sdk.chain_id(),
		max_height = snapshot.max_height,
		healthy = snapshot.healthy_count(),
		endpoints = snapshot.endpoints.len(),
		selected = %selected,
		"Pool status"
	);
	for endpoint in snapshot.endpoints.iter().filter(|e| e.is_failing()) {
		warn!(
			chain_id = sdk.chain_id(),
			url = %endpoint.address,
			height = endpoint.height,
			failures = endpoint.consecutive_failures,
			error = endpoint.last_error.as_deref().unwrap_or_default(),
			"Endpoint failing"
		);
	}
}

/// Logs the health of every live pool
pub async fn log_pool_status(registries: &ChainRegistries) {
	for sdk in registries.neo3.sdks().await {
		log_sdk_status(&sdk);
	}
	for sdk in registries.evm.sdks().await {
		log_sdk_status(&sdk);
	}
}
