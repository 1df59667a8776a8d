//! Registry of live endpoint pools keyed by their selection parameters.
//!
//! One [`ChainSdk`] exists per [`RegistryKey`]. Callers asking for the same key share the
//! instance and its single height monitor; concurrent first requests construct it once.

use std::sync::Arc;
use tracing::info;

use crate::{
	models::{RegistryKey, SelectionConfig},
	services::blockchain::{
		BlockChainError, ChainEndpoint, ChainSdk, EndpointConnector, EvmClient, Neo3Client,
	},
	utils::client_storage::ClientStorage,
};

/// Builds the endpoint for one address of a pool
pub type EndpointFactory<E> =
	Arc<dyn Fn(&str, &SelectionConfig) -> Result<E, BlockChainError> + Send + Sync>;

pub struct SdkRegistry<E: ChainEndpoint> {
	storage: ClientStorage<ChainSdk<E>>,
	factory: EndpointFactory<E>,
}

impl<E: EndpointConnector> SdkRegistry<E> {
	/// Registry building endpoints with [`EndpointConnector::connect`]
	pub fn new() -> Self {
		Self::with_factory(|address: &str, config: &SelectionConfig| E::connect(address, config))
	}
}

impl<E: EndpointConnector> Default for SdkRegistry<E> {
	fn default() -> Self {
		Self::new()
	}
}

impl<E: ChainEndpoint> SdkRegistry<E> {
	pub fn with_factory<F>(factory: F) -> Self
	where
		F: Fn(&str, &SelectionConfig) -> Result<E, BlockChainError> + Send + Sync + 'static,
	{
		Self {
			storage: ClientStorage::new(),
			factory: Arc::new(factory),
		}
	}

	/// Returns the pool for `config`, starting it if it does not exist yet.
	///
	/// A failed construction is returned to its own caller only. A caller already waiting
	/// on the same key then runs the construction itself, and a failure nobody waits on
	/// leaves nothing cached. At most one pool is ever live per key.
	pub async fn get_or_create(
		&self,
		config: &SelectionConfig,
	) -> Result<Arc<ChainSdk<E>>, BlockChainError> {
		let key = config.key();
		self.storage
			.get_or_try_init(key.as_str(), || async {
				let endpoints = config
					.endpoints
					.iter()
					.map(|address| (self.factory)(address, config))
					.collect::<Result<Vec<_>, _>>()?;

				info!(key = %key, "Creating endpoint pool");
				ChainSdk::start(config.clone(), endpoints).await
			})
			.await
	}

	pub async fn get(&self, key: &RegistryKey) -> Option<Arc<ChainSdk<E>>> {
		self.storage.get(key.as_str()).await
	}

	/// Removes the pool stored under `key` and stops its monitor
	pub async fn remove(&self, key: &RegistryKey) -> Option<Arc<ChainSdk<E>>> {
		let sdk = self.storage.remove(key.as_str()).await?;
		sdk.stop();
		info!(key = %key, "Endpoint pool removed");
		Some(sdk)
	}

	pub async fn len(&self) -> usize {
		self.storage.len().await
	}

	pub async fn is_empty(&self) -> bool {
		self.storage.is_empty().await
	}

	/// Keys of all live pools
	pub async fn keys(&self) -> Vec<String> {
		let mut keys = self.storage.keys().await;
		keys.sort();
		keys
	}

	/// Every live pool, ordered by key
	pub async fn sdks(&self) -> Vec<Arc<ChainSdk<E>>> {
		let mut sdks = Vec::new();
		for key in self.keys().await {
			if let Some(sdk) = self.storage.get(&key).await {
				sdks.push(sdk);
			}
		}
		sdks
	}

	/// Removes every pool and waits for their monitors to end
	pub async fn shutdown_all(&self) {
		for sdk in self.storage.drain().await {
			sdk.shutdown().await;
		}
	}
}

/// Registries of every supported chain family
#[derive(Default)]
pub struct ChainRegistries {
	pub neo3: SdkRegistry<Neo3Client>,
	pub evm: SdkRegistry<EvmClient>,
}

impl ChainRegistries {
	pub fn new() -> Self {
		Self::default()
	}

	pub async fn len(&self) -> usize {
		self.neo3.len().await + self.evm.len().await
	}

	pub async fn is_empty(&self) -> bool {
		self.len().await == 0
	}

	pub async fn shutdown_all(&self) {
		self.neo3.shutdown_all().await;
		self.evm.shutdown_all().await;
	}
}
