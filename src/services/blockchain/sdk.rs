//! A monitored pool of endpoints of one chain.
//!
//! [`ChainSdk`] owns the endpoints built from a [`SelectionConfig`], the [`NodePool`] tracking
//! them, the [`HeightMonitor`] refreshing the pool and the [`Selector`] choosing from it.

use std::{collections::HashMap, sync::Arc};
use tracing::{info, instrument};

use crate::{
	models::{RegistryKey, SelectionConfig},
	services::{
		blockchain::{BlockChainError, ChainEndpoint, Neo3ClientError, Neo3ClientTrait},
		health::{HeightMonitor, HeightPoller, NodePool, PollSummary, PoolSnapshot, Selector},
	},
	utils::metrics::{record_pool_started, record_pool_stopped},
};

pub struct ChainSdk<E: ChainEndpoint> {
	key: RegistryKey,
	config: SelectionConfig,
	endpoints: Vec<Arc<E>>,
	selector: Selector,
	poller: Arc<HeightPoller<E>>,
	monitor: HeightMonitor,
}

impl<E: ChainEndpoint> ChainSdk<E> {
	/// Builds the pool over `endpoints`, runs one warm-up poll and starts the monitor.
	///
	/// `endpoints[i]` must have been created for `config.endpoints[i]`.
	#[instrument(skip_all, fields(chain_id = config.chain_id))]
	pub async fn start(config: SelectionConfig, endpoints: Vec<E>) -> Result<Self, BlockChainError> {
		let metadata = || {
			Some(HashMap::from([(
				"chain_id".to_string(),
				config.chain_id.to_string(),
			)]))
		};

		if endpoints.is_empty() {
			return Err(BlockChainError::client_pool_error(
				"At least one endpoint is required",
				None,
				metadata(),
			));
		}
		if endpoints.len() != config.endpoints.len() {
			return Err(BlockChainError::client_pool_error(
				format!(
					"Expected {} endpoints, got {}",
					config.endpoints.len(),
					endpoints.len()
				),
				None,
				metadata(),
			));
		}
		if config.poll_interval.is_zero() {
			return Err(BlockChainError::client_pool_error(
				"Poll interval must be greater than zero",
				None,
				metadata(),
			));
		}

		let endpoints: Vec<Arc<E>> = endpoints.into_iter().map(Arc::new).collect();
		let addresses: Vec<&str> = endpoints.iter().map(|e| e.address()).collect();
		let pool = Arc::new(NodePool::new(&addresses));

		let poller = Arc::new(HeightPoller::new(
			config.chain_id,
			pool.clone(),
			endpoints.clone(),
			config.request_timeout,
		));

		let warm_up = poller.poll_once().await;
		if config.require_reachable_on_start && warm_up.succeeded == 0 {
			return Err(BlockChainError::client_pool_error(
				"No endpoint answered the initial height poll",
				None,
				metadata(),
			));
		}

		let selector = Selector::new(pool, config.max_gap, config.gap_boundary);
		let monitor = HeightMonitor::start(poller.clone(), config.poll_interval);
		record_pool_started();

		info!(
			chain_id = config.chain_id,
			endpoints = endpoints.len(),
			reachable = warm_up.succeeded,
			max_height = warm_up.max_height,
			"Endpoint pool started"
		);

		Ok(Self {
			key: config.key(),
			config,
			endpoints,
			selector,
			poller,
			monitor,
		})
	}

	pub fn key(&self) -> &RegistryKey {
		&self.key
	}

	pub fn chain_id(&self) -> u64 {
		self.config.chain_id
	}

	pub fn config(&self) -> &SelectionConfig {
		&self.config
	}

	/// Endpoints in configured order
	pub fn endpoints(&self) -> &[Arc<E>] {
		&self.endpoints
	}

	pub fn selector(&self) -> &Selector {
		&self.selector
	}

	/// Position of the endpoint with the highest known height
	pub fn index(&self) -> usize {
		self.selector.index()
	}

	/// Random position among endpoints within the max gap
	pub fn select_index(&self) -> usize {
		self.selector.select()
	}

	/// The endpoint with the highest known height
	pub fn node(&self) -> Arc<E> {
		self.endpoints[self.index()].clone()
	}

	/// A random endpoint within the max gap, spreading load across healthy nodes
	pub fn select(&self) -> Arc<E> {
		self.endpoints[self.select_index()].clone()
	}

	/// Current health of every endpoint
	pub fn status(&self) -> PoolSnapshot {
		self.poller.pool().snapshot()
	}

	/// Whether any endpoint has answered a height poll yet
	pub fn is_warm(&self) -> bool {
		self.selector.is_warm()
	}

	/// Runs a poll pass immediately, outside the monitor schedule
	pub async fn refresh(&self) -> PollSummary {
		self.poller.poll_once().await
	}

	/// Latest height reported by [`Self::node`]
	pub async fn get_latest_height(&self) -> Result<u64, anyhow::Error> {
		self.node().get_latest_height().await
	}

	pub fn is_running(&self) -> bool {
		self.monitor.is_running()
	}

	/// Stops the height monitor. The endpoints stay usable with their last known state.
	pub fn stop(&self) {
		self.monitor.stop();
	}

	/// Stops the height monitor and waits for its task to end
	pub async fn shutdown(&self) {
		self.monitor.shutdown().await;
	}
}

impl<E: ChainEndpoint + Neo3ClientTrait> ChainSdk<E> {
	/// Next height to synchronize from the cross-chain manager, read through [`Self::node`]
	pub async fn get_epoch_height(&self, ccm_contract: &str) -> Result<u64, Neo3ClientError> {
		self.node().get_epoch_height(ccm_contract).await
	}
}

impl<E: ChainEndpoint> Drop for ChainSdk<E> {
	fn drop(&mut self) {
		self.monitor.stop();
		record_pool_stopped();
	}
}
