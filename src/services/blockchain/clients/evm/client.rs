//! EVM-compatible blockchain client implementation.
//!
//! Only height tracking is needed from EVM nodes, through `eth_blockNumber`.

use anyhow::Context;
use async_trait::async_trait;
use tracing::instrument;

use crate::{
	models::SelectionConfig,
	services::blockchain::{
		client::{ChainEndpoint, EndpointConnector},
		transports::{BlockchainTransport, HttpTransportClient},
		BlockChainError,
	},
};

/// Client for a single Ethereum Virtual Machine (EVM) compatible node
#[derive(Clone)]
pub struct EvmClient<T: BlockchainTransport + Clone = HttpTransportClient> {
	/// The underlying HTTP transport client for RPC communication
	http_client: T,
}

impl<T: BlockchainTransport + Clone> EvmClient<T> {
	/// Creates a new EVM client instance with a specific transport client
	pub fn new_with_transport(http_client: T) -> Self {
		Self { http_client }
	}
}

impl EvmClient<HttpTransportClient> {
	/// Creates a client for the node at `url`
	pub fn new(url: &str, config: &SelectionConfig) -> Result<Self, anyhow::Error> {
		Ok(Self::new_with_transport(HttpTransportClient::new(url, config)?))
	}
}

impl EndpointConnector for EvmClient<HttpTransportClient> {
	fn connect(address: &str, config: &SelectionConfig) -> Result<Self, BlockChainError> {
		Self::new(address, config).map_err(|e| {
			BlockChainError::client_pool_error(
				format!("Failed to create EVM client for {}", address),
				Some(e.into()),
				None,
			)
		})
	}
}

#[async_trait]
impl<T: BlockchainTransport + Clone + 'static> ChainEndpoint for EvmClient<T> {
	fn address(&self) -> &str {
		self.http_client.url()
	}

	#[instrument(skip(self))]
	async fn get_latest_height(&self) -> Result<u64, anyhow::Error> {
		let response = self
			.http_client
			.send_raw_request::<serde_json::Value>("eth_blockNumber", None)
			.await
			.with_context(|| "Failed to get latest block number")?;

		if let Some(error) = response.get("error") {
			return Err(anyhow::anyhow!("eth_blockNumber returned error: {}", error));
		}

		// Extract the "result" field from the JSON-RPC response
		let hex_str = response
			.get("result")
			.and_then(|v| v.as_str())
			.ok_or_else(|| anyhow::anyhow!("Missing 'result' field"))?;

		u64::from_str_radix(hex_str.trim_start_matches("0x"), 16)
			.map_err(|e| anyhow::anyhow!("Failed to parse block number: {}", e))
	}
}
