//! Neo N3 blockchain client implementation.
//!
//! Wraps a JSON-RPC transport with the Neo N3 methods needed for height tracking, epoch
//! synchronization and transaction submission.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::collections::HashMap;
use tracing::instrument;

use crate::{
	models::{
		Neo3InvokeResult, Neo3Nep17Balances, Neo3NetworkFee, Neo3SendResult, Neo3Signer,
		Neo3Transaction, SelectionConfig,
	},
	services::blockchain::{
		client::{ChainEndpoint, EndpointConnector},
		clients::neo3::{
			epoch::{decode_epoch_height, EPOCH_HEIGHT_STORAGE_KEY},
			error::Neo3ClientError,
		},
		transports::{BlockchainTransport, HttpTransportClient},
		BlockChainError,
	},
};

const RPC_METHOD_GET_BLOCK_COUNT: &str = "getblockcount";
const RPC_METHOD_GET_STORAGE: &str = "getstorage";
const RPC_METHOD_GET_NEP17_BALANCES: &str = "getnep17balances";
const RPC_METHOD_INVOKE_SCRIPT: &str = "invokescript";
const RPC_METHOD_CALCULATE_NETWORK_FEE: &str = "calculatenetworkfee";
const RPC_METHOD_SEND_RAW_TRANSACTION: &str = "sendrawtransaction";

/// Client for a single Neo N3 node
#[derive(Clone)]
pub struct Neo3Client<T: BlockchainTransport + Clone = HttpTransportClient> {
	/// The underlying transport for RPC communication
	http_client: T,
}

impl<T: BlockchainTransport + Clone> Neo3Client<T> {
	/// Creates a new Neo3 client instance with a specific transport client
	pub fn new_with_transport(http_client: T) -> Self {
		Self { http_client }
	}

	/// Sends `method` and returns the `result` member of the response.
	///
	/// A JSON-RPC `error` member becomes [`Neo3ClientError::RpcError`].
	async fn call(&self, method: &'static str, params: Value) -> Result<Value, Neo3ClientError> {
		let metadata = || {
			Some(HashMap::from([
				("url".to_string(), self.http_client.url().to_string()),
				("method".to_string(), method.to_string()),
			]))
		};

		let mut response = self
			.http_client
			.send_raw_request(method, Some(params))
			.await
			.map_err(|e| {
				Neo3ClientError::request_error(
					format!("Failed to send {} request", method),
					Some(Box::new(e)),
					metadata(),
				)
			})?;

		if let Some(json_rpc_error) = response.get("error") {
			let code = json_rpc_error
				.get("code")
				.and_then(|c| c.as_i64())
				.unwrap_or(0);
			let message = json_rpc_error
				.get("message")
				.and_then(|m| m.as_str())
				.unwrap_or("Unknown RPC error");
			return Err(Neo3ClientError::rpc_error(code, message, method, metadata()));
		}

		response
			.get_mut("result")
			.map(Value::take)
			.ok_or_else(|| Neo3ClientError::response_parse_error("Missing 'result' field", None, metadata()))
	}

	async fn call_as<R: DeserializeOwned>(
		&self,
		method: &'static str,
		params: Value,
	) -> Result<R, Neo3ClientError> {
		let result = self.call(method, params).await?;
		serde_json::from_value(result).map_err(|e| {
			Neo3ClientError::response_parse_error(
				format!("Failed to parse {} result", method),
				Some(Box::new(e)),
				None,
			)
		})
	}
}

impl Neo3Client<HttpTransportClient> {
	/// Creates a client for the node at `url`
	pub fn new(url: &str, config: &SelectionConfig) -> Result<Self, anyhow::Error> {
		Ok(Self::new_with_transport(HttpTransportClient::new(url, config)?))
	}
}

impl EndpointConnector for Neo3Client<HttpTransportClient> {
	fn connect(address: &str, config: &SelectionConfig) -> Result<Self, BlockChainError> {
		Self::new(address, config).map_err(|e| {
			BlockChainError::client_pool_error(
				format!("Failed to create Neo3 client for {}", address),
				Some(e.into()),
				None,
			)
		})
	}
}

/// Neo N3 specific node operations
#[async_trait]
pub trait Neo3ClientTrait {
	/// Number of blocks in the chain, which is also the next block index
	async fn get_block_count(&self) -> Result<u64, Neo3ClientError>;

	/// Base64 value stored under `key` in `contract`, `None` when nothing is stored
	async fn get_storage(&self, contract: &str, key: &str) -> Result<Option<String>, Neo3ClientError>;

	/// Next height to synchronize from the cross-chain manager contract `ccm_contract`
	async fn get_epoch_height(&self, ccm_contract: &str) -> Result<u64, Neo3ClientError>;

	async fn get_nep17_balances(&self, address: &str) -> Result<Neo3Nep17Balances, Neo3ClientError>;

	/// Test-runs `script` with `signers`; the consumed gas is the system fee
	async fn invoke_script(
		&self,
		script: &[u8],
		signers: &[Neo3Signer],
	) -> Result<Neo3InvokeResult, Neo3ClientError>;

	/// Network fee for `transaction`, which must carry one witness per signer
	async fn calculate_network_fee(
		&self,
		transaction: &Neo3Transaction,
	) -> Result<i64, Neo3ClientError>;

	/// Submits a serialized, signed transaction
	async fn send_raw_transaction(&self, transaction_base64: &str) -> Result<Neo3SendResult, Neo3ClientError>;
}

#[async_trait]
impl<T: BlockchainTransport + Clone> Neo3ClientTrait for Neo3Client<T> {
	#[instrument(skip(self))]
	async fn get_block_count(&self) -> Result<u64, Neo3ClientError> {
		self.call_as(RPC_METHOD_GET_BLOCK_COUNT, json!([])).await
	}

	#[instrument(skip(self))]
	async fn get_storage(&self, contract: &str, key: &str) -> Result<Option<String>, Neo3ClientError> {
		let result = self
			.call(RPC_METHOD_GET_STORAGE, json!([contract, key]))
			.await?;

		match result {
			Value::Null => Ok(None),
			Value::String(value) if value.is_empty() => Ok(None),
			Value::String(value) => Ok(Some(value)),
			other => Err(Neo3ClientError::response_parse_error(
				format!("Unexpected getstorage result: {}", other),
				None,
				None,
			)),
		}
	}

	#[instrument(skip(self))]
	async fn get_epoch_height(&self, ccm_contract: &str) -> Result<u64, Neo3ClientError> {
		if ccm_contract.trim().is_empty() {
			return Err(Neo3ClientError::invalid_input(
				"Cross-chain manager contract hash is empty",
				None,
				None,
			));
		}
		let stored = self
			.get_storage(ccm_contract, EPOCH_HEIGHT_STORAGE_KEY)
			.await?;
		decode_epoch_height(stored.as_deref())
	}

	#[instrument(skip(self))]
	async fn get_nep17_balances(&self, address: &str) -> Result<Neo3Nep17Balances, Neo3ClientError> {
		self.call_as(RPC_METHOD_GET_NEP17_BALANCES, json!([address]))
			.await
	}

	#[instrument(skip(self, script))]
	async fn invoke_script(
		&self,
		script: &[u8],
		signers: &[Neo3Signer],
	) -> Result<Neo3InvokeResult, Neo3ClientError> {
		self.call_as(
			RPC_METHOD_INVOKE_SCRIPT,
			json!([STANDARD.encode(script), signers]),
		)
		.await
	}

	#[instrument(skip(self, transaction))]
	async fn calculate_network_fee(
		&self,
		transaction: &Neo3Transaction,
	) -> Result<i64, Neo3ClientError> {
		let fee: Neo3NetworkFee = self
			.call_as(
				RPC_METHOD_CALCULATE_NETWORK_FEE,
				json!([transaction.to_base64()]),
			)
			.await?;
		fee.network_fee.parse::<i64>().map_err(|e| {
			Neo3ClientError::response_parse_error(
				format!("Invalid network fee '{}'", fee.network_fee),
				Some(Box::new(e)),
				None,
			)
		})
	}

	#[instrument(skip(self, transaction_base64))]
	async fn send_raw_transaction(&self, transaction_base64: &str) -> Result<Neo3SendResult, Neo3ClientError> {
		self.call_as(RPC_METHOD_SEND_RAW_TRANSACTION, json!([transaction_base64]))
			.await
	}
}

#[async_trait]
impl<T: BlockchainTransport + Clone + 'static> ChainEndpoint for Neo3Client<T> {
	fn address(&self) -> &str {
		self.http_client.url()
	}

	async fn get_latest_height(&self) -> Result<u64, anyhow::Error> {
		Ok(self.get_block_count().await?)
	}
}
