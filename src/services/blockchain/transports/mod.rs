//! JSON-RPC transport for blockchain endpoints.
//!
//! Every transport is bound to a single endpoint URL. Choosing between endpoints is the
//! job of the health layer, not of the transport.

mod error;
mod http;

pub use error::TransportError;
pub use http::HttpTransportClient;

use reqwest_retry::{
	default_on_request_failure, default_on_request_success, Retryable, RetryableStrategy,
};
use serde::Serialize;
use serde_json::{json, Value};

/// Base trait for all blockchain transport clients
#[async_trait::async_trait]
pub trait BlockchainTransport: Send + Sync {
	/// URL of the endpoint this transport talks to
	fn url(&self) -> &str;

	/// Sends a raw request and returns the whole JSON-RPC response body
	async fn send_raw_request<P>(
		&self,
		method: &str,
		params: Option<P>,
	) -> Result<Value, TransportError>
	where
		P: Into<Value> + Send + Clone + Serialize;

	/// Customizes the request for specific blockchain requirements
	async fn customize_request<P>(&self, method: &str, params: Option<P>) -> Value
	where
		P: Into<Value> + Send + Clone + Serialize,
	{
		json!({
			"jsonrpc": "2.0",
			"id": 1,
			"method": method,
			"params": params.map(|p| p.into())
		})
	}
}

/// Retries requests that the default reqwest-retry classification marks as transient
pub struct TransientErrorRetryStrategy;
impl RetryableStrategy for TransientErrorRetryStrategy {
	fn handle(
		&self,
		res: &Result<reqwest::Response, reqwest_middleware::Error>,
	) -> Option<Retryable> {
		match res {
			Ok(success) => default_on_request_success(success),
			Err(error) => default_on_request_failure(error),
		}
	}
}
