//! HTTP transport implementation for blockchain interactions.
//!
//! Posts JSON-RPC 2.0 envelopes to a single endpoint through a retryable
//! `reqwest-middleware` client.

use anyhow::Context;
use async_trait::async_trait;
use reqwest_middleware::ClientWithMiddleware;
use serde::Serialize;
use serde_json::Value;
use std::{collections::HashMap, time::Duration};
use url::Url;

use crate::{
	models::SelectionConfig,
	services::blockchain::transports::{
		BlockchainTransport, TransientErrorRetryStrategy, TransportError,
	},
	utils::http::{create_retryable_http_client, RetryConfig},
};

const MAX_CONNECT_TIMEOUT: Duration = Duration::from_secs(20);

/// JSON-RPC over HTTP client bound to one endpoint
///
/// Cloning is cheap; clones share the underlying connection pool.
#[derive(Clone, Debug)]
pub struct HttpTransportClient {
	/// Retryable HTTP client for making requests
	pub client: ClientWithMiddleware,
	url: String,
}

impl HttpTransportClient {
	/// Creates a transport for `url` using the timeout and retry policy of `config`.
	///
	/// No request is made; reachability is the concern of the height monitor.
	pub fn new(url: &str, config: &SelectionConfig) -> Result<Self, anyhow::Error> {
		Self::with_retry(url, config.request_timeout, &config.retry)
	}

	pub fn with_retry(
		url: &str,
		request_timeout: Duration,
		retry: &RetryConfig,
	) -> Result<Self, anyhow::Error> {
		let parsed = Url::parse(url.trim()).with_context(|| format!("Invalid URL: {}", url))?;
		if !matches!(parsed.scheme(), "http" | "https") {
			return Err(anyhow::anyhow!(
				"Unsupported URL scheme '{}' for {}",
				parsed.scheme(),
				url
			));
		}

		let base_http_client = reqwest::ClientBuilder::new()
			.pool_idle_timeout(Duration::from_secs(90))
			.pool_max_idle_per_host(32)
			.timeout(request_timeout)
			.connect_timeout(request_timeout.min(MAX_CONNECT_TIMEOUT))
			.build()
			.context("Failed to create base HTTP client")?;

		let client = create_retryable_http_client(
			retry,
			base_http_client,
			Some(TransientErrorRetryStrategy),
		);

		Ok(Self {
			client,
			url: parsed.as_str().trim_end_matches('/').to_string(),
		})
	}

	fn url_metadata(&self, method: &str) -> Option<HashMap<String, String>> {
		Some(HashMap::from([
			("url".to_string(), self.url.clone()),
			("method".to_string(), method.to_string()),
		]))
	}
}

#[async_trait]
impl BlockchainTransport for HttpTransportClient {
	fn url(&self) -> &str {
		&self.url
	}

	/// Sends a JSON-RPC request and returns the parsed response body.
	///
	/// A JSON-RPC `error` member is not treated as a failure here; callers inspect it.
	async fn send_raw_request<P>(
		&self,
		method: &str,
		params: Option<P>,
	) -> Result<Value, TransportError>
	where
		P: Into<Value> + Send + Clone + Serialize,
	{
		let request_body = self.customize_request(method, params).await;

		let request_body_str = serde_json::to_string(&request_body).map_err(|e| {
			TransportError::request_serialization(
				"Failed to serialize request JSON",
				Some(Box::new(e)),
				self.url_metadata(method),
			)
		})?;

		tracing::trace!(url = %self.url, method = method, "Sending JSON-RPC request");

		let response = self
			.client
			.post(&self.url)
			.header("Content-Type", "application/json")
			.body(request_body_str)
			.send()
			.await
			.map_err(|e| {
				TransportError::network(
					format!("Failed to send {} request", method),
					Some(Box::new(e)),
					self.url_metadata(method),
				)
			})?;

		let status = response.status();
		if !status.is_success() {
			let error_body = response.text().await.unwrap_or_default();
			return Err(TransportError::http(
				status,
				self.url.clone(),
				error_body,
				None,
				self.url_metadata(method),
			));
		}

		response.json().await.map_err(|e| {
			TransportError::response_parse(
				"Failed to parse JSON response",
				Some(Box::new(e)),
				self.url_metadata(method),
			)
		})
	}
}
