//! Blockchain service error types and handling.
//!
//! Covers endpoint connectivity, request processing and construction of endpoint pools.

use crate::utils::logging::error::{ErrorContext, TraceableError};
use std::collections::HashMap;
use thiserror::Error as ThisError;
use uuid::Uuid;

/// Represents possible errors that can occur during blockchain operations
#[derive(ThisError, Debug)]
pub enum BlockChainError {
	/// Errors related to network connectivity issues
	#[error("Connection error: {0}")]
	ConnectionError(ErrorContext),

	/// Errors related to malformed requests or invalid responses
	#[error("Request error: {0}")]
	RequestError(ErrorContext),

	/// Internal errors within the blockchain client
	#[error("Internal error: {0}")]
	InternalError(ErrorContext),

	/// Errors raised while building or looking up an endpoint pool
	#[error("Client pool error: {0}")]
	ClientPoolError(ErrorContext),

	/// Other errors that don't fit into the categories above
	#[error(transparent)]
	Other(#[from] anyhow::Error),
}

impl BlockChainError {
	// Connection error
	pub fn connection_error(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::ConnectionError(ErrorContext::new_with_log(msg, source, metadata))
	}

	// Request error
	pub fn request_error(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::RequestError(ErrorContext::new_with_log(msg, source, metadata))
	}

	// Internal error
	pub fn internal_error(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::InternalError(ErrorContext::new_with_log(msg, source, metadata))
	}

	// Client pool error
	pub fn client_pool_error(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::ClientPoolError(ErrorContext::new_with_log(msg, source, metadata))
	}
}

impl TraceableError for BlockChainError {
	fn trace_id(&self) -> String {
		match self {
			Self::ConnectionError(ctx) => ctx.trace_id.clone(),
			Self::RequestError(ctx) => ctx.trace_id.clone(),
			Self::InternalError(ctx) => ctx.trace_id.clone(),
			Self::ClientPoolError(ctx) => ctx.trace_id.clone(),
			Self::Other(_) => Uuid::new_v4().to_string(),
		}
	}
}
