//! Neo N3 client error types
//!
//! Provides error handling for Neo N3 RPC requests, JSON-RPC error objects, response parsing
//! and decoding of stored contract values.

use crate::utils::logging::error::{ErrorContext, TraceableError};
use std::collections::HashMap;
use thiserror::Error;

/// Neo N3 client error type
#[derive(Debug, Error)]
pub enum Neo3ClientError {
	/// The request did not produce a JSON-RPC response
	#[error("Neo3 RPC request failed: {0}")]
	RequestError(Box<ErrorContext>),

	/// The node answered with a JSON-RPC error object
	#[error("Neo3 RPC error {code}: {message}")]
	RpcError {
		code: i64,
		message: String,
		context: Box<ErrorContext>,
	},

	/// The JSON-RPC result did not have the expected shape
	#[error("Failed to parse Neo3 RPC response: {0}")]
	ResponseParseError(Box<ErrorContext>),

	/// A stored value could not be decoded
	#[error("Failed to decode stored value: {0}")]
	DecodeError(Box<ErrorContext>),

	/// Invalid input provided to the client
	#[error("Invalid input: {0}")]
	InvalidInput(Box<ErrorContext>),
}

impl Neo3ClientError {
	pub fn request_error(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::RequestError(Box::new(ErrorContext::new(msg, source, metadata)))
	}

	pub fn rpc_error(
		code: i64,
		message: impl Into<String>,
		method: &str,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		let message = message.into();
		let context = ErrorContext::new(
			format!("{} returned error {}: {}", method, code, message),
			None,
			metadata,
		);
		Self::RpcError {
			code,
			message,
			context: Box::new(context),
		}
	}

	pub fn response_parse_error(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::ResponseParseError(Box::new(ErrorContext::new(msg, source, metadata)))
	}

	pub fn decode_error(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::DecodeError(Box::new(ErrorContext::new_with_log(msg, source, metadata)))
	}

	pub fn invalid_input(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::InvalidInput(Box::new(ErrorContext::new(msg, source, metadata)))
	}
}

impl TraceableError for Neo3ClientError {
	fn trace_id(&self) -> String {
		match self {
			Self::RequestError(context) => context.trace_id.clone(),
			Self::RpcError { context, .. } => context.trace_id.clone(),
			Self::ResponseParseError(context) => context.trace_id.clone(),
			Self::DecodeError(context) => context.trace_id.clone(),
			Self::InvalidInput(context) => context.trace_id.clone(),
		}
	}
}
