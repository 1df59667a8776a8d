//! Wallet and transaction pipeline error types.

use crate::utils::logging::error::{ErrorContext, TraceableError};
use serde::Serialize;
use std::{collections::HashMap, fmt};
use thiserror::Error;

/// Step of the transaction pipeline at which a failure happened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStage {
	ResolveBalance,
	Build,
	Sign,
	Broadcast,
}

impl fmt::Display for TransactionStage {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			TransactionStage::ResolveBalance => write!(f, "resolve_balance"),
			TransactionStage::Build => write!(f, "build"),
			TransactionStage::Sign => write!(f, "sign"),
			TransactionStage::Broadcast => write!(f, "broadcast"),
		}
	}
}

/// Failure of a transaction submission
#[derive(Debug, Error)]
pub enum TransactionError {
	/// The transaction could not be assembled, including balance lookups
	#[error("Transaction build failed at {stage}: {context}")]
	BuildError {
		stage: TransactionStage,
		context: Box<ErrorContext>,
	},

	#[error("Transaction signing failed: {0}")]
	SignError(Box<ErrorContext>),

	/// The transaction could not be delivered to the node
	#[error("Transaction broadcast failed: {0}")]
	BroadcastError(Box<ErrorContext>),

	/// The node refused the transaction
	#[error("Transaction rejected with code {code}: {message}")]
	RejectedError {
		code: i64,
		message: String,
		context: Box<ErrorContext>,
	},
}

impl TransactionError {
	pub fn build_error(
		stage: TransactionStage,
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::BuildError {
			stage,
			context: Box::new(ErrorContext::new_with_log(msg, source, metadata)),
		}
	}

	pub fn sign_error(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::SignError(Box::new(ErrorContext::new_with_log(msg, source, metadata)))
	}

	pub fn broadcast_error(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::BroadcastError(Box::new(ErrorContext::new_with_log(msg, source, metadata)))
	}

	pub fn rejected(
		code: i64,
		message: impl Into<String>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		let message = message.into();
		let context = ErrorContext::new_with_log(
			format!("Node rejected transaction: {} (code {})", message, code),
			None,
			metadata,
		);
		Self::RejectedError {
			code,
			message,
			context: Box::new(context),
		}
	}

	pub fn stage(&self) -> TransactionStage {
		match self {
			Self::BuildError { stage, .. } => *stage,
			Self::SignError(_) => TransactionStage::Sign,
			Self::BroadcastError(_) | Self::RejectedError { .. } => TransactionStage::Broadcast,
		}
	}
}

impl TraceableError for TransactionError {
	fn trace_id(&self) -> String {
		match self {
			Self::BuildError { context, .. } => context.trace_id.clone(),
			Self::SignError(context) => context.trace_id.clone(),
			Self::BroadcastError(context) => context.trace_id.clone(),
			Self::RejectedError { context, .. } => context.trace_id.clone(),
		}
	}
}

/// Failure reported by a wallet
#[derive(Debug, Error)]
pub enum WalletError {
	#[error("Wallet is locked: {0}")]
	Locked(Box<ErrorContext>),

	/// The wallet holds no private key for the account
	#[error("Key not found: {0}")]
	KeyNotFound(Box<ErrorContext>),

	#[error("Signing failed: {0}")]
	SigningError(Box<ErrorContext>),
}

impl WalletError {
	pub fn locked(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::Locked(Box::new(ErrorContext::new(msg, source, metadata)))
	}

	pub fn key_not_found(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::KeyNotFound(Box::new(ErrorContext::new(msg, source, metadata)))
	}

	pub fn signing_error(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::SigningError(Box::new(ErrorContext::new(msg, source, metadata)))
	}
}

impl TraceableError for WalletError {
	fn trace_id(&self) -> String {
		match self {
			Self::Locked(context) => context.trace_id.clone(),
			Self::KeyNotFound(context) => context.trace_id.clone(),
			Self::SigningError(context) => context.trace_id.clone(),
		}
	}
}
