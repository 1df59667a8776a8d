//! Error types for repository operations.

use crate::utils::logging::error::{ErrorContext, TraceableError};
use std::collections::HashMap;
use thiserror::Error as ThisError;
use uuid::Uuid;

/// Represents errors that can occur while loading or querying configurations
#[derive(ThisError, Debug)]
pub enum RepositoryError {
	/// A loaded configuration is inconsistent
	#[error("Validation error: {0}")]
	ValidationError(ErrorContext),

	/// Configurations could not be read
	#[error("Load error: {0}")]
	LoadError(ErrorContext),

	/// A requested configuration does not exist
	#[error("Not found: {0}")]
	NotFound(ErrorContext),

	/// Other errors that don't fit into the categories above
	#[error(transparent)]
	Other(#[from] anyhow::Error),
}

impl RepositoryError {
	pub fn validation_error(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::ValidationError(ErrorContext::new_with_log(msg, source, metadata))
	}

	pub fn load_error(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::LoadError(ErrorContext::new_with_log(msg, source, metadata))
	}

	pub fn not_found(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::NotFound(ErrorContext::new(msg, source, metadata))
	}
}

impl TraceableError for RepositoryError {
	fn trace_id(&self) -> String {
		match self {
			Self::ValidationError(ctx) => ctx.trace_id.clone(),
			Self::LoadError(ctx) => ctx.trace_id.clone(),
			Self::NotFound(ctx) => ctx.trace_id.clone(),
			Self::Other(_) => Uuid::new_v4().to_string(),
		}
	}
}
