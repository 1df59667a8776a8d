//! Core endpoint interface shared by every chain family.

use async_trait::async_trait;

use crate::{models::SelectionConfig, services::blockchain::BlockChainError};

/// One remote node of a chain
///
/// Implementations must be cheap to share behind an `Arc`; the height monitor and
/// callers use the same instance concurrently.
#[async_trait]
pub trait ChainEndpoint: Send + Sync + 'static {
	/// Connection address this endpoint was created for
	fn address(&self) -> &str;

	/// Retrieves the latest block height reported by the node
	async fn get_latest_height(&self) -> Result<u64, anyhow::Error>;
}

/// Endpoints that can be constructed from an address and the pool configuration
pub trait EndpointConnector: ChainEndpoint + Sized {
	fn connect(address: &str, config: &SelectionConfig) -> Result<Self, BlockChainError>;
}
