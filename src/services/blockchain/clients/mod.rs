//! Blockchain client implementations.
//!
//! Contains specific implementations for different blockchain types:
//! - Neo3 client for Neo N3 networks
//! - EVM client for Ethereum-compatible chains

mod evm {
	pub mod client;
}
mod neo3;

pub use evm::client::EvmClient;
pub use neo3::{
	decode_epoch_height, Neo3Client, Neo3ClientError, Neo3ClientTrait, EPOCH_HEIGHT_STORAGE_KEY,
};
