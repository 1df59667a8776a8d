//! Blockchain client interfaces and implementations.
//!
//! - [`ChainEndpoint`], the interface of one remote node
//! - Neo3 and EVM endpoint clients over a JSON-RPC HTTP transport
//! - [`ChainSdk`], a monitored pool of endpoints of one chain
//! - [`SdkRegistry`], one shared [`ChainSdk`] per selection configuration

mod client;
mod clients;
mod error;
mod registry;
mod sdk;
mod transports;

pub use client::{ChainEndpoint, EndpointConnector};
pub use clients::{
	decode_epoch_height, EvmClient, Neo3Client, Neo3ClientError, Neo3ClientTrait,
	EPOCH_HEIGHT_STORAGE_KEY,
};
pub use error::BlockChainError;
pub use registry::{ChainRegistries, EndpointFactory, SdkRegistry};
pub use sdk::ChainSdk;
pub use transports::{
	BlockchainTransport, HttpTransportClient, TransientErrorRetryStrategy, TransportError,
};
