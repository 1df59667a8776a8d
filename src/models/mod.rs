//! Domain models and data structures.
//!
//! - `blockchain`: Chain families and Neo N3 transaction and RPC payloads
//! - `config`: Configuration loading and validation
//! - `core`: Core domain models (Network, SelectionConfig, RegistryKey)
//! - `security`: Security models (Secret)

mod blockchain;
mod config;
mod core;
mod security;

pub use blockchain::BlockChainType;

pub use blockchain::neo3::{
	Neo3InvokeResult, Neo3Nep17Balance, Neo3Nep17Balances, Neo3NetworkFee, Neo3SendResult,
	Neo3Signer, Neo3Transaction, Neo3TransactionAttribute, Neo3Witness, Neo3WitnessScope,
	ScriptHash, GAS_TOKEN, GAS_TOKEN_HASH, MAX_VALID_UNTIL_BLOCK_INCREMENT,
};

pub use core::{
	normalize_endpoint, GapBoundary, Network, RegistryKey, RpcUrl, SelectionConfig,
	DEFAULT_REQUEST_TIMEOUT,
};

pub use config::{ConfigError, ConfigLoader};

pub use security::{SecretString, SecretValue, SecurityError, SecurityResult};
