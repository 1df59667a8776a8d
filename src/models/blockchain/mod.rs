//! Blockchain-specific model implementations.
//!
//! This module contains type definitions for the chain families served by the pool:
//! Neo N3 (transactions, RPC result payloads) and EVM-compatible chains (height reads only).

use serde::{Deserialize, Serialize};

pub mod neo3;

/// Supported blockchain platform types
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum BlockChainType {
	/// Neo N3 chains
	Neo3,
	/// Ethereum Virtual Machine based chains
	EVM,
}

impl std::fmt::Display for BlockChainType {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			BlockChainType::Neo3 => write!(f, "neo3"),
			BlockChainType::EVM => write!(f, "evm"),
		}
	}
}
