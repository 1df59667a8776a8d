//! Neo N3 data models.
//!
//! - `transaction`: binary transaction layout, hashing and signing payload
//! - `rpc`: JSON payloads returned by Neo N3 RPC methods

mod rpc;
mod transaction;

pub use rpc::{Neo3InvokeResult, Neo3Nep17Balance, Neo3Nep17Balances, Neo3NetworkFee, Neo3SendResult};
pub use transaction::{
	Neo3Signer, Neo3Transaction, Neo3TransactionAttribute, Neo3Witness, Neo3WitnessScope,
	ScriptHash, GAS_TOKEN, GAS_TOKEN_HASH, MAX_VALID_UNTIL_BLOCK_INCREMENT,
};
