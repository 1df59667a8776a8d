//! Interface of the key store used to authorize transactions.
//!
//! Key storage and signature schemes live outside this crate. The pipeline only needs the
//! accounts a wallet controls and a witness for a signing payload.

use async_trait::async_trait;

use crate::{
	models::{Neo3Witness, ScriptHash},
	services::wallet::WalletError,
};

/// An account controlled by a wallet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletAccount {
	/// Base58 address, used for balance lookups
	pub address: String,
	pub script_hash: ScriptHash,
	/// Verification script of the account, used to estimate the network fee
	pub verification_script: Vec<u8>,
}

#[async_trait]
pub trait Wallet: Send + Sync {
	/// Accounts in preference order for paying fees
	fn accounts(&self) -> Vec<WalletAccount>;

	/// Network magic the wallet's keys are meant for
	fn network_magic(&self) -> u32;

	fn is_locked(&self) -> bool;

	/// Produces the witness of `account` over `data`
	async fn sign(&self, account: &WalletAccount, data: &[u8]) -> Result<Neo3Witness, WalletError>;
}
