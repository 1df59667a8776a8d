use async_trait::async_trait;
use mockall::mock;

use relayer_chain_sdk::{
	models::{Neo3Witness, ScriptHash},
	services::wallet::{Wallet, WalletAccount, WalletError},
};

mock! {
	pub Wallet {}

	#[async_trait]
	impl Wallet for Wallet {
		fn accounts(&self) -> Vec<WalletAccount>;
		fn network_magic(&self) -> u32;
		fn is_locked(&self) -> bool;
		async fn sign(&self, account: &WalletAccount, data: &[u8]) -> Result<Neo3Witness, WalletError>;
	}
}

pub fn test_account(seed: u8) -> WalletAccount {
	WalletAccount {
		address: format!("NTestAccount{}", seed),
		script_hash: ScriptHash::from_le_bytes([seed; 20]),
		verification_script: vec![0x0c, 0x21, seed],
	}
}

/// Unlocked wallet for `magic` holding `accounts`
pub fn unlocked_wallet(magic: u32, accounts: Vec<WalletAccount>) -> MockWallet {
	let mut wallet = MockWallet::new();
	wallet
		.expect_accounts()
		.returning(move || accounts.clone());
	wallet.expect_network_magic().return_const(magic);
	wallet.expect_is_locked().return_const(false);
	wallet
}
