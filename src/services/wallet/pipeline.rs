//! Build, sign and broadcast of Neo N3 invocation transactions.
//!
//! Every RPC call of a submission goes to the pool's best endpoint at the time the
//! submission starts. Failures carry the [`TransactionStage`] they happened in and are
//! never retried here.

use std::{collections::HashMap, sync::Arc};
use tracing::{debug, info, instrument, warn};

use crate::{
	models::{
		Neo3Signer, Neo3Transaction, Neo3Witness, ScriptHash, GAS_TOKEN,
		MAX_VALID_UNTIL_BLOCK_INCREMENT,
	},
	services::{
		blockchain::{ChainEndpoint, ChainSdk, Neo3Client, Neo3ClientError, Neo3ClientTrait},
		wallet::{TransactionError, TransactionStage, Wallet, WalletAccount},
	},
};

/// Submits invocation scripts on behalf of a wallet
pub struct TransactionPipeline<E: ChainEndpoint + Neo3ClientTrait = Neo3Client> {
	sdk: Arc<ChainSdk<E>>,
	wallet: Arc<dyn Wallet>,
	fee_asset: ScriptHash,
}

/// A wallet account with its fee asset balance
struct Funding {
	account: WalletAccount,
	balance: i64,
}

impl<E: ChainEndpoint + Neo3ClientTrait> TransactionPipeline<E> {
	pub fn new(sdk: Arc<ChainSdk<E>>, wallet: Arc<dyn Wallet>) -> Self {
		Self {
			sdk,
			wallet,
			fee_asset: GAS_TOKEN,
		}
	}

	/// Pays fees with `asset` instead of GAS
	pub fn with_fee_asset(mut self, asset: ScriptHash) -> Self {
		self.fee_asset = asset;
		self
	}

	pub fn sdk(&self) -> &Arc<ChainSdk<E>> {
		&self.sdk
	}

	/// Submits `script` signed by the pipeline's wallet and returns the transaction hash
	pub async fn send_invocation(&self, script: &[u8]) -> Result<String, TransactionError> {
		self.send_invocation_with_wallet(self.wallet.as_ref(), script)
			.await
	}

	/// Submits `script` signed by `wallet` and returns the transaction hash
	#[instrument(skip_all, fields(chain_id = self.sdk.chain_id()))]
	pub async fn send_invocation_with_wallet(
		&self,
		wallet: &dyn Wallet,
		script: &[u8],
	) -> Result<String, TransactionError> {
		if script.is_empty() {
			return Err(TransactionError::build_error(
				TransactionStage::Build,
				"Invocation script is empty",
				None,
				None,
			));
		}

		let node = self.sdk.node();
		let metadata = || {
			Some(HashMap::from([
				("url".to_string(), node.address().to_string()),
				("chain_id".to_string(), self.sdk.chain_id().to_string()),
			]))
		};

		let funding = self.resolve_balances(node.as_ref(), wallet).await?;
		let (mut transaction, sender) = self.build(node.as_ref(), script, funding).await?;
		self.sign(wallet, &mut transaction, &sender).await?;

		let hash = transaction.hash_string();
		match node.send_raw_transaction(&transaction.to_base64()).await {
			Ok(result) => {
				if !result.hash.eq_ignore_ascii_case(&hash) {
					warn!(local = %hash, remote = %result.hash, "Node reported a different transaction hash");
				}
				info!(hash = %hash, sender = %sender.address, "Sent neo3 transaction");
				Ok(hash)
			}
			Err(Neo3ClientError::RpcError { code, message, .. }) => {
				Err(TransactionError::rejected(code, message, metadata()))
			}
			Err(e) => Err(TransactionError::broadcast_error(
				"Failed to send raw transaction",
				Some(Box::new(e)),
				metadata(),
			)),
		}
	}

	/// Fee asset balance of every wallet account, in wallet order
	async fn resolve_balances(
		&self,
		node: &E,
		wallet: &dyn Wallet,
	) -> Result<Vec<Funding>, TransactionError> {
		let accounts = wallet.accounts();
		if accounts.is_empty() {
			return Err(TransactionError::build_error(
				TransactionStage::ResolveBalance,
				"Wallet has no accounts",
				None,
				None,
			));
		}

		let mut funding = Vec::with_capacity(accounts.len());
		for account in accounts {
			let balances = node
				.get_nep17_balances(&account.address)
				.await
				.map_err(|e| {
					TransactionError::build_error(
						TransactionStage::ResolveBalance,
						format!("Failed to read balances of {}", account.address),
						Some(Box::new(e)),
						None,
					)
				})?;
			let balance = balances.amount_of(&self.fee_asset).map_err(|e| {
				TransactionError::build_error(TransactionStage::ResolveBalance, e, None, None)
			})?;
			debug!(account = %account.address, balance = balance, "Resolved fee balance");
			funding.push(Funding { account, balance });
		}
		Ok(funding)
	}

	/// Builds the unsigned transaction with the first account able to pay its fees
	async fn build(
		&self,
		node: &E,
		script: &[u8],
		funding: Vec<Funding>,
	) -> Result<(Neo3Transaction, WalletAccount), TransactionError> {
		let block_count = node.get_block_count().await.map_err(|e| {
			TransactionError::build_error(
				TransactionStage::Build,
				"Failed to read block count",
				Some(Box::new(e)),
				None,
			)
		})?;
		let valid_until_block = u32::try_from(block_count.saturating_sub(1))
			.ok()
			.and_then(|height| height.checked_add(MAX_VALID_UNTIL_BLOCK_INCREMENT))
			.ok_or_else(|| {
				TransactionError::build_error(
					TransactionStage::Build,
					format!("Block count {} is out of range", block_count),
					None,
					None,
				)
			})?;

		let mut required_fees = Vec::new();
		for Funding { account, balance } in funding {
			if balance <= 0 {
				continue;
			}

			let signers = vec![Neo3Signer::called_by_entry(account.script_hash)];
			let invocation = node.invoke_script(script, &signers).await.map_err(|e| {
				TransactionError::build_error(
					TransactionStage::Build,
					"Failed to test-invoke script",
					Some(Box::new(e)),
					None,
				)
			})?;
			if invocation.is_fault() {
				return Err(TransactionError::build_error(
					TransactionStage::Build,
					format!(
						"Script execution faulted: {}",
						invocation.exception.as_deref().unwrap_or("no exception message")
					),
					None,
					None,
				));
			}
			let system_fee = invocation.gas_consumed.parse::<i64>().map_err(|e| {
				TransactionError::build_error(
					TransactionStage::Build,
					format!("Invalid gas consumed '{}'", invocation.gas_consumed),
					Some(Box::new(e)),
					None,
				)
			})?;

			let mut transaction = Neo3Transaction::new(script.to_vec(), signers);
			transaction.system_fee = system_fee;
			transaction.valid_until_block = valid_until_block;
			transaction.witnesses = vec![Neo3Witness::placeholder(
				account.verification_script.clone(),
			)];

			let network_fee = node
				.calculate_network_fee(&transaction)
				.await
				.map_err(|e| {
					TransactionError::build_error(
						TransactionStage::Build,
						"Failed to calculate network fee",
						Some(Box::new(e)),
						None,
					)
				})?;
			transaction.network_fee = network_fee;

			let total = system_fee.saturating_add(network_fee);
			if balance >= total {
				return Ok((transaction, account));
			}
			required_fees.push(format!("{} has {} of {}", account.address, balance, total));
		}

		Err(TransactionError::build_error(
			TransactionStage::Build,
			if required_fees.is_empty() {
				format!("Insufficient balance: no account holds {}", self.fee_asset)
			} else {
				format!("Insufficient balance: {}", required_fees.join(", "))
			},
			None,
			None,
		))
	}

	async fn sign(
		&self,
		wallet: &dyn Wallet,
		transaction: &mut Neo3Transaction,
		sender: &WalletAccount,
	) -> Result<(), TransactionError> {
		let network_magic = self.sdk.config().network_magic.ok_or_else(|| {
			TransactionError::sign_error("Network magic is not configured", None, None)
		})?;
		if wallet.network_magic() != network_magic {
			return Err(TransactionError::sign_error(
				format!(
					"Wallet network magic {} does not match network magic {}",
					wallet.network_magic(),
					network_magic
				),
				None,
				None,
			));
		}
		if wallet.is_locked() {
			return Err(TransactionError::sign_error("Wallet is locked", None, None));
		}

		let witness = wallet
			.sign(sender, &transaction.sign_data(network_magic))
			.await
			.map_err(|e| {
				TransactionError::sign_error(
					format!("Wallet failed to sign for {}", sender.address),
					Some(Box::new(e)),
					None,
				)
			})?;
		transaction.witnesses = vec![witness];
		Ok(())
	}
}
