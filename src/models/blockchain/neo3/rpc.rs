//! Result payloads of the Neo N3 RPC methods used by the client.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::ScriptHash;

/// Result of `getnep17balances`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Neo3Nep17Balances {
	#[serde(default)]
	pub address: String,
	#[serde(default, rename = "balance")]
	pub balances: Vec<Neo3Nep17Balance>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Neo3Nep17Balance {
	#[serde(rename = "assethash")]
	pub asset_hash: ScriptHash,
	/// Integer amount in the asset's smallest unit, as a decimal string
	pub amount: String,
	#[serde(default, rename = "lastupdatedblock")]
	pub last_updated_block: u64,
}

impl Neo3Nep17Balances {
	/// Amount held of `asset`, 0 when the account never held it
	pub fn amount_of(&self, asset: &ScriptHash) -> Result<i64, String> {
		match self.balances.iter().find(|b| &b.asset_hash == asset) {
			Some(balance) => balance
				.amount
				.parse::<i64>()
				.map_err(|e| format!("Invalid amount '{}' for {}: {}", balance.amount, asset, e)),
			None => Ok(0),
		}
	}
}

/// Result of `invokescript`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Neo3InvokeResult {
	#[serde(default)]
	pub script: String,
	/// VM state, `HALT` on success and `FAULT` on failure
	pub state: String,
	#[serde(rename = "gasconsumed")]
	pub gas_consumed: String,
	#[serde(default)]
	pub exception: Option<String>,
	#[serde(default)]
	pub stack: Vec<Value>,
}

impl Neo3InvokeResult {
	pub fn is_fault(&self) -> bool {
		self.state.contains("FAULT")
	}
}

/// Result of `calculatenetworkfee`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Neo3NetworkFee {
	#[serde(rename = "networkfee")]
	pub network_fee: String,
}

/// Result of `sendrawtransaction`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Neo3SendResult {
	pub hash: String,
}
