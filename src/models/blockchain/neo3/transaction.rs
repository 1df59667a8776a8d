//! Neo N3 transaction model.
//!
//! The binary layout follows the N3 wire format: a fixed header (version, nonce, fees,
//! valid-until-block), the signers, the attributes and the script form the unsigned
//! payload, and the witnesses are appended after it. The transaction hash is the SHA-256
//! of the unsigned payload, displayed byte-reversed.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::{fmt, str::FromStr};

/// Script hash of the native GAS token, used to pay fees
pub const GAS_TOKEN_HASH: &str = "0xd2a4cff31913016155e38e474a2c06d08be276cf";

/// [`GAS_TOKEN_HASH`] as a [`ScriptHash`]
pub const GAS_TOKEN: ScriptHash = ScriptHash::from_le_bytes([
	0xcf, 0x76, 0xe2, 0x8b, 0xd0, 0x06, 0x2c, 0x4a, 0x47, 0x8e, 0xe3, 0x55, 0x61, 0x01, 0x13, 0x19,
	0xf3, 0xcf, 0xa4, 0xd2,
]);

/// Number of blocks after the current height for which a transaction stays valid
pub const MAX_VALID_UNTIL_BLOCK_INCREMENT: u32 = 5760;

/// 160-bit script hash, stored in wire (little-endian) order
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ScriptHash([u8; 20]);

impl ScriptHash {
	pub const fn from_le_bytes(bytes: [u8; 20]) -> Self {
		Self(bytes)
	}

	pub fn as_le_bytes(&self) -> &[u8; 20] {
		&self.0
	}
}

impl FromStr for ScriptHash {
	type Err = String;

	/// Parses the big-endian `0x`-prefixed form used by RPC nodes
	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let trimmed = s.trim();
		let stripped = trimmed.strip_prefix("0x").unwrap_or(trimmed);
		let mut bytes = hex::decode(stripped)
			.map_err(|e| format!("Invalid script hash '{}': {}", s, e))?;
		if bytes.len() != 20 {
			return Err(format!(
				"Invalid script hash '{}': expected 20 bytes, got {}",
				s,
				bytes.len()
			));
		}
		bytes.reverse();
		let mut out = [0u8; 20];
		out.copy_from_slice(&bytes);
		Ok(Self(out))
	}
}

impl fmt::Display for ScriptHash {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let mut bytes = self.0;
		bytes.reverse();
		write!(f, "0x{}", hex::encode(bytes))
	}
}

impl fmt::Debug for ScriptHash {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "ScriptHash({})", self)
	}
}

impl Serialize for ScriptHash {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.serialize_str(&self.to_string())
	}
}

impl<'de> Deserialize<'de> for ScriptHash {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		let s = String::deserialize(deserializer)?;
		ScriptHash::from_str(&s).map_err(serde::de::Error::custom)
	}
}

/// Witness scope of a signer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Neo3WitnessScope {
	None,
	#[default]
	CalledByEntry,
	Global,
}

impl Neo3WitnessScope {
	fn as_byte(&self) -> u8 {
		match self {
			Neo3WitnessScope::None => 0x00,
			Neo3WitnessScope::CalledByEntry => 0x01,
			Neo3WitnessScope::Global => 0x80,
		}
	}
}

/// Account authorizing a transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Neo3Signer {
	pub account: ScriptHash,
	pub scopes: Neo3WitnessScope,
}

impl Neo3Signer {
	pub fn called_by_entry(account: ScriptHash) -> Self {
		Self {
			account,
			scopes: Neo3WitnessScope::CalledByEntry,
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Neo3TransactionAttribute {
	/// Committee-only attribute that moves the transaction to the front of the mempool
	HighPriority,
}

impl Neo3TransactionAttribute {
	fn as_byte(&self) -> u8 {
		match self {
			Neo3TransactionAttribute::HighPriority => 0x01,
		}
	}
}

/// Invocation and verification scripts proving a signer's authorization
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Neo3Witness {
	pub invocation_script: Vec<u8>,
	pub verification_script: Vec<u8>,
}

impl Neo3Witness {
	/// Witness carrying only the verification script, used for fee estimation
	pub fn placeholder(verification_script: Vec<u8>) -> Self {
		Self {
			invocation_script: Vec::new(),
			verification_script,
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Neo3Transaction {
	pub version: u8,
	pub nonce: u32,
	pub system_fee: i64,
	pub network_fee: i64,
	pub valid_until_block: u32,
	pub signers: Vec<Neo3Signer>,
	pub attributes: Vec<Neo3TransactionAttribute>,
	pub script: Vec<u8>,
	pub witnesses: Vec<Neo3Witness>,
}

impl Neo3Transaction {
	/// Creates an unsigned version 0 transaction with a random nonce and no fees
	pub fn new(script: Vec<u8>, signers: Vec<Neo3Signer>) -> Self {
		Self {
			version: 0,
			nonce: rand::random(),
			system_fee: 0,
			network_fee: 0,
			valid_until_block: 0,
			signers,
			attributes: Vec::new(),
			script,
			witnesses: Vec::new(),
		}
	}

	/// Serializes everything except the witnesses
	pub fn unsigned_bytes(&self) -> Vec<u8> {
		let mut writer = BinaryWriter::default();
		writer.write_u8(self.version);
		writer.write_u32(self.nonce);
		writer.write_i64(self.system_fee);
		writer.write_i64(self.network_fee);
		writer.write_u32(self.valid_until_block);

		writer.write_var_int(self.signers.len() as u64);
		for signer in &self.signers {
			writer.write_bytes(signer.account.as_le_bytes());
			writer.write_u8(signer.scopes.as_byte());
		}

		writer.write_var_int(self.attributes.len() as u64);
		for attribute in &self.attributes {
			writer.write_u8(attribute.as_byte());
		}

		writer.write_var_bytes(&self.script);
		writer.into_inner()
	}

	/// Full wire encoding, witnesses included
	pub fn to_bytes(&self) -> Vec<u8> {
		let mut writer = BinaryWriter::from(self.unsigned_bytes());
		writer.write_var_int(self.witnesses.len() as u64);
		for witness in &self.witnesses {
			writer.write_var_bytes(&witness.invocation_script);
			writer.write_var_bytes(&witness.verification_script);
		}
		writer.into_inner()
	}

	pub fn to_base64(&self) -> String {
		BASE64.encode(self.to_bytes())
	}

	/// SHA-256 of the unsigned payload
	pub fn hash(&self) -> [u8; 32] {
		Sha256::digest(self.unsigned_bytes()).into()
	}

	/// Transaction id as reported by RPC nodes: `0x` followed by the byte-reversed hash
	pub fn hash_string(&self) -> String {
		let mut hash = self.hash();
		hash.reverse();
		format!("0x{}", hex::encode(hash))
	}

	/// Bytes a signer has to sign: the network magic (little-endian) then the hash
	pub fn sign_data(&self, network_magic: u32) -> Vec<u8> {
		let mut data = Vec::with_capacity(36);
		data.extend_from_slice(&network_magic.to_le_bytes());
		data.extend_from_slice(&self.hash());
		data
	}
}

#[derive(Default)]
struct BinaryWriter {
	buf: Vec<u8>,
}

impl From<Vec<u8>> for BinaryWriter {
	fn from(buf: Vec<u8>) -> Self {
		Self { buf }
	}
}

impl BinaryWriter {
	fn write_u8(&mut self, value: u8) {
		self.buf.push(value);
	}

	fn write_u32(&mut self, value: u32) {
		self.buf.extend_from_slice(&value.to_le_bytes());
	}

	fn write_i64(&mut self, value: i64) {
		self.buf.extend_from_slice(&value.to_le_bytes());
	}

	fn write_bytes(&mut self, bytes: &[u8]) {
		self.buf.extend_from_slice(bytes);
	}

	fn write_var_int(&mut self, value: u64) {
		if value < 0xFD {
			self.buf.push(value as u8);
		} else if value <= 0xFFFF {
			self.buf.push(0xFD);
			self.buf.extend_from_slice(&(value as u16).to_le_bytes());
		} else if value <= 0xFFFF_FFFF {
			self.buf.push(0xFE);
			self.buf.extend_from_slice(&(value as u32).to_le_bytes());
		} else {
			self.buf.push(0xFF);
			self.buf.extend_from_slice(&value.to_le_bytes());
		}
	}

	fn write_var_bytes(&mut self, bytes: &[u8]) {
		self.write_var_int(bytes.len() as u64);
		self.buf.extend_from_slice(bytes);
	}

	fn into_inner(self) -> Vec<u8> {
		self.buf
	}
}
