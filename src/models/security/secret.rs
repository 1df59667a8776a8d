//! Secret values referenced by configuration files.
//!
//! RPC URLs often embed API keys, so they are held in [`SecretString`]s that zero their
//! memory on drop. A secret is either written inline (`plain`) or read from an
//! environment variable (`environment`).

use serde::{Deserialize, Serialize};
use std::{env, fmt};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::{
	impl_case_insensitive_enum,
	models::security::error::{SecurityError, SecurityResult},
};

/// Secret that is either stored inline or referenced by environment variable name
#[derive(Debug, Clone, Serialize, ZeroizeOnDrop)]
#[serde(tag = "type", content = "value")]
#[serde(deny_unknown_fields)]
pub enum SecretValue {
	/// A plain text secret value
	Plain(SecretString),
	/// Name of the environment variable holding the secret
	Environment(String),
}

impl_case_insensitive_enum!(SecretValue, {
	"plain" => Plain,
	"environment" => Environment,
});

impl PartialEq for SecretValue {
	fn eq(&self, other: &Self) -> bool {
		match (self, other) {
			(Self::Plain(l0), Self::Plain(r0)) => l0.as_str() == r0.as_str(),
			(Self::Environment(l0), Self::Environment(r0)) => l0 == r0,
			_ => false,
		}
	}
}

/// String that zeroes its contents when dropped
#[derive(Debug, Clone, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct SecretString(String);

impl PartialEq for SecretString {
	fn eq(&self, other: &Self) -> bool {
		self.0 == other.0
	}
}

impl SecretValue {
	/// Reads the secret from its source
	pub async fn resolve(&self) -> SecurityResult<SecretString> {
		match self {
			SecretValue::Plain(secret) => Ok(secret.clone()),
			SecretValue::Environment(env_var) => {
				env::var(env_var).map(SecretString::new).map_err(|e| {
					Box::new(SecurityError::parse_error(
						format!("Failed to get environment variable {}", env_var),
						Some(e.into()),
						None,
					))
				})
			}
		}
	}

	pub fn starts_with(&self, prefix: &str) -> bool {
		self.as_str().starts_with(prefix)
	}

	pub fn is_empty(&self) -> bool {
		self.as_str().is_empty()
	}

	/// The inline secret, or the variable name for environment references
	pub fn as_str(&self) -> &str {
		match self {
			SecretValue::Plain(secret) => secret.as_str(),
			SecretValue::Environment(env_var) => env_var,
		}
	}
}

impl Zeroize for SecretValue {
	fn zeroize(&mut self) {
		match self {
			SecretValue::Plain(secret) => secret.zeroize(),
			SecretValue::Environment(env_var) => env_var.clear(),
		}
	}
}

impl SecretString {
	pub fn new(value: String) -> Self {
		Self(value)
	}

	/// Exposes the secret. Do not keep the returned reference around.
	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl From<String> for SecretString {
	fn from(value: String) -> Self {
		Self::new(value)
	}
}

impl AsRef<str> for SecretString {
	fn as_ref(&self) -> &str {
		self.as_str()
	}
}

impl fmt::Display for SecretValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.as_str())
	}
}

impl AsRef<str> for SecretValue {
	fn as_ref(&self) -> &str {
		self.as_str()
	}
}
