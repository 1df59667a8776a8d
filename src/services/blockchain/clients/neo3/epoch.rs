//! Decoding of the cross-chain manager's persisted epoch height.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::collections::HashMap;

use super::error::Neo3ClientError;

/// Storage key of the current epoch start height in the cross-chain manager contract.
///
/// Raw key bytes `02 01`.
pub const EPOCH_HEIGHT_STORAGE_KEY: &str = "AgE=";

/// Converts the stored epoch height into the next height to synchronize.
///
/// Absent or empty values mean nothing was synchronized yet and yield 0. A present value is
/// a little-endian unsigned integer of at most eight bytes and yields that value plus one.
pub fn decode_epoch_height(raw: Option<&str>) -> Result<u64, Neo3ClientError> {
	let raw = match raw {
		Some(raw) if !raw.is_empty() => raw,
		_ => return Ok(0),
	};

	let metadata = || Some(HashMap::from([("value".to_string(), raw.to_string())]));

	let bytes = STANDARD.decode(raw).map_err(|e| {
		Neo3ClientError::decode_error(
			"Stored epoch height is not valid base64",
			Some(Box::new(e)),
			metadata(),
		)
	})?;

	if bytes.is_empty() {
		return Ok(0);
	}
	if bytes.len() > 8 {
		return Err(Neo3ClientError::decode_error(
			format!(
				"Stored epoch height has {} bytes, at most 8 are supported",
				bytes.len()
			),
			None,
			metadata(),
		));
	}

	let mut buf = [0u8; 8];
	buf[..bytes.len()].copy_from_slice(&bytes);
	u64::from_le_bytes(buf)
		.checked_add(1)
		.ok_or_else(|| Neo3ClientError::decode_error("Stored epoch height overflows", None, metadata()))
}
