//! Parsing utilities

use byte_unit::Byte;
use std::str::FromStr;

/// Parses a human-readable size such as "1GB" or "512MiB" into bytes.
pub fn parse_string_to_bytes_size(s: &str) -> Result<u64, String> {
	Byte::from_str(s)
		.map(|byte| byte.as_u64())
		.map_err(|e| format!("Invalid size format: '{}'. Error: {}", s, e))
}

/// Trims and lower-cases `input` for case-insensitive comparisons.
pub fn normalize_string(input: &str) -> String {
	input.trim().to_lowercase()
}
