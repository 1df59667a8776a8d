//! Core services.
//!
//! - `blockchain`: endpoint clients, endpoint pools and their registry
//! - `health`: endpoint health tracking, background polling and selection
//! - `wallet`: transaction build, sign and broadcast

pub mod blockchain;
pub mod health;
pub mod wallet;
