//! Fault-tolerant multi-endpoint chain client.
//!
//! Keeps a pool of RPC endpoints per chain, polls their heights in the background and routes
//! every request to a fresh endpoint. It includes:
//!
//! - Height-monitored endpoint pools with deterministic and load-spreading selection
//! - A registry that shares one pool per configuration across callers
//! - Neo N3 reads (block count, epoch height, balances) and a transaction pipeline
//! - Configuration management through JSON files
//!
//! # Module Structure
//!
//! - `bootstrap`: Loads configurations and starts pools
//! - `models`: Configuration, selection parameters and Neo N3 data structures
//! - `repositories`: Configuration storage and management
//! - `services`: Endpoint clients, health monitoring, registries and the transaction pipeline
//! - `utils`: Common utilities and helper functions

pub mod bootstrap;
pub mod models;
pub mod repositories;
pub mod services;
pub mod utils;
