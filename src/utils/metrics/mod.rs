//! Metrics module for the application.
//!
//! - This module contains the global Prometheus registry.
//! - Defines the endpoint health metrics updated by the height monitor.

pub mod server;
use lazy_static::lazy_static;

use crate::services::blockchain::ChainRegistries;
use prometheus::{Encoder, Gauge, GaugeVec, IntCounterVec, Opts, Registry, TextEncoder};

lazy_static! {
	/// Global Prometheus registry.
	pub static ref REGISTRY: Registry = Registry::new();

	/// Last height reported by each endpoint.
	///
	/// Keeps the last known-good value while an endpoint is failing.
	pub static ref ENDPOINT_HEIGHT: GaugeVec = {
		let gauge = GaugeVec::new(
			Opts::new("endpoint_height", "Last height reported by an endpoint"),
			&["chain_id", "url"]
		).unwrap();
		REGISTRY.register(Box::new(gauge.clone())).unwrap();
		gauge
	};

	/// Highest height seen across the endpoints of a pool.
	pub static ref POOL_MAX_HEIGHT: GaugeVec = {
		let gauge = GaugeVec::new(
			Opts::new("pool_max_height", "Highest known-good height in an endpoint pool"),
			&["chain_id"]
		).unwrap();
		REGISTRY.register(Box::new(gauge.clone())).unwrap();
		gauge
	};

	/// Number of failed height polls per endpoint.
	pub static ref ENDPOINT_POLL_FAILURES: IntCounterVec = {
		let counter = IntCounterVec::new(
			Opts::new("endpoint_poll_failures_total", "Failed height polls of an endpoint"),
			&["chain_id", "url"]
		).unwrap();
		REGISTRY.register(Box::new(counter.clone())).unwrap();
		counter
	};

	/// Number of live endpoint pools across all registries.
	pub static ref POOLS_ACTIVE: Gauge = {
		let gauge = Gauge::new("pools_active", "Number of live endpoint pools").unwrap();
		REGISTRY.register(Box::new(gauge.clone())).unwrap();
		gauge
	};
}

/// Gather all metrics and encode into the provided format.
pub fn gather_metrics() -> Result<Vec<u8>, Box<dyn std::error::Error>> {
	let encoder = TextEncoder::new();
	let metric_families = REGISTRY.gather();
	let mut buffer = Vec::new();
	encoder.encode(&metric_families, &mut buffer)?;
	Ok(buffer)
}

/// Records a successful height poll
pub fn record_endpoint_height(chain_id: u64, url: &str, height: u64) {
	let chain_id = chain_id.to_string();
	ENDPOINT_HEIGHT
		.with_label_values(&[chain_id.as_str(), url])
		.set(height as f64);
}

/// Records a failed height poll
pub fn record_poll_failure(chain_id: u64, url: &str) {
	let chain_id = chain_id.to_string();
	ENDPOINT_POLL_FAILURES
		.with_label_values(&[chain_id.as_str(), url])
		.inc();
}

pub fn record_pool_max_height(chain_id: u64, height: u64) {
	let chain_id = chain_id.to_string();
	POOL_MAX_HEIGHT
		.with_label_values(&[chain_id.as_str()])
		.set(height as f64);
}

/// Counts a pool whose monitor was started
pub fn record_pool_started() {
	POOLS_ACTIVE.inc();
}

pub fn record_pool_stopped() {
	POOLS_ACTIVE.dec();
}

/// Refreshes the pool gauges from the live registries
pub async fn update_pool_metrics(registries: &ChainRegistries) {
	let mut pools = 0usize;
	for sdk in registries.neo3.sdks().await {
		record_pool_max_height(sdk.chain_id(), sdk.status().max_height);
		pools += 1;
	}
	for sdk in registries.evm.sdks().await {
		record_pool_max_height(sdk.chain_id(), sdk.status().max_height);
		pools += 1;
	}
	POOLS_ACTIVE.set(pools as f64);
}
