//! Endpoint pool service entry point.
//!
//! Loads the network configurations, starts one height-monitored endpoint pool per network
//! and logs the pool status until interrupted.
//!
//! # Flow
//! 1. Loads network configurations from the config directory
//! 2. With `--check`, validates them and exits
//! 3. With `--network`, reads a single value (latest height or epoch height) and exits
//! 4. Otherwise starts every pool, optionally the metrics server, and runs until Ctrl+C

pub mod bootstrap;
pub mod models;
pub mod repositories;
pub mod services;
pub mod utils;

use crate::{
	bootstrap::{
		initialize_services, log_pool_status, read_epoch_height, read_latest_height,
		start_network_pools, Result,
	},
	repositories::{NetworkRepository, NetworkService},
	services::blockchain::ChainRegistries,
	utils::{
		logging::setup_logging, metrics::server::create_metrics_server, parse_string_to_bytes_size,
	},
};

use clap::Parser;
use dotenvy::dotenv_override;
use std::{
	env::{set_var, var},
	path::{Path, PathBuf},
	sync::Arc,
	time::Duration,
};
use tracing::{error, info, instrument};

const STATUS_LOG_INTERVAL: Duration = Duration::from_secs(30);

#[derive(Parser, Debug)]
#[command(
	name = "relayer-chain-sdk",
	about = "Keeps a height-monitored pool of RPC endpoints per chain and routes requests to the freshest one.",
	version
)]
struct Cli {
	/// Write logs to file instead of stdout
	#[arg(long)]
	log_file: bool,

	/// Set log level (trace, debug, info, warn, error)
	#[arg(long, value_name = "LEVEL")]
	log_level: Option<String>,

	/// Path to store log files (default: logs/)
	#[arg(long, value_name = "PATH")]
	log_path: Option<String>,

	/// Maximum log file size before rolling (e.g., "1GB", "500MB", "1024KB")
	#[arg(long, value_name = "SIZE", value_parser = parse_string_to_bytes_size)]
	log_max_size: Option<u64>,

	/// Address to start the metrics server on (default: 127.0.0.1:8081)
	#[arg(long, value_name = "HOST:PORT")]
	metrics_address: Option<String>,

	/// Enable metrics server
	#[arg(long)]
	metrics: bool,

	/// Configuration directory containing `networks/` (default: config)
	#[arg(long, value_name = "DIR")]
	config_dir: Option<PathBuf>,

	/// Validate configuration files without starting the service
	#[arg(long)]
	check: bool,

	/// Network to query
	#[arg(long, value_name = "NETWORK_SLUG")]
	network: Option<String>,

	/// Print the latest height of `--network`
	#[arg(long, requires = "network")]
	height: bool,

	/// Print the next epoch height of this cross-chain manager on `--network`
	#[arg(long, value_name = "CONTRACT_HASH", requires = "network", conflicts_with = "height")]
	epoch_contract: Option<String>,
}

impl Cli {
	/// Apply CLI options to environment variables, overriding any existing values
	fn apply_to_env(&self) {
		dotenv_override().ok();

		if self.log_file {
			set_var("LOG_MODE", "file");
		}

		if let Ok(level) = var("RUST_LOG") {
			set_var("LOG_LEVEL", level);
		}

		if let Some(level) = &self.log_level {
			set_var("LOG_LEVEL", level);
			set_var("RUST_LOG", level);
		}

		if let Some(path) = &self.log_path {
			set_var("LOG_DATA_DIR", path);
		}

		if let Some(max_size) = &self.log_max_size {
			set_var("LOG_MAX_SIZE", max_size.to_string());
		}

		if self.metrics {
			set_var("METRICS_ENABLED", "true");
		}

		if let Some(address) = &self.metrics_address {
			if let Some(port) = address.split(':').nth(1) {
				set_var("METRICS_PORT", port);
			}
		}
	}

	/// Directory holding the network JSON files
	fn networks_dir(&self) -> Option<PathBuf> {
		self.config_dir.as_ref().map(|dir| dir.join("networks"))
	}
}

#[tokio::main]
async fn main() -> Result<()> {
	let cli = Cli::parse();
	cli.apply_to_env();

	setup_logging().unwrap_or_else(|e| {
		error!("Failed to setup logging: {}", e);
	});

	let networks_dir = cli.networks_dir();

	if cli.check {
		validate_configuration(networks_dir.as_deref()).await;
		return Ok(());
	}

	let (networks, network_service, registries) =
		initialize_services::<NetworkRepository>(None, networks_dir.as_deref())
			.await
			.map_err(|e| anyhow::anyhow!("Failed to initialize services: {}", e))?;

	if let Some(slug) = &cli.network {
		let result = query_network(&cli, slug, &network_service, &registries).await;
		registries.shutdown_all().await;
		return result;
	}

	let metrics_enabled =
		cli.metrics || var("METRICS_ENABLED").map(|v| v == "true").unwrap_or(false);

	let metrics_address = if var("IN_DOCKER").unwrap_or_default() == "true" {
		var("METRICS_PORT")
			.map(|port| format!("0.0.0.0:{}", port))
			.unwrap_or_else(|_| "0.0.0.0:8081".to_string())
	} else {
		cli.metrics_address
			.clone()
			.unwrap_or_else(|| "127.0.0.1:8081".to_string())
	};

	let metrics_server = if metrics_enabled {
		info!("Metrics server enabled, starting on {}", metrics_address);
		match create_metrics_server(metrics_address, registries.clone()) {
			Ok(server) => Some(server),
			Err(e) => {
				error!("Failed to create metrics server: {}", e);
				None
			}
		}
	} else {
		info!("Metrics server disabled. Use --metrics flag or METRICS_ENABLED=true to enable");
		None
	};

	let started = start_network_pools(&registries, network_service.sorted().iter()).await;
	if started == 0 {
		info!(configured = networks.len(), "No network pool could be started. Exiting...");
		return Ok(());
	}

	info!(pools = started, "Service started. Press Ctrl+C to shutdown");

	let status_loop = async {
		let mut ticker = tokio::time::interval(STATUS_LOG_INTERVAL);
		loop {
			ticker.tick().await;
			log_pool_status(&registries).await;
		}
	};

	let ctrl_c = tokio::signal::ctrl_c();

	if let Some(metrics_future) = metrics_server {
		tokio::select! {
			result = ctrl_c => {
				if let Err(e) = result {
					error!("Error waiting for Ctrl+C: {}", e);
				}
				info!("Shutdown signal received, stopping services...");
			}
			result = metrics_future => {
				if let Err(e) = result {
					error!("Metrics server error: {}", e);
				}
				info!("Metrics server stopped, shutting down services...");
			}
			_ = status_loop => {}
		}
	} else {
		tokio::select! {
			result = ctrl_c => {
				if let Err(e) = result {
					error!("Error waiting for Ctrl+C: {}", e);
				}
				info!("Shutdown signal received, stopping services...");
			}
			_ = status_loop => {}
		}
	}

	registries.shutdown_all().await;

	info!("Shutdown complete");
	Ok(())
}

/// Runs the single-network action selected on the command line
#[instrument(skip_all, fields(network = slug))]
async fn query_network(
	cli: &Cli,
	slug: &str,
	network_service: &NetworkService<NetworkRepository>,
	registries: &Arc<ChainRegistries>,
) -> Result<()> {
	let network = network_service.get_by_slug(slug)?;

	match &cli.epoch_contract {
		Some(contract) => {
			let height = read_epoch_height(registries, &network, contract).await?;
			info!(contract = %contract, epoch_height = height, "Epoch height");
		}
		None => {
			if !cli.height {
				info!("No action given, reading the latest height");
			}
			let height = read_latest_height(registries, &network).await?;
			info!(height, "Latest height");
		}
	}
	Ok(())
}

/// Loads and validates every network configuration, logging the outcome
async fn validate_configuration(path: Option<&Path>) -> bool {
	info!("Validating configuration files...");

	match initialize_services::<NetworkRepository>(None, path).await {
		Ok((networks, _, _)) => {
			if networks.is_empty() {
				error!("No networks configured");
				return false;
			}
			for network in networks.values() {
				info!(
					"✓ {} ({}, chain id {}, {} endpoint(s))",
					network.slug,
					network.network_type,
					network.chain_id,
					network.selection_config().endpoints.len()
				);
			}
			info!("Configuration validation completed successfully!");
			true
		}
		Err(e) => {
			error!("{}", e);
			false
		}
	}
}
