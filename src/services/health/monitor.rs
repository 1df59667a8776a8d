//! Background height polling.
//!
//! [`HeightPoller`] runs one pass: every endpoint is asked for its height concurrently,
//! each call bounded by the request timeout, and the results are applied to the
//! [`NodePool`] at once. [`HeightMonitor`] repeats passes on a fixed interval in a tokio
//! task until it is stopped or dropped.

use chrono::Utc;
use futures::future::join_all;
use parking_lot::Mutex;
use std::{sync::Arc, time::Duration};
use tokio::{
	sync::watch,
	task::JoinHandle,
	time::{interval_at, Instant, MissedTickBehavior},
};
use tracing::{debug, info, warn};

use crate::{
	services::{
		blockchain::ChainEndpoint,
		health::{NodePool, PollOutcome},
	},
	utils::metrics::{record_endpoint_height, record_poll_failure, record_pool_max_height},
};

/// Counts of one poll pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSummary {
	pub succeeded: usize,
	pub failed: usize,
	pub max_height: u64,
}

/// Polls the endpoints of one pool
pub struct HeightPoller<E: ChainEndpoint> {
	chain_id: u64,
	pool: Arc<NodePool>,
	endpoints: Vec<Arc<E>>,
	request_timeout: Duration,
}

impl<E: ChainEndpoint> HeightPoller<E> {
	/// `endpoints[i]` must be the endpoint recorded at position `i` of `pool`
	pub fn new(
		chain_id: u64,
		pool: Arc<NodePool>,
		endpoints: Vec<Arc<E>>,
		request_timeout: Duration,
	) -> Self {
		Self {
			chain_id,
			pool,
			endpoints,
			request_timeout,
		}
	}

	pub fn pool(&self) -> &Arc<NodePool> {
		&self.pool
	}

	/// Runs a single pass over all endpoints.
	///
	/// No lock is held while requests are in flight.
	pub async fn poll_once(&self) -> PollSummary {
		let timeout = self.request_timeout;
		let requests = self.endpoints.iter().map(|endpoint| async move {
			match tokio::time::timeout(timeout, endpoint.get_latest_height()).await {
				Ok(Ok(height)) => PollOutcome::Height(height),
				Ok(Err(e)) => PollOutcome::Failed(e.to_string()),
				Err(_) => PollOutcome::Failed(format!("timed out after {}ms", timeout.as_millis())),
			}
		});
		let outcomes = join_all(requests).await;

		let max_height = self.pool.apply(&outcomes, Utc::now());

		let mut summary = PollSummary {
			succeeded: 0,
			failed: 0,
			max_height,
		};
		for (endpoint, outcome) in self.endpoints.iter().zip(&outcomes) {
			match outcome {
				PollOutcome::Height(height) => {
					summary.succeeded += 1;
					record_endpoint_height(self.chain_id, endpoint.address(), *height);
					debug!(
						chain_id = self.chain_id,
						url = endpoint.address(),
						height = height,
						"Endpoint height polled"
					);
				}
				PollOutcome::Failed(error) => {
					summary.failed += 1;
					record_poll_failure(self.chain_id, endpoint.address());
					warn!(
						chain_id = self.chain_id,
						url = endpoint.address(),
						error = %error,
						"Endpoint height poll failed"
					);
				}
			}
		}
		record_pool_max_height(self.chain_id, max_height);

		summary
	}
}

/// Handle of the background polling task
pub struct HeightMonitor {
	shutdown: watch::Sender<bool>,
	handle: Mutex<Option<JoinHandle<()>>>,
}

impl HeightMonitor {
	/// Spawns the polling task. The first pass runs one `interval` from now.
	///
	/// Must be called from within a tokio runtime. `interval` must be non-zero.
	pub fn start<E: ChainEndpoint>(poller: Arc<HeightPoller<E>>, interval: Duration) -> Self {
		let (shutdown, mut shutdown_rx) = watch::channel(false);
		let chain_id = poller.chain_id;

		let handle = tokio::spawn(async move {
			let mut ticker = interval_at(Instant::now() + interval, interval);
			ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

			loop {
				tokio::select! {
					_ = ticker.tick() => {
						poller.poll_once().await;
					}
					_ = shutdown_rx.changed() => {
						info!(chain_id = chain_id, "Height monitor shutting down");
						break;
					}
				}
			}
		});

		Self {
			shutdown,
			handle: Mutex::new(Some(handle)),
		}
	}

	/// Stops scheduling new passes. A pass already running completes.
	pub fn stop(&self) {
		self.shutdown.send_replace(true);
	}

	pub fn is_running(&self) -> bool {
		self.handle
			.lock()
			.as_ref()
			.map(|handle| !handle.is_finished())
			.unwrap_or(false)
	}

	/// Stops the task and waits for it to exit
	pub async fn shutdown(&self) {
		self.stop();
		let handle = self.handle.lock().take();
		if let Some(handle) = handle {
			if let Err(e) = handle.await {
				warn!(error = %e, "Height monitor task ended abnormally");
			}
		}
	}
}

impl Drop for HeightMonitor {
	fn drop(&mut self) {
		self.stop();
	}
}
