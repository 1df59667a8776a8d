use std::sync::{
	atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering},
	Arc,
};

use async_trait::async_trait;
use mockall::mock;

use relayer_chain_sdk::services::blockchain::ChainEndpoint;

mock! {
	/// Endpoint whose answers are set per test through expectations
	pub ChainEndpoint {}

	#[async_trait]
	impl ChainEndpoint for ChainEndpoint {
		fn address(&self) -> &str;
		async fn get_latest_height(&self) -> Result<u64, anyhow::Error>;
	}
}

/// Controls shared with a [`ScriptedEndpoint`] after it was moved into a pool
#[derive(Clone, Default)]
pub struct EndpointScript {
	pub height: Arc<AtomicU64>,
	pub failing: Arc<AtomicBool>,
	pub calls: Arc<AtomicUsize>,
	/// Response delay in milliseconds
	pub delay_ms: Arc<AtomicU64>,
}

impl EndpointScript {
	pub fn at(height: u64) -> Self {
		let script = Self::default();
		script.height.store(height, Ordering::SeqCst);
		script
	}

	pub fn set_height(&self, height: u64) {
		self.height.store(height, Ordering::SeqCst);
	}

	pub fn set_failing(&self, failing: bool) {
		self.failing.store(failing, Ordering::SeqCst);
	}

	pub fn set_delay(&self, delay: std::time::Duration) {
		self.delay_ms.store(delay.as_millis() as u64, Ordering::SeqCst);
	}

	pub fn calls(&self) -> usize {
		self.calls.load(Ordering::SeqCst)
	}
}

/// Endpoint whose height can be changed while a monitor polls it
pub struct ScriptedEndpoint {
	pub address: String,
	pub script: EndpointScript,
}

impl ScriptedEndpoint {
	pub fn new(address: &str, script: &EndpointScript) -> Self {
		Self {
			address: address.to_string(),
			script: script.clone(),
		}
	}
}

#[async_trait]
impl ChainEndpoint for ScriptedEndpoint {
	fn address(&self) -> &str {
		&self.address
	}

	async fn get_latest_height(&self) -> Result<u64, anyhow::Error> {
		self.script.calls.fetch_add(1, Ordering::SeqCst);
		let delay = self.script.delay_ms.load(Ordering::SeqCst);
		if delay > 0 {
			tokio::time::sleep(std::time::Duration::from_millis(delay)).await;
		}
		if self.script.failing.load(Ordering::SeqCst) {
			anyhow::bail!("{} is unreachable", self.address);
		}
		Ok(self.script.height.load(Ordering::SeqCst))
	}
}
