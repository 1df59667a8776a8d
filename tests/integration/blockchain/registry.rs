use std::{
	sync::{
		atomic::{AtomicUsize, Ordering},
		Arc,
	},
	time::Duration,
};

use relayer_chain_sdk::{
	models::{GapBoundary, SelectionConfig},
	services::blockchain::{BlockChainError, SdkRegistry},
};

use crate::integration::mocks::{EndpointScript, ScriptedEndpoint};

fn config(addresses: &[&str]) -> SelectionConfig {
	SelectionConfig::new(
		88,
		addresses.iter().map(|a| a.to_string()).collect(),
		Duration::from_secs(60),
		2,
	)
}

fn registry(script: EndpointScript, created: Arc<AtomicUsize>) -> SdkRegistry<ScriptedEndpoint> {
	SdkRegistry::with_factory(move |address: &str, _config: &SelectionConfig| {
		created.fetch_add(1, Ordering::SeqCst);
		Ok(ScriptedEndpoint::new(address, &script))
	})
}

#[tokio::test]
async fn test_concurrent_callers_share_one_pool() {
	let created = Arc::new(AtomicUsize::new(0));
	let registry = Arc::new(registry(EndpointScript::at(10), created.clone()));

	let mut handles = Vec::new();
	for _ in 0..16 {
		let registry = registry.clone();
		handles.push(tokio::spawn(async move {
			registry
				.get_or_create(&config(&["http://a", "http://b"]))
				.await
				.unwrap()
		}));
	}

	let mut sdks = Vec::new();
	for handle in handles {
		sdks.push(handle.await.unwrap());
	}

	assert!(sdks.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
	assert_eq!(created.load(Ordering::SeqCst), 2);
	assert_eq!(registry.len().await, 1);
	registry.shutdown_all().await;
}

#[tokio::test]
async fn test_different_configs_get_different_pools() {
	let registry = registry(EndpointScript::at(10), Arc::new(AtomicUsize::new(0)));

	let a = registry.get_or_create(&config(&["http://a"])).await.unwrap();
	let b = registry
		.get_or_create(&config(&["http://a"]).with_gap_boundary(GapBoundary::Strict))
		.await
		.unwrap();

	assert!(!Arc::ptr_eq(&a, &b));
	assert_eq!(registry.keys().await.len(), 2);
	registry.shutdown_all().await;
}

#[tokio::test]
async fn test_unreachable_pool_is_not_cached_when_required() {
	let script = EndpointScript::at(10);
	script.set_failing(true);
	let registry = registry(script.clone(), Arc::new(AtomicUsize::new(0)));
	let strict = config(&["http://a"]).with_require_reachable_on_start(true);

	assert!(matches!(
		registry.get_or_create(&strict).await,
		Err(BlockChainError::ClientPoolError(_))
	));
	assert!(registry.is_empty().await);

	script.set_failing(false);
	let sdk = registry.get_or_create(&strict).await.unwrap();
	assert_eq!(sdk.status().max_height, 10);
	registry.shutdown_all().await;
}

#[tokio::test]
async fn test_remove_stops_the_monitor() {
	let registry = registry(EndpointScript::at(1), Arc::new(AtomicUsize::new(0)));
	let cfg = config(&["http://a"]);
	let sdk = registry.get_or_create(&cfg).await.unwrap();
	assert!(sdk.is_running());

	let removed = registry.remove(&cfg.key()).await.unwrap();
	assert!(Arc::ptr_eq(&sdk, &removed));
	sdk.shutdown().await;
	assert!(!sdk.is_running());
	assert!(registry.get(&cfg.key()).await.is_none());
}

#[tokio::test]
async fn test_waiter_takes_over_failed_construction() {
	let unreachable = EndpointScript::at(10);
	unreachable.set_failing(true);
	unreachable.set_delay(Duration::from_millis(20));
	let healthy = EndpointScript::at(10);
	healthy.set_delay(Duration::from_millis(60));

	let created = Arc::new(AtomicUsize::new(0));
	let registry = {
		let created = created.clone();
		Arc::new(SdkRegistry::with_factory(
			move |address: &str, _config: &SelectionConfig| {
				let script = match created.fetch_add(1, Ordering::SeqCst) {
					0 => &unreachable,
					_ => &healthy,
				};
				Ok(ScriptedEndpoint::new(address, script))
			},
		))
	};
	let strict = config(&["http://a"]).with_require_reachable_on_start(true);

	let spawn_caller = |delay_ms: u64| {
		let registry = registry.clone();
		let strict = strict.clone();
		tokio::spawn(async move {
			tokio::time::sleep(Duration::from_millis(delay_ms)).await;
			registry.get_or_create(&strict).await
		})
	};
	let first = spawn_caller(0);
	let second = spawn_caller(5);
	let third = spawn_caller(45);

	assert!(matches!(
		first.await.unwrap(),
		Err(BlockChainError::ClientPoolError(_))
	));
	let second = second.await.unwrap().unwrap();
	let third = third.await.unwrap().unwrap();

	assert!(Arc::ptr_eq(&second, &third));
	assert_eq!(created.load(Ordering::SeqCst), 2);
	assert_eq!(registry.len().await, 1);
	registry.shutdown_all().await;
}
