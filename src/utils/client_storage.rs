use std::{collections::HashMap, future::Future, sync::Arc};
use tokio::sync::{OnceCell, RwLock};

/// Keyed storage of shared clients where each key is initialized at most once.
///
/// Every key owns a [`OnceCell`]. Concurrent initializers of the same key wait on that
/// cell and all receive the value produced by the first successful initialization, while
/// different keys initialize independently. When an initialization fails, the next waiter
/// on the same cell runs its own; the cell is dropped from the map only once no caller
/// holds it anymore.
pub struct ClientStorage<T> {
	pub clients: Arc<RwLock<HashMap<String, Arc<OnceCell<Arc<T>>>>>>,
}

impl<T> Default for ClientStorage<T> {
	fn default() -> Self {
		Self::new()
	}
}

impl<T> ClientStorage<T> {
	pub fn new() -> Self {
		Self {
			clients: Arc::new(RwLock::new(HashMap::new())),
		}
	}

	/// Returns the initialized client stored under `key`, if any
	pub async fn get(&self, key: &str) -> Option<Arc<T>> {
		self.clients
			.read()
			.await
			.get(key)
			.and_then(|cell| cell.get().cloned())
	}

	/// Returns the client under `key`, running `init` if no client exists yet.
	///
	/// Only the map lookup happens under the storage-wide lock; `init` runs under the
	/// per-key cell. A failure is returned to this caller only. Callers already waiting
	/// on the cell take over the initialization.
	pub async fn get_or_try_init<F, Fut, E>(&self, key: &str, init: F) -> Result<Arc<T>, E>
	where
		F: FnOnce() -> Fut,
		Fut: Future<Output = Result<T, E>>,
	{
		// Fast path
		if let Some(client) = self.get(key).await {
			return Ok(client);
		}

		let cell = {
			let mut clients = self.clients.write().await;
			clients
				.entry(key.to_string())
				.or_insert_with(|| Arc::new(OnceCell::new()))
				.clone()
		};

		match cell
			.get_or_try_init(|| async move { init().await.map(Arc::new) })
			.await
		{
			Ok(client) => Ok(client.clone()),
			Err(e) => {
				let mut clients = self.clients.write().await;
				// Map entry plus our clone: no waiter can pick the cell up anymore
				let unshared = clients.get(key).is_some_and(|existing| {
					Arc::ptr_eq(existing, &cell) && Arc::strong_count(&cell) == 2
				});
				if unshared && !cell.initialized() {
					clients.remove(key);
				}
				Err(e)
			}
		}
	}

	/// Removes and returns the client stored under `key`.
	///
	/// An initialization still in progress is left in place.
	pub async fn remove(&self, key: &str) -> Option<Arc<T>> {
		let mut clients = self.clients.write().await;
		let client = clients.get(key)?.get().cloned()?;
		clients.remove(key);
		Some(client)
	}

	/// Removes and returns every initialized client
	pub async fn drain(&self) -> Vec<Arc<T>> {
		self.clients
			.write()
			.await
			.drain()
			.filter_map(|(_, cell)| cell.get().cloned())
			.collect()
	}

	/// Keys of all initialized clients
	pub async fn keys(&self) -> Vec<String> {
		self.clients
			.read()
			.await
			.iter()
			.filter(|(_, cell)| cell.initialized())
			.map(|(key, _)| key.clone())
			.collect()
	}

	/// Number of initialized clients
	pub async fn len(&self) -> usize {
		self.clients
			.read()
			.await
			.values()
			.filter(|cell| cell.initialized())
			.count()
	}

	pub async fn is_empty(&self) -> bool {
		self.len().await == 0
	}
}
