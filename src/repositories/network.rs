//! Network configuration repository.
//!
//! Loads every network definition of a directory once and serves lookups by file stem or
//! by slug.

#![allow(clippy::result_large_err)]

use std::{collections::HashMap, path::Path};

use async_trait::async_trait;

use crate::{
	models::{ConfigLoader, Network},
	repositories::error::RepositoryError,
	utils::normalize_string,
};

#[derive(Clone)]
pub struct NetworkRepository {
	pub networks: HashMap<String, Network>,
}

impl NetworkRepository {
	pub async fn new(path: Option<&Path>) -> Result<Self, RepositoryError> {
		let networks = Self::load_all(path).await?;
		Ok(NetworkRepository { networks })
	}
}

#[async_trait]
pub trait NetworkRepositoryTrait: Clone {
	async fn new(path: Option<&Path>) -> Result<Self, RepositoryError>
	where
		Self: Sized;

	async fn load_all(path: Option<&Path>) -> Result<HashMap<String, Network>, RepositoryError>;

	/// Network stored under its file stem
	fn get(&self, network_id: &str) -> Option<Network>;

	fn get_all(&self) -> HashMap<String, Network>;
}

#[async_trait]
impl NetworkRepositoryTrait for NetworkRepository {
	async fn new(path: Option<&Path>) -> Result<Self, RepositoryError> {
		NetworkRepository::new(path).await
	}

	async fn load_all(path: Option<&Path>) -> Result<HashMap<String, Network>, RepositoryError> {
		Network::load_all(path).await.map_err(|e| {
			RepositoryError::load_error(
				"Failed to load networks",
				Some(Box::new(e)),
				Some(HashMap::from([(
					"path".to_string(),
					path.map_or_else(|| "default".to_string(), |p| p.display().to_string()),
				)])),
			)
		})
	}

	fn get(&self, network_id: &str) -> Option<Network> {
		self.networks.get(network_id).cloned()
	}

	fn get_all(&self) -> HashMap<String, Network> {
		self.networks.clone()
	}
}

/// Read access to network configurations
#[derive(Clone)]
pub struct NetworkService<T: NetworkRepositoryTrait> {
	repository: T,
}

impl<T: NetworkRepositoryTrait> NetworkService<T> {
	pub async fn new(
		path: Option<&Path>,
	) -> Result<NetworkService<NetworkRepository>, RepositoryError> {
		let repository = NetworkRepository::new(path).await?;
		Ok(NetworkService { repository })
	}

	pub fn new_with_repository(repository: T) -> Self {
		NetworkService { repository }
	}

	pub fn get(&self, network_id: &str) -> Option<Network> {
		self.repository.get(network_id)
	}

	pub fn get_all(&self) -> HashMap<String, Network> {
		self.repository.get_all()
	}

	/// Network whose slug matches `slug`, ignoring case and surrounding whitespace
	pub fn get_by_slug(&self, slug: &str) -> Result<Network, RepositoryError> {
		let wanted = normalize_string(slug);
		self.repository
			.get_all()
			.into_values()
			.find(|network| normalize_string(&network.slug) == wanted)
			.ok_or_else(|| {
				RepositoryError::not_found(
					"Unknown network",
					None,
					Some(HashMap::from([("slug".to_string(), slug.to_string())])),
				)
			})
	}

	/// All networks ordered by slug
	pub fn sorted(&self) -> Vec<Network> {
		let mut networks: Vec<Network> = self.repository.get_all().into_values().collect();
		networks.sort_by(|a, b| a.slug.cmp(&b.slug));
		networks
	}
}
