pub mod indexing;
pub mod recommend;

mod error;

pub use error::{Error, Result};
pub use indexing::BuildReport;
pub use recommend::RecommendResponse;

use std::{future::Future, pin::Pin, sync::Arc};

use carrec_config::{Config, EmbeddingProviderConfig};
use carrec_domain::VehicleRecord;
use carrec_providers::embedding;
use carrec_storage::{db::Db, index::IndexStore, vehicles};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub trait EmbeddingProvider
where
	Self: Send + Sync,
{
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, color_eyre::Result<Vec<Vec<f32>>>>;
}

/// Supplies the raw catalog for an index build.
pub trait VehicleSource
where
	Self: Send + Sync,
{
	fn fetch_all(&self) -> BoxFuture<'_, color_eyre::Result<Vec<VehicleRecord>>>;
}

#[derive(Clone)]
pub struct Providers {
	pub embedding: Arc<dyn EmbeddingProvider>,
}
impl Providers {
	pub fn new(embedding: Arc<dyn EmbeddingProvider>) -> Self {
		Self { embedding }
	}
}
impl Default for Providers {
	fn default() -> Self {
		Self { embedding: Arc::new(DefaultProviders) }
	}
}

pub struct RecommendService {
	pub cfg: Config,
	pub source: Arc<dyn VehicleSource>,
	pub index: IndexStore,
	pub providers: Providers,
}
impl RecommendService {
	pub fn new(cfg: Config, db: Db) -> Self {
		Self::with_providers(cfg, Arc::new(db), Providers::default())
	}

	pub fn with_providers(
		cfg: Config,
		source: Arc<dyn VehicleSource>,
		providers: Providers,
	) -> Self {
		let index = IndexStore::from_config(&cfg.storage.index);

		Self { cfg, source, index, providers }
	}

	/// Embeds `texts` in configured batches and checks every vector against the index dimension.
	pub(crate) async fn embed_checked(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
		let cfg = &self.cfg.providers.embedding;
		let expected_dim = self.cfg.storage.index.vector_dim as usize;
		let mut vectors = Vec::with_capacity(texts.len());

		for batch in texts.chunks(cfg.batch_size.max(1) as usize) {
			let embedded = self.providers.embedding.embed(cfg, batch).await?;

			if embedded.len() != batch.len() {
				return Err(Error::Provider {
					message: format!(
						"Embedding provider returned {} vectors for {} inputs.",
						embedded.len(),
						batch.len()
					),
				});
			}
			if let Some(vector) = embedded.iter().find(|vector| vector.len() != expected_dim) {
				return Err(Error::Provider {
					message: format!(
						"Embedding dimension mismatch: expected {expected_dim}, got {}.",
						vector.len()
					),
				});
			}

			vectors.extend(embedded);
		}

		Ok(vectors)
	}
}

struct DefaultProviders;

impl EmbeddingProvider for DefaultProviders {
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, color_eyre::Result<Vec<Vec<f32>>>> {
		Box::pin(embedding::embed(cfg, texts))
	}
}

impl VehicleSource for Db {
	fn fetch_all(&self) -> BoxFuture<'_, color_eyre::Result<Vec<VehicleRecord>>> {
		Box::pin(async move { Ok(vehicles::fetch_all_vehicles(self).await?) })
	}
}

/// Identifies the embedder behind a set of vectors, e.g. `openai:text-embedding-3-small:768`.
pub fn embedding_version(cfg: &Config) -> String {
	format!(
		"{}:{}:{}",
		cfg.providers.embedding.provider_id,
		cfg.providers.embedding.model,
		cfg.storage.index.vector_dim
	)
}
