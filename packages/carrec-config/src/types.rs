use std::path::PathBuf;

use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	pub providers: Providers,
	#[serde(default)]
	pub recommend: Recommend,
	#[serde(default)]
	pub security: Security,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub log_level: String,
	/// Adds a permissive CORS layer to the HTTP router.
	#[serde(default = "default_true")]
	pub cors_allow_any: bool,
}

#[derive(Debug, Deserialize)]
pub struct Storage {
	pub postgres: Postgres,
	pub index: Index,
}

#[derive(Debug, Deserialize)]
pub struct Postgres {
	pub dsn: String,
	pub pool_max_conns: u32,
}

#[derive(Debug, Deserialize)]
pub struct Index {
	/// Directory holding the persisted index blob and its manifest.
	pub path: PathBuf,
	pub vector_dim: u32,
}

#[derive(Debug, Deserialize)]
pub struct Providers {
	pub embedding: EmbeddingProviderConfig,
}

#[derive(Debug, Deserialize)]
pub struct EmbeddingProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub model: String,
	pub dimensions: u32,
	pub timeout_ms: u64,
	#[serde(default = "default_batch_size")]
	pub batch_size: u32,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Recommend {
	/// Number of nearest neighbors fetched before filtering and re-ranking.
	pub candidate_k: u32,
	pub limit: u32,
}
impl Default for Recommend {
	fn default() -> Self {
		Self { candidate_k: 15, limit: 6 }
	}
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Security {
	pub bind_localhost_only: bool,
	/// Required in the `X-API-Key` header of the recommendation and build routes when set.
	pub api_key: Option<String>,
}

fn default_true() -> bool {
	true
}

fn default_batch_size() -> u32 {
	64
}
