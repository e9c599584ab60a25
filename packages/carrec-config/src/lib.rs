mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	Config, EmbeddingProviderConfig, Index, Postgres, Providers, Recommend, Security, Service,
	Storage,
};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	parse(&raw).map_err(|err| match err {
		Error::ParseConfig { source, .. } => Error::ParseConfig { path: path.to_path_buf(), source },
		other => other,
	})
}

/// Parses, normalizes, and validates a config held in memory.
pub fn parse(raw: &str) -> Result<Config> {
	let mut cfg: Config = toml::from_str(raw)
		.map_err(|err| Error::ParseConfig { path: Default::default(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::invalid("service.http_bind", "must be non-empty."));
	}
	if cfg.storage.postgres.dsn.trim().is_empty() {
		return Err(Error::invalid("storage.postgres.dsn", "must be non-empty."));
	}
	if cfg.storage.postgres.pool_max_conns == 0 {
		return Err(Error::invalid("storage.postgres.pool_max_conns", "must be greater than zero."));
	}
	if cfg.storage.index.path.as_os_str().is_empty() {
		return Err(Error::invalid("storage.index.path", "must be non-empty."));
	}

	let embedding = &cfg.providers.embedding;

	if embedding.dimensions == 0 {
		return Err(Error::invalid(
			"providers.embedding.dimensions",
			"must be greater than zero.",
		));
	}
	if embedding.dimensions != cfg.storage.index.vector_dim {
		return Err(Error::invalid(
			"providers.embedding.dimensions",
			"must match storage.index.vector_dim.",
		));
	}
	if embedding.batch_size == 0 {
		return Err(Error::invalid(
			"providers.embedding.batch_size",
			"must be greater than zero.",
		));
	}
	if embedding.api_key.trim().is_empty() {
		return Err(Error::invalid("providers.embedding.api_key", "must be non-empty."));
	}

	for (key, value) in [
		("providers.embedding.provider_id", &embedding.provider_id),
		("providers.embedding.api_base", &embedding.api_base),
		("providers.embedding.model", &embedding.model),
	] {
		if value.trim().is_empty() {
			return Err(Error::invalid(key, "must be non-empty."));
		}
	}

	if cfg.recommend.limit == 0 {
		return Err(Error::invalid("recommend.limit", "must be greater than zero."));
	}
	if cfg.recommend.candidate_k < cfg.recommend.limit {
		return Err(Error::invalid(
			"recommend.candidate_k",
			"must be greater than or equal to recommend.limit.",
		));
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	if cfg.security.api_key.as_deref().map(|key| key.trim().is_empty()).unwrap_or(false) {
		cfg.security.api_key = None;
	}
}
