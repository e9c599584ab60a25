use serde::{Deserialize, Serialize};

use crate::{Error, RecommendService, Result};
use carrec_domain::VehicleRecord;
use carrec_storage::index::{IndexEntry, VectorIndex};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildReport {
	pub total_vehicles: usize,
	pub index_location: String,
}

impl RecommendService {
	/// Encodes the catalog, embeds it, and replaces the persisted index.
	///
	/// `records` bypasses the vehicle source when given. Nothing is written unless every record was
	/// embedded.
	pub async fn build_index(&self, records: Option<Vec<VehicleRecord>>) -> Result<BuildReport> {
		let records = match records {
			Some(records) => records,
			None => self
				.source
				.fetch_all()
				.await
				.map_err(|err| Error::DataSourceUnavailable { message: err.to_string() })?,
		};

		tracing::info!(total_vehicles = records.len(), "Building vector index.");

		let corpus = carrec_domain::build_corpus(records);
		let texts = corpus.iter().map(|entry| entry.text.clone()).collect::<Vec<_>>();
		let vectors = self.embed_checked(&texts).await?;
		let mut items = Vec::with_capacity(corpus.len());

		for (entry, vector) in corpus.into_iter().zip(vectors) {
			let metadata = serde_json::to_value(&entry.metadata)
				.map_err(|err| Error::Storage { message: err.to_string() })?;

			items.push((IndexEntry { text: entry.text, metadata }, vector));
		}

		let index = VectorIndex::build(
			crate::embedding_version(&self.cfg),
			self.cfg.storage.index.vector_dim,
			items,
		)
		.map_err(|err| match err {
			carrec_storage::Error::DimensionMismatch { .. } =>
				Error::Provider { message: err.to_string() },
			err => Error::Storage { message: err.to_string() },
		})?;
		let manifest = self
			.index
			.persist(&index)
			.await
			.map_err(|err| Error::Storage { message: err.to_string() })?;
		let report = BuildReport {
			total_vehicles: manifest.count,
			index_location: self.index.location().display().to_string(),
		};

		tracing::info!(
			total_vehicles = report.total_vehicles,
			index_location = %report.index_location,
			"Vector index built."
		);

		Ok(report)
	}
}
