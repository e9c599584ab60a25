use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::{Error, RecommendService, Result};
use carrec_domain::RecommendationRequest;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RecommendResponse {
	pub trace_id: Uuid,
	pub query: String,
	/// Metadata of the chosen vehicles, best first.
	pub recommendations: Vec<Value>,
}

impl RecommendService {
	pub async fn recommend(
		&self,
		request: &RecommendationRequest,
		limit: usize,
	) -> Result<RecommendResponse> {
		if limit == 0 {
			return Err(Error::InvalidRequest { message: "limit must be greater than zero.".into() });
		}

		let trace_id = Uuid::new_v4();
		let query = carrec_domain::synthesize(
			request.preferences.as_ref(),
			request.activities.as_deref(),
			request.saved_vehicles.as_deref(),
		);

		tracing::debug!(%trace_id, query = %query, "Synthesized recommendation query.");

		let index = self.index.load().await.map_err(Error::index_unavailable)?;
		let expected_version = crate::embedding_version(&self.cfg);

		if index.embedding_version() != expected_version {
			return Err(Error::index_unavailable(format!(
				"index was built with {}, expected {expected_version}; rebuild it.",
				index.embedding_version()
			)));
		}

		let vector = self
			.embed_checked(std::slice::from_ref(&query))
			.await?
			.pop()
			.ok_or_else(|| Error::Provider { message: "No query embedding returned.".into() })?;
		let candidate_k = self.cfg.recommend.candidate_k as usize;
		let candidates = index
			.search(&vector, candidate_k)
			.map_err(Error::index_unavailable)?
			.into_iter()
			.map(|hit| hit.entry.metadata.clone())
			.collect::<Vec<_>>();
		let candidate_count = candidates.len();
		let recommendations =
			carrec_domain::rank(candidates, request.preferences.as_ref(), limit);

		tracing::info!(
			%trace_id,
			candidate_count,
			returned = recommendations.len(),
			"Recommendations ranked."
		);

		Ok(RecommendResponse { trace_id, query, recommendations })
	}
}
