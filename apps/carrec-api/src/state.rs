use std::sync::Arc;

use carrec_service::RecommendService;
use carrec_storage::db::Db;

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<RecommendService>,
}
impl AppState {
	/// The catalog pool connects lazily; an unreachable database only fails index builds.
	pub fn new(config: carrec_config::Config) -> color_eyre::Result<Self> {
		let db = Db::connect_lazy(&config.storage.postgres)?;

		Ok(Self::from_service(RecommendService::new(config, db)))
	}

	pub fn from_service(service: RecommendService) -> Self {
		Self { service: Arc::new(service) }
	}
}
