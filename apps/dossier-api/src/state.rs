use std::sync::Arc;

use dossier_config::Config;
use dossier_service::DossierService;
use dossier_storage::db::Db;

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<DossierService>,
}
impl AppState {
	pub async fn new(config: Config) -> color_eyre::Result<Self> {
		let db = Db::connect(&config.storage.postgres).await?;

		db.ensure_schema().await?;

		Ok(Self::from_service(DossierService::new(config, db)))
	}

	pub fn from_service(service: DossierService) -> Self {
		Self { service: Arc::new(service) }
	}
}
