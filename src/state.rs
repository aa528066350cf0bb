use std::sync::Arc;

use sqlx::SqlitePool;

use crate::config::AppConfig;
use crate::db;
use crate::jobs::client::{JobSource, RemotiveClient};
use crate::storage::{LocalStorage, StorageClient};

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub config: Arc<AppConfig>,
    pub storage: Arc<dyn StorageClient>,
    pub jobs: Arc<dyn JobSource>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let db = db::create_pool(&config.database_url).await?;
        db::migrate(&db).await?;

        let storage = Arc::new(LocalStorage::new(config.upload_root.clone())) as Arc<dyn StorageClient>;
        let jobs = Arc::new(RemotiveClient::new(&config.jobs_api)?) as Arc<dyn JobSource>;

        Ok(Self {
            db,
            config,
            storage,
            jobs,
        })
    }

    pub fn from_parts(
        db: SqlitePool,
        config: Arc<AppConfig>,
        storage: Arc<dyn StorageClient>,
        jobs: Arc<dyn JobSource>,
    ) -> Self {
        Self {
            db,
            config,
            storage,
            jobs,
        }
    }
}
