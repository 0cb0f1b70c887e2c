use crate::auth::repo::{PgUserRepo, UserRepo};
use crate::calculations::repo::{CalculationRepo, PgCalculationRepo};
use crate::config::AppConfig;
use crate::memory::MemoryStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub users: Arc<dyn UserRepo>,
    pub calculations: Arc<dyn CalculationRepo>,
}

impl AppState {
    /// Connects to PostgreSQL, applies migrations and wires the SQL repositories.
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);
        let db = crate::db::connect(&config.database_url).await?;
        crate::db::migrate(&db).await?;

        Ok(Self::from_parts(
            config,
            Arc::new(PgUserRepo::new(db.clone())),
            Arc::new(PgCalculationRepo::new(db)),
        ))
    }

    pub fn from_parts(
        config: Arc<AppConfig>,
        users: Arc<dyn UserRepo>,
        calculations: Arc<dyn CalculationRepo>,
    ) -> Self {
        Self {
            config,
            users,
            calculations,
        }
    }

    /// State over a fresh in-memory store with test configuration.
    pub fn fake() -> Self {
        Self::with_store(Arc::new(MemoryStore::new()))
    }

    /// Like [`AppState::fake`], sharing `store` so callers can inspect or seed it.
    pub fn with_store(store: Arc<MemoryStore>) -> Self {
        Self::from_parts(
            Arc::new(AppConfig::test_default()),
            store.clone(),
            store,
        )
    }
}
