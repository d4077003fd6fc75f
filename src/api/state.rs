//! Application state shared by every handler.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::infra::DatabaseHelper;
use crate::services::{ItemManager, ItemService};

/// Application state containing the services (DI container).
#[derive(Clone)]
pub struct AppState {
    /// Item service
    pub item_service: Arc<dyn ItemService>,
    /// Database pool, used by the health check
    pub database: DatabaseHelper,
    /// Server and documentation settings
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Wire the database-backed services.
    pub fn from_database(database: DatabaseHelper, config: AppConfig) -> Self {
        let item_service = Arc::new(ItemManager::new(database.clone()));
        Self::new(item_service, database, config)
    }

    /// Create state with manually injected services.
    pub fn new(
        item_service: Arc<dyn ItemService>,
        database: DatabaseHelper,
        config: AppConfig,
    ) -> Self {
        Self {
            item_service,
            database,
            config: Arc::new(config),
        }
    }
}
