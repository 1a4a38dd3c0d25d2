use sqlx::SqlitePool;

use crate::live::LiveRegistry;

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub live: LiveRegistry,
}

impl AppState {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            live: LiveRegistry::new(),
        }
    }
}
