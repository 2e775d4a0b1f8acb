use std::sync::Arc;

use crate::service::PropertyService;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheap to clone: the pool and the service are reference-counted inside.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool, used directly by the health check.
    pub pool: estate_db::DbPool,
    /// Property operations over the Postgres store.
    pub properties: PropertyService,
}

impl AppState {
    /// Wire the Postgres-backed property store onto `pool`.
    pub fn new(pool: estate_db::DbPool) -> Self {
        let store = Arc::new(estate_db::store::PgPropertyStore::new(pool.clone()));
        Self {
            pool,
            properties: PropertyService::new(store),
        }
    }
}
