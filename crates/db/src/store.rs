//! Storage capability consumed by the property service.
//!
//! The service only ever talks to a [`PropertyStore`]; [`PgPropertyStore`]
//! is the Postgres adapter and delegates to [`PropertyRepo`].

use async_trait::async_trait;
use estate_core::pagination::Paginated;
use estate_core::property::PropertyQuery;
use estate_core::types::DbId;

use crate::models::property::{NewProperty, Property};
use crate::repositories::PropertyRepo;
use crate::DbPool;

#[async_trait]
pub trait PropertyStore: Send + Sync {
    /// Persist a new property and return it with its assigned id.
    async fn insert(&self, input: &NewProperty) -> Result<Property, sqlx::Error>;

    /// Write all mutable fields of an active property. `None` if the row is
    /// gone or soft-deleted.
    async fn save(&self, property: &Property) -> Result<Option<Property>, sqlx::Error>;

    /// Look up an active property.
    async fn find_by_id(&self, id: DbId) -> Result<Option<Property>, sqlx::Error>;

    /// One filtered, sorted page of active properties.
    async fn find_page(&self, query: &PropertyQuery) -> Result<Paginated<Property>, sqlx::Error>;

    /// Stamp `deleted_at` on an active property. `None` if it was already
    /// deleted.
    async fn soft_delete(&self, property: &Property) -> Result<Option<Property>, sqlx::Error>;
}

/// [`PropertyStore`] backed by the `property` table.
#[derive(Debug, Clone)]
pub struct PgPropertyStore {
    pool: DbPool,
}

impl PgPropertyStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PropertyStore for PgPropertyStore {
    async fn insert(&self, input: &NewProperty) -> Result<Property, sqlx::Error> {
        PropertyRepo::create(&self.pool, input).await
    }

    async fn save(&self, property: &Property) -> Result<Option<Property>, sqlx::Error> {
        PropertyRepo::save(&self.pool, property).await
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<Property>, sqlx::Error> {
        PropertyRepo::find_by_id(&self.pool, id).await
    }

    async fn find_page(&self, query: &PropertyQuery) -> Result<Paginated<Property>, sqlx::Error> {
        PropertyRepo::find_page(&self.pool, query).await
    }

    async fn soft_delete(&self, property: &Property) -> Result<Option<Property>, sqlx::Error> {
        PropertyRepo::soft_delete(&self.pool, property.id).await
    }
}
