//! Property business operations.
//!
//! [`PropertyService`] sits between the handlers and storage: it turns
//! "no such active row" into [`CoreError::NotFound`], applies partial
//! updates by merging over the stored entity, and logs every mutation.

use std::sync::Arc;

use estate_core::error::CoreError;
use estate_core::pagination::Paginated;
use estate_core::property::{PropertyQuery, ENTITY};
use estate_core::types::DbId;
use estate_db::models::property::{NewProperty, Property, PropertyChanges};
use estate_db::store::PropertyStore;

use crate::error::{AppError, AppResult};

#[derive(Clone)]
pub struct PropertyService {
    store: Arc<dyn PropertyStore>,
}

impl PropertyService {
    pub fn new(store: Arc<dyn PropertyStore>) -> Self {
        Self { store }
    }

    /// Persist a new property. The stored entity carries its assigned id and
    /// a null `deleted_at`.
    pub async fn create(&self, input: NewProperty) -> AppResult<Property> {
        let property = self.store.insert(&input).await?;
        tracing::info!(property_id = property.id, "Property created");
        Ok(property)
    }

    /// One filtered, sorted page of active properties.
    pub async fn find_all(&self, query: &PropertyQuery) -> AppResult<Paginated<Property>> {
        Ok(self.store.find_page(query).await?)
    }

    /// Look up an active property. Soft-deleted rows are not found.
    pub async fn find_one(&self, id: DbId) -> AppResult<Property> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found(id))
    }

    /// Merge `changes` over the stored property and persist the result.
    pub async fn update(&self, id: DbId, changes: PropertyChanges) -> AppResult<Property> {
        let merged = self.find_one(id).await?.merge(changes);
        // The row can be soft-deleted between the read and the write.
        let saved = self.store.save(&merged).await?.ok_or_else(|| not_found(id))?;
        tracing::info!(property_id = id, "Property updated");
        Ok(saved)
    }

    /// Soft-delete an active property and return it with `deleted_at` set.
    pub async fn remove(&self, id: DbId) -> AppResult<Property> {
        let property = self.find_one(id).await?;
        let removed = self
            .store
            .soft_delete(&property)
            .await?
            .ok_or_else(|| not_found(id))?;
        tracing::info!(property_id = id, "Property removed");
        Ok(removed)
    }
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: ENTITY, id })
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use assert_matches::assert_matches;
    use async_trait::async_trait;
    use chrono::Utc;
    use estate_core::pagination::PaginationOptions;
    use estate_core::property::{PropertyFilters, SortDirection, SortField, SortSpec};
    use rust_decimal::Decimal;

    use super::*;

    /// In-memory store keeping every row, deleted or not.
    ///
    /// `find_page` only hides deleted rows and pages; filtering and sorting
    /// belong to the SQL composer and are covered by the repository tests.
    /// The last query received is recorded instead.
    #[derive(Default)]
    struct MemoryStore {
        rows: Mutex<Vec<Property>>,
        last_query: Mutex<Option<PropertyQuery>>,
    }

    impl MemoryStore {
        fn row(&self, id: DbId) -> Option<Property> {
            self.rows.lock().unwrap().iter().find(|p| p.id == id).cloned()
        }
    }

    #[async_trait]
    impl PropertyStore for MemoryStore {
        async fn insert(&self, input: &NewProperty) -> Result<Property, sqlx::Error> {
            let mut rows = self.rows.lock().unwrap();
            let property = Property {
                id: rows.len() as DbId + 1,
                address: input.address.clone(),
                price: input.price,
                bedrooms: input.bedrooms,
                bathrooms: input.bathrooms,
                property_type: input.property_type.clone(),
                deleted_at: None,
            };
            rows.push(property.clone());
            Ok(property)
        }

        async fn save(&self, property: &Property) -> Result<Option<Property>, sqlx::Error> {
            let mut rows = self.rows.lock().unwrap();
            let slot = rows
                .iter_mut()
                .find(|p| p.id == property.id && p.deleted_at.is_none());
            Ok(slot.map(|slot| {
                *slot = property.clone();
                slot.clone()
            }))
        }

        async fn find_by_id(&self, id: DbId) -> Result<Option<Property>, sqlx::Error> {
            Ok(self.row(id).filter(|p| p.deleted_at.is_none()))
        }

        async fn find_page(&self, query: &PropertyQuery) -> Result<Paginated<Property>, sqlx::Error> {
            *self.last_query.lock().unwrap() = Some(query.clone());
            let active: Vec<Property> = self
                .rows
                .lock()
                .unwrap()
                .iter()
                .filter(|p| p.deleted_at.is_none())
                .cloned()
                .collect();
            let total = active.len() as i64;
            let items = active
                .into_iter()
                .skip(query.pagination.offset() as usize)
                .take(query.pagination.limit() as usize)
                .collect();
            Ok(Paginated::new(items, total, query.pagination))
        }

        async fn soft_delete(&self, property: &Property) -> Result<Option<Property>, sqlx::Error> {
            let mut rows = self.rows.lock().unwrap();
            let slot = rows
                .iter_mut()
                .find(|p| p.id == property.id && p.deleted_at.is_none());
            Ok(slot.map(|slot| {
                slot.deleted_at = Some(Utc::now());
                slot.clone()
            }))
        }
    }

    fn service() -> (PropertyService, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::default());
        (PropertyService::new(store.clone()), store)
    }

    fn input(address: &str) -> NewProperty {
        NewProperty {
            address: address.to_string(),
            price: Decimal::from(9_199_166),
            bedrooms: 4,
            bathrooms: 2,
            property_type: Some("Townhouse".to_string()),
        }
    }

    #[tokio::test]
    async fn create_then_find_one() {
        let (service, _) = service();
        let created = service.create(input("1 Main St")).await.unwrap();
        assert_eq!(created.deleted_at, None);

        let found = service.find_one(created.id).await.unwrap();
        assert_eq!(found, created);
    }

    #[tokio::test]
    async fn find_one_unknown_id_is_not_found() {
        let (service, _) = service();
        let err = service.find_one(42).await.unwrap_err();
        assert_matches!(
            err,
            AppError::Core(CoreError::NotFound { entity: "Property", id: 42 })
        );
    }

    #[tokio::test]
    async fn update_merges_only_given_fields() {
        let (service, _) = service();
        let created = service.create(input("1 Main St")).await.unwrap();

        let updated = service
            .update(
                created.id,
                PropertyChanges {
                    price: Some(Decimal::from(150)),
                    property_type: Some(None),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.address, "1 Main St");
        assert_eq!(updated.price, Decimal::from(150));
        assert_eq!(updated.bedrooms, 4);
        assert_eq!(updated.property_type, None);
    }

    #[tokio::test]
    async fn update_unknown_id_is_not_found() {
        let (service, _) = service();
        let err = service.update(7, PropertyChanges::default()).await.unwrap_err();
        assert_matches!(err, AppError::Core(CoreError::NotFound { id: 7, .. }));
    }

    #[tokio::test]
    async fn remove_stamps_deleted_at_and_hides_the_row() {
        let (service, store) = service();
        let created = service.create(input("1 Main St")).await.unwrap();

        let removed = service.remove(created.id).await.unwrap();
        assert!(removed.deleted_at.is_some());

        // The row is kept, only hidden.
        assert!(store.row(created.id).is_some());
        assert_matches!(
            service.find_one(created.id).await,
            Err(AppError::Core(CoreError::NotFound { .. }))
        );
        assert_matches!(
            service.remove(created.id).await,
            Err(AppError::Core(CoreError::NotFound { .. }))
        );
        assert_matches!(
            service.update(created.id, PropertyChanges::default()).await,
            Err(AppError::Core(CoreError::NotFound { .. }))
        );
    }

    #[tokio::test]
    async fn find_all_skips_removed_rows() {
        let (service, _) = service();
        let first = service.create(input("1 Main St")).await.unwrap();
        service.create(input("2 Main St")).await.unwrap();
        service.remove(first.id).await.unwrap();

        let query = PropertyQuery {
            pagination: PaginationOptions::new(Some(1), Some(10)).unwrap(),
            ..Default::default()
        };
        let page = service.find_all(&query).await.unwrap();
        assert_eq!(page.meta.total_items, 1);
        assert_eq!(page.items[0].address, "2 Main St");
    }

    #[tokio::test]
    async fn find_all_passes_the_query_through_unchanged() {
        let (service, store) = service();
        let query = PropertyQuery {
            filters: PropertyFilters {
                address: Some(" Hollow".to_string()),
                bedrooms: Some(0),
                ..Default::default()
            },
            sort: Some(SortSpec {
                field: SortField::Type,
                direction: SortDirection::Desc,
            }),
            pagination: PaginationOptions::new(Some(3), Some(25)).unwrap(),
        };

        let page = service.find_all(&query).await.unwrap();

        assert_eq!(store.last_query.lock().unwrap().as_ref(), Some(&query));
        assert_eq!(page.meta.current_page, 3);
        assert_eq!(page.meta.items_per_page, 25);
    }
}
