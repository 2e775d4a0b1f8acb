//! Startup seeding of the `property` table from a JSON file.
//!
//! The file holds an array of objects shaped like a create request. Seeding
//! only happens into an empty table, so restarting the server never
//! duplicates rows.

use std::path::Path;

use estate_core::validation::ValidationErrors;

use crate::models::property::{CreatePropertyRequest, NewProperty};
use crate::repositories::PropertyRepo;
use crate::DbPool;

#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("Failed to read seed file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Seed file is not a JSON array of properties: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Seed record {index} is invalid: {errors}")]
    InvalidRecord {
        index: usize,
        errors: ValidationErrors,
    },

    #[error("Database error while seeding: {0}")]
    Database(#[from] sqlx::Error),
}

/// Parse and validate seed records. Fails on the first invalid record.
pub fn parse_seed(raw: &[u8]) -> Result<Vec<NewProperty>, SeedError> {
    let records: Vec<CreatePropertyRequest> = serde_json::from_slice(raw)?;
    records
        .into_iter()
        .enumerate()
        .map(|(index, record)| {
            record
                .validate()
                .map_err(|errors| SeedError::InvalidRecord { index, errors })
        })
        .collect()
}

/// Load `path` and insert its records if the table is empty.
///
/// Returns the number of rows inserted (zero when the table already held
/// data).
pub async fn seed_from_file(pool: &DbPool, path: &Path) -> Result<u64, SeedError> {
    let raw = tokio::fs::read(path).await?;
    let records = parse_seed(&raw)?;
    seed(pool, &records).await
}

/// Insert `records` in one transaction if the table holds no rows at all.
pub async fn seed(pool: &DbPool, records: &[NewProperty]) -> Result<u64, SeedError> {
    let mut tx = pool.begin().await?;

    let existing = PropertyRepo::count_all(&mut *tx).await?;
    if existing > 0 {
        tracing::info!(existing, "Property table already populated, skipping seed");
        return Ok(0);
    }

    let inserted = PropertyRepo::batch_insert(&mut *tx, records).await?;
    tx.commit().await?;

    tracing::info!(inserted, "Seeded property table");
    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn parses_valid_records() {
        let raw = br#"[
            {"address": "1 Main St", "price": 100000, "bedrooms": 2, "bathrooms": 1, "type": "Condo"},
            {"address": "2 Main St", "price": 250000.5, "bedrooms": 3, "bathrooms": 2, "type": null}
        ]"#;
        let records = parse_seed(raw).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].property_type, None);
    }

    #[test]
    fn reports_index_of_invalid_record() {
        let raw = br#"[
            {"address": "1 Main St", "price": 1, "bedrooms": 2, "bathrooms": 1},
            {"address": "", "price": 1, "bedrooms": 2, "bathrooms": 1}
        ]"#;
        assert_matches!(parse_seed(raw), Err(SeedError::InvalidRecord { index: 1, .. }));
    }

    #[test]
    fn rejects_non_array_input() {
        assert_matches!(parse_seed(br#"{"address": "x"}"#), Err(SeedError::Parse(_)));
    }

    #[test]
    fn bundled_seed_file_is_valid() {
        let records = parse_seed(include_bytes!("../../../db/seed/properties.json")).unwrap();
        assert_eq!(records.len(), 4);
        assert!(records.iter().any(|r| r.bedrooms == 0));
    }
}
