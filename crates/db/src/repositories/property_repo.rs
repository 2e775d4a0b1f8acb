//! Repository for the `property` table.
//!
//! List queries are compiled from a [`PropertyQuery`] into one WHERE/ORDER
//! plan shared by the page query and its count, so both always describe the
//! same filtered set.

use estate_core::pagination::Paginated;
use estate_core::property::{PropertyFilters, PropertyQuery, SortField, SortSpec};
use estate_core::types::DbId;
use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};

use crate::models::property::{NewProperty, Property};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = r#"id, address, price, bedrooms, bathrooms, "type", deleted_at"#;

/// Bind parameters per row in a multi-row INSERT.
const INSERT_PARAMS_PER_ROW: usize = 5;

/// Rows per INSERT statement when batch inserting; keeps the statement well
/// under Postgres' 65535 bind parameter limit.
const INSERT_CHUNK_ROWS: usize = 1000;

/// Provides CRUD and paged listing for properties.
pub struct PropertyRepo;

impl PropertyRepo {
    /// Insert a new property, returning the created row with its id.
    pub async fn create(pool: &PgPool, input: &NewProperty) -> Result<Property, sqlx::Error> {
        let query = format!(
            r#"INSERT INTO property (address, price, bedrooms, bathrooms, "type")
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"#
        );
        sqlx::query_as::<_, Property>(&query)
            .bind(&input.address)
            .bind(input.price)
            .bind(input.bedrooms)
            .bind(input.bathrooms)
            .bind(&input.property_type)
            .fetch_one(pool)
            .await
    }

    /// Insert many properties on one connection, chunked into multi-row
    /// INSERTs. Returns the number of rows written.
    pub async fn batch_insert(
        conn: &mut PgConnection,
        inputs: &[NewProperty],
    ) -> Result<u64, sqlx::Error> {
        let mut inserted = 0;

        for chunk in inputs.chunks(INSERT_CHUNK_ROWS) {
            let mut query =
                String::from(r#"INSERT INTO property (address, price, bedrooms, bathrooms, "type") VALUES "#);
            let mut param_idx = 1usize;

            for row in 0..chunk.len() {
                if row > 0 {
                    query.push_str(", ");
                }
                query.push('(');
                for i in 0..INSERT_PARAMS_PER_ROW {
                    if i > 0 {
                        query.push_str(", ");
                    }
                    query.push_str(&format!("${param_idx}"));
                    param_idx += 1;
                }
                query.push(')');
            }

            let mut q = sqlx::query(&query);
            for input in chunk {
                q = q
                    .bind(&input.address)
                    .bind(input.price)
                    .bind(input.bedrooms)
                    .bind(input.bathrooms)
                    .bind(&input.property_type);
            }
            inserted += q.execute(&mut *conn).await?.rows_affected();
        }

        Ok(inserted)
    }

    /// Find a property by id. Excludes soft-deleted rows.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Property>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM property WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, Property>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a property by id, including soft-deleted rows.
    pub async fn find_by_id_include_deleted(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<Property>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM property WHERE id = $1");
        sqlx::query_as::<_, Property>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Persist every mutable column of `property` in one write.
    ///
    /// Returns `None` if the row no longer exists or has been soft-deleted.
    pub async fn save(pool: &PgPool, property: &Property) -> Result<Option<Property>, sqlx::Error> {
        let query = format!(
            r#"UPDATE property SET
                address = $2,
                price = $3,
                bedrooms = $4,
                bathrooms = $5,
                "type" = $6
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"#
        );
        sqlx::query_as::<_, Property>(&query)
            .bind(property.id)
            .bind(&property.address)
            .bind(property.price)
            .bind(property.bedrooms)
            .bind(property.bathrooms)
            .bind(&property.property_type)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete a property, returning the row with `deleted_at` set.
    ///
    /// Returns `None` if the row does not exist or was already deleted.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<Option<Property>, sqlx::Error> {
        let query = format!(
            "UPDATE property SET deleted_at = NOW() \
             WHERE id = $1 AND deleted_at IS NULL \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Property>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Count every row, soft-deleted ones included.
    pub async fn count_all(conn: &mut PgConnection) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*)::BIGINT FROM property")
            .fetch_one(conn)
            .await
    }

    /// Fetch one page of active properties matching `query`, plus the total
    /// number of matches.
    ///
    /// The page and the count run in a single read-only `REPEATABLE READ`
    /// transaction so they observe the same snapshot.
    pub async fn find_page(
        pool: &PgPool,
        query: &PropertyQuery,
    ) -> Result<Paginated<Property>, sqlx::Error> {
        let (where_clause, bind_values, bind_idx) = build_property_filter(&query.filters);
        let order_clause = build_order_clause(query.sort);
        let pagination = query.pagination;

        let select = format!(
            "SELECT {COLUMNS} FROM property {where_clause} {order_clause} \
             LIMIT ${bind_idx} OFFSET ${}",
            bind_idx + 1
        );
        let count = format!("SELECT COUNT(*)::BIGINT FROM property {where_clause}");

        tracing::debug!(sql = %select, binds = bind_values.len(), "Property page query");

        let mut tx = pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ READ ONLY")
            .execute(&mut *tx)
            .await?;

        let items = bind_property_values(sqlx::query_as::<_, Property>(&select), &bind_values)
            .bind(pagination.limit())
            .bind(pagination.offset())
            .fetch_all(&mut *tx)
            .await?;
        let total_items =
            bind_property_values_scalar(sqlx::query_scalar::<_, i64>(&count), &bind_values)
                .fetch_one(&mut *tx)
                .await?;

        tx.commit().await?;

        Ok(Paginated::new(items, total_items, pagination))
    }
}

// ---------------------------------------------------------------------------
// Query composition
// ---------------------------------------------------------------------------

/// Typed bind value for dynamically-built property queries.
#[derive(Debug, Clone, PartialEq)]
enum BindValue {
    Text(String),
    Numeric(Decimal),
    SmallInt(i16),
}

/// Build a WHERE clause and bind values from `PropertyFilters`.
///
/// Returns `(where_clause, bind_values, next_bind_index)`. The clause always
/// restricts to active rows, so it is never empty.
fn build_property_filter(filters: &PropertyFilters) -> (String, Vec<BindValue>, u32) {
    let mut conditions: Vec<String> = vec!["deleted_at IS NULL".to_string()];
    let mut bind_idx = 1u32;
    let mut bind_values: Vec<BindValue> = Vec::new();

    if let Some(ref address) = filters.address {
        conditions.push(format!("address LIKE ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Text(contains_pattern(address)));
    }

    if let Some(price) = filters.price {
        conditions.push(format!("price = ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Numeric(price));
    }

    if let Some(bedrooms) = filters.bedrooms {
        conditions.push(format!("bedrooms = ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::SmallInt(bedrooms));
    }

    if let Some(bathrooms) = filters.bathrooms {
        conditions.push(format!("bathrooms = ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::SmallInt(bathrooms));
    }

    if let Some(ref property_type) = filters.property_type {
        conditions.push(format!(r#""type" = ${bind_idx}"#));
        bind_idx += 1;
        bind_values.push(BindValue::Text(property_type.clone()));
    }

    let where_clause = format!("WHERE {}", conditions.join(" AND "));

    (where_clause, bind_values, bind_idx)
}

/// Build the ORDER BY clause. Nulls sort last in both directions; `id`
/// breaks ties so pages are stable.
fn build_order_clause(sort: Option<SortSpec>) -> String {
    match sort {
        Some(SortSpec {
            field: SortField::Id,
            direction,
        }) => format!("ORDER BY id {}", direction.as_sql()),
        Some(SortSpec { field, direction }) => format!(
            "ORDER BY {} {} NULLS LAST, id ASC",
            field.column(),
            direction.as_sql()
        ),
        None => "ORDER BY id ASC".to_string(),
    }
}

/// Wrap `value` in `%...%` for a literal substring LIKE match, escaping the
/// LIKE metacharacters it contains.
fn contains_pattern(value: &str) -> String {
    let mut pattern = String::with_capacity(value.len() + 2);
    pattern.push('%');
    for c in value.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Bind a slice of `BindValue` to a sqlx `QueryAs`.
fn bind_property_values<'q, O>(
    mut q: sqlx::query::QueryAs<'q, sqlx::Postgres, O, sqlx::postgres::PgArguments>,
    bind_values: &'q [BindValue],
) -> sqlx::query::QueryAs<'q, sqlx::Postgres, O, sqlx::postgres::PgArguments> {
    for val in bind_values {
        match val {
            BindValue::Text(v) => q = q.bind(v.as_str()),
            BindValue::Numeric(v) => q = q.bind(*v),
            BindValue::SmallInt(v) => q = q.bind(*v),
        }
    }
    q
}

/// Bind a slice of `BindValue` to a sqlx `QueryScalar`.
fn bind_property_values_scalar<'q>(
    mut q: sqlx::query::QueryScalar<'q, sqlx::Postgres, i64, sqlx::postgres::PgArguments>,
    bind_values: &'q [BindValue],
) -> sqlx::query::QueryScalar<'q, sqlx::Postgres, i64, sqlx::postgres::PgArguments> {
    for val in bind_values {
        match val {
            BindValue::Text(v) => q = q.bind(v.as_str()),
            BindValue::Numeric(v) => q = q.bind(*v),
            BindValue::SmallInt(v) => q = q.bind(*v),
        }
    }
    q
}
