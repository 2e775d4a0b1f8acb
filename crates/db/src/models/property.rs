//! Property entity model and DTOs.

use estate_core::types::{DbId, Timestamp};
use estate_core::validation::ValidationErrors;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;

/// A row from the `property` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub id: DbId,
    pub address: String,
    pub price: Decimal,
    pub bedrooms: i16,
    pub bathrooms: i16,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub property_type: Option<String>,
    /// `None` while the property is active.
    pub deleted_at: Option<Timestamp>,
}

impl Property {
    /// Overwrite the fields present in `changes`. `id` and `deleted_at`
    /// are never touched.
    pub fn merge(mut self, changes: PropertyChanges) -> Self {
        if let Some(address) = changes.address {
            self.address = address;
        }
        if let Some(price) = changes.price {
            self.price = price;
        }
        if let Some(bedrooms) = changes.bedrooms {
            self.bedrooms = bedrooms;
        }
        if let Some(bathrooms) = changes.bathrooms {
            self.bathrooms = bathrooms;
        }
        if let Some(property_type) = changes.property_type {
            self.property_type = property_type;
        }
        self
    }
}

/// Validated input for inserting a property. The id is assigned by storage.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProperty {
    pub address: String,
    pub price: Decimal,
    pub bedrooms: i16,
    pub bathrooms: i16,
    pub property_type: Option<String>,
}

/// Validated partial update. `property_type: Some(None)` clears the type.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyChanges {
    pub address: Option<String>,
    pub price: Option<Decimal>,
    pub bedrooms: Option<i16>,
    pub bathrooms: Option<i16>,
    pub property_type: Option<Option<String>>,
}

// ---------------------------------------------------------------------------
// Request bodies
// ---------------------------------------------------------------------------

/// Body of `POST /properties`.
///
/// Every field is optional at the serde level so that missing values are
/// reported as field errors by [`CreatePropertyRequest::validate`] rather
/// than as an opaque deserialization failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreatePropertyRequest {
    pub address: Option<String>,
    pub price: Option<Decimal>,
    pub bedrooms: Option<i64>,
    pub bathrooms: Option<i64>,
    #[serde(rename = "type")]
    pub property_type: Option<String>,
}

impl CreatePropertyRequest {
    pub fn validate(self) -> Result<NewProperty, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let address = match self.address {
            Some(address) => check_address(address, &mut errors),
            None => {
                errors.add("address", "is required");
                None
            }
        };
        let price = match self.price {
            Some(price) => check_price(price, &mut errors),
            None => {
                errors.add("price", "is required");
                None
            }
        };
        let bedrooms = required_room_count(self.bedrooms, "bedrooms", &mut errors);
        let bathrooms = required_room_count(self.bathrooms, "bathrooms", &mut errors);

        match (address, price, bedrooms, bathrooms) {
            (Some(address), Some(price), Some(bedrooms), Some(bathrooms)) if errors.is_empty() => {
                Ok(NewProperty {
                    address,
                    price,
                    bedrooms,
                    bathrooms,
                    property_type: self.property_type,
                })
            }
            _ => Err(errors),
        }
    }
}

/// Body of `PATCH /properties/{id}`.
///
/// The outer `Option` records whether a field was sent at all; the inner one
/// whether it was sent as `null`. Unknown keys (including `id` and
/// `deletedAt`) are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatePropertyRequest {
    #[serde(default, deserialize_with = "present")]
    pub address: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub price: Option<Option<Decimal>>,
    #[serde(default, deserialize_with = "present")]
    pub bedrooms: Option<Option<i64>>,
    #[serde(default, deserialize_with = "present")]
    pub bathrooms: Option<Option<i64>>,
    #[serde(default, rename = "type", deserialize_with = "present")]
    pub property_type: Option<Option<String>>,
}

impl UpdatePropertyRequest {
    pub fn validate(self) -> Result<PropertyChanges, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let address = not_null(self.address, "address", &mut errors)
            .and_then(|address| check_address(address, &mut errors));
        let price = not_null(self.price, "price", &mut errors)
            .and_then(|price| check_price(price, &mut errors));
        let bedrooms = not_null(self.bedrooms, "bedrooms", &mut errors)
            .and_then(|count| check_room_count(count, "bedrooms", &mut errors));
        let bathrooms = not_null(self.bathrooms, "bathrooms", &mut errors)
            .and_then(|count| check_room_count(count, "bathrooms", &mut errors));

        errors.into_result(PropertyChanges {
            address,
            price,
            bedrooms,
            bathrooms,
            property_type: self.property_type,
        })
    }
}

/// Deserialize a field that was present in the payload, keeping `null`
/// distinguishable from an absent key (which falls back to `default`).
fn present<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

// ---------------------------------------------------------------------------
// Field rules
// ---------------------------------------------------------------------------

fn check_address(address: String, errors: &mut ValidationErrors) -> Option<String> {
    if address.trim().is_empty() {
        errors.add("address", "must not be blank");
        None
    } else {
        Some(address)
    }
}

fn check_price(price: Decimal, errors: &mut ValidationErrors) -> Option<Decimal> {
    if price < Decimal::ZERO {
        errors.add("price", "must not be negative");
        None
    } else {
        Some(price)
    }
}

fn check_room_count(count: i64, field: &'static str, errors: &mut ValidationErrors) -> Option<i16> {
    if count < 0 {
        errors.add(field, "must not be negative");
        return None;
    }
    match i16::try_from(count) {
        Ok(count) => Some(count),
        Err(_) => {
            errors.add(field, format!("must not be greater than {}", i16::MAX));
            None
        }
    }
}

fn required_room_count(
    count: Option<i64>,
    field: &'static str,
    errors: &mut ValidationErrors,
) -> Option<i16> {
    match count {
        Some(count) => check_room_count(count, field, errors),
        None => {
            errors.add(field, "is required");
            None
        }
    }
}

fn not_null<T>(
    value: Option<Option<T>>,
    field: &'static str,
    errors: &mut ValidationErrors,
) -> Option<T> {
    match value {
        Some(Some(value)) => Some(value),
        Some(None) => {
            errors.add(field, "must not be null");
            None
        }
        None => None,
    }
}
