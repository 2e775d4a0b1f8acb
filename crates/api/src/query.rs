//! Query-string types for API handlers.
//!
//! Every value arrives as an optional raw string and is parsed explicitly,
//! so malformed input is reported field by field instead of as an opaque
//! extractor rejection.

use estate_core::pagination::PaginationOptions;
use estate_core::property::{resolve_sort, PropertyFilters, PropertyQuery};
use estate_core::validation::{non_blank_text, parse_optional, ValidationErrors};
use rust_decimal::Decimal;
use serde::Deserialize;

/// Query parameters for `GET /properties`.
#[derive(Debug, Default, Deserialize)]
pub struct ListPropertiesParams {
    pub address: Option<String>,
    pub price: Option<String>,
    pub bedrooms: Option<String>,
    pub bathrooms: Option<String>,
    #[serde(rename = "type")]
    pub property_type: Option<String>,
    pub sort: Option<String>,
    pub order: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl ListPropertiesParams {
    /// Validate and convert into a [`PropertyQuery`], collecting every
    /// field error.
    pub fn into_query(self) -> Result<PropertyQuery, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let filters = PropertyFilters {
            address: non_blank_text(self.address),
            price: parse_optional::<Decimal>(self.price.as_deref(), "price", "a number", &mut errors),
            bedrooms: parse_optional::<i16>(
                self.bedrooms.as_deref(),
                "bedrooms",
                "an integer",
                &mut errors,
            ),
            bathrooms: parse_optional::<i16>(
                self.bathrooms.as_deref(),
                "bathrooms",
                "an integer",
                &mut errors,
            ),
            property_type: non_blank_text(self.property_type),
        };

        let sort = resolve_sort(self.sort.as_deref(), self.order.as_deref(), &mut errors);

        let page = parse_optional::<i64>(self.page.as_deref(), "page", "an integer", &mut errors);
        let limit = parse_optional::<i64>(self.limit.as_deref(), "limit", "an integer", &mut errors);
        let pagination = PaginationOptions::collect(page, limit, &mut errors);

        errors.into_result(PropertyQuery {
            filters,
            sort,
            pagination,
        })
    }
}
