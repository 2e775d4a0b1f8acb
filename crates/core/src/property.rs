//! Property listing query specification.
//!
//! A [`PropertyQuery`] is an immutable description of one list request:
//! AND-combined filters, an optional sort, and a page. The repository
//! compiles it into a single SQL plan so the filtered set, its count, and
//! the returned page can never disagree.

use rust_decimal::Decimal;

use crate::pagination::PaginationOptions;
use crate::validation::{non_blank, ValidationErrors};

/// Entity name used in not-found errors.
pub const ENTITY: &str = "Property";

/// Human-readable texts carried in the `response` field of the envelope.
pub mod messages {
    pub const CREATED: &str = "Property successfully created";
    pub const LIST_FOUND: &str = "Property list found";
    pub const FOUND: &str = "Property found";
    pub const UPDATED: &str = "Property successfully updated";
    pub const REMOVED: &str = "Property successfully removed";
}

// ---------------------------------------------------------------------------
// Sorting
// ---------------------------------------------------------------------------

/// Columns a property list can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Id,
    Address,
    Price,
    Bedrooms,
    Bathrooms,
    Type,
}

impl SortField {
    pub const ALL: [SortField; 6] = [
        SortField::Id,
        SortField::Address,
        SortField::Price,
        SortField::Bedrooms,
        SortField::Bathrooms,
        SortField::Type,
    ];

    /// The query-string spelling of this field.
    pub fn as_str(self) -> &'static str {
        match self {
            SortField::Id => "id",
            SortField::Address => "address",
            SortField::Price => "price",
            SortField::Bedrooms => "bedrooms",
            SortField::Bathrooms => "bathrooms",
            SortField::Type => "type",
        }
    }

    /// The `property` column this field orders by, quoted where needed.
    pub fn column(self) -> &'static str {
        match self {
            SortField::Id => "id",
            SortField::Address => "address",
            SortField::Price => "price",
            SortField::Bedrooms => "bedrooms",
            SortField::Bathrooms => "bathrooms",
            SortField::Type => "\"type\"",
        }
    }

    /// Case-insensitive lookup (`"PRICE"` and `"price"` both match).
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|f| f.as_str().eq_ignore_ascii_case(value))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_sql(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        if value.eq_ignore_ascii_case("asc") {
            Some(SortDirection::Asc)
        } else if value.eq_ignore_ascii_case("desc") {
            Some(SortDirection::Desc)
        } else {
            None
        }
    }
}

/// A sort field together with its direction. Nulls always sort last.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub field: SortField,
    pub direction: SortDirection,
}

/// Resolve raw `sort` / `order` values into a [`SortSpec`].
///
/// Both must be given together. A lone `sort` or a lone `order` is an
/// error on the missing side; unknown values are errors on their own side.
pub fn resolve_sort(
    sort: Option<&str>,
    order: Option<&str>,
    errors: &mut ValidationErrors,
) -> Option<SortSpec> {
    let sort = non_blank(sort);
    let order = non_blank(order);

    let field = sort.and_then(|raw| {
        let parsed = SortField::parse(raw);
        if parsed.is_none() {
            errors.add(
                "sort",
                "must be one of: id, address, price, bedrooms, bathrooms, type",
            );
        }
        parsed
    });
    let direction = order.and_then(|raw| {
        let parsed = SortDirection::parse(raw);
        if parsed.is_none() {
            errors.add("order", "must be one of: ASC, DESC");
        }
        parsed
    });

    match (sort, order) {
        (Some(_), None) => {
            errors.add("order", "is required when sort is given");
            None
        }
        (None, Some(_)) => {
            errors.add("sort", "is required when order is given");
            None
        }
        _ => Some(SortSpec {
            field: field?,
            direction: direction?,
        }),
    }
}

// ---------------------------------------------------------------------------
// Filters and the full query
// ---------------------------------------------------------------------------

/// Independent, AND-combined predicates over the active property set.
///
/// `address` matches as a case-sensitive substring; every other field is an
/// exact match. `Some(0)` is a real filter value, not "unset".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyFilters {
    pub address: Option<String>,
    pub price: Option<Decimal>,
    pub bedrooms: Option<i16>,
    pub bathrooms: Option<i16>,
    pub property_type: Option<String>,
}

/// Everything needed to fetch one page of properties.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyQuery {
    pub filters: PropertyFilters,
    pub sort: Option<SortSpec>,
    pub pagination: PaginationOptions,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_field_parse_is_case_insensitive() {
        assert_eq!(SortField::parse("PRICE"), Some(SortField::Price));
        assert_eq!(SortField::parse("price"), Some(SortField::Price));
        assert_eq!(SortField::parse("Type"), Some(SortField::Type));
        assert_eq!(SortField::parse("deleted_at"), None);
    }

    #[test]
    fn direction_parse() {
        assert_eq!(SortDirection::parse("ASC"), Some(SortDirection::Asc));
        assert_eq!(SortDirection::parse("desc"), Some(SortDirection::Desc));
        assert_eq!(SortDirection::parse("up"), None);
    }

    #[test]
    fn sort_and_order_together() {
        let mut errors = ValidationErrors::new();
        let spec = resolve_sort(Some("address"), Some("DESC"), &mut errors);
        assert!(errors.is_empty());
        assert_eq!(
            spec,
            Some(SortSpec {
                field: SortField::Address,
                direction: SortDirection::Desc,
            })
        );
    }

    #[test]
    fn neither_sort_nor_order_is_fine() {
        let mut errors = ValidationErrors::new();
        assert_eq!(resolve_sort(None, Some(""), &mut errors), None);
        assert!(errors.is_empty());
    }

    #[test]
    fn lone_sort_is_rejected() {
        let mut errors = ValidationErrors::new();
        assert_eq!(resolve_sort(Some("price"), None, &mut errors), None);
        assert!(errors.has_field("order"));
    }

    #[test]
    fn lone_order_is_rejected() {
        let mut errors = ValidationErrors::new();
        assert_eq!(resolve_sort(None, Some("ASC"), &mut errors), None);
        assert!(errors.has_field("sort"));
    }

    #[test]
    fn unknown_values_are_rejected_per_side() {
        let mut errors = ValidationErrors::new();
        assert_eq!(resolve_sort(Some("color"), Some("sideways"), &mut errors), None);
        assert!(errors.has_field("sort"));
        assert!(errors.has_field("order"));
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn zero_is_a_filter_value() {
        let filters = PropertyFilters {
            bedrooms: Some(0),
            ..Default::default()
        };
        assert_ne!(filters, PropertyFilters::default());
    }

    #[test]
    fn type_column_is_quoted() {
        assert_eq!(SortField::Type.column(), "\"type\"");
        assert_eq!(SortField::Type.as_str(), "type");
    }
}
