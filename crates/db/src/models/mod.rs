//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create request that validates into an insert DTO
//! - A `Deserialize` update request (all `Option` fields) that validates
//!   into a set of changes

pub mod property;
