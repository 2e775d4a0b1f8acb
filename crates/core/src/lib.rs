//! Domain types and pure logic for the property listing service.
//!
//! Nothing in this crate performs I/O; the `db` and `api` crates build on
//! these types to talk to Postgres and HTTP respectively.

pub mod error;
pub mod pagination;
pub mod property;
pub mod types;
pub mod validation;
