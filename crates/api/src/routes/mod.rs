pub mod health;
pub mod property;

use axum::Router;

use crate::state::AppState;

/// Build the resource route tree.
///
/// Route hierarchy:
///
/// ```text
/// /properties                   list, create
/// /properties/{id}              get, update, delete
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().merge(property::router())
}
