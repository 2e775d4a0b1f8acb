use axum::routing::get;
use axum::Router;

use crate::handlers::property;
use crate::state::AppState;

/// Property routes.
///
/// ```text
/// GET, POST               /properties
/// GET, PATCH, DELETE      /properties/{id}
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/properties",
            get(property::list_properties).post(property::create_property),
        )
        .route(
            "/properties/{id}",
            get(property::get_property)
                .patch(property::update_property)
                .delete(property::delete_property),
        )
}
