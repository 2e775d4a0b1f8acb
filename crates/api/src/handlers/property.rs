//! Handlers for the `/properties` resource.
//!
//! Extractor rejections are taken as `Result` and converted into
//! [`AppError::BadRequest`](crate::error::AppError::BadRequest) so a
//! malformed id, body, or query string is answered with the same envelope
//! as every other failure.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use estate_core::property::messages;
use estate_core::types::DbId;
use estate_db::models::property::{CreatePropertyRequest, UpdatePropertyRequest};

use crate::error::AppResult;
use crate::query::ListPropertiesParams;
use crate::response::Envelope;
use crate::state::AppState;

/// POST /properties
pub async fn create_property(
    State(state): State<AppState>,
    body: Result<Json<CreatePropertyRequest>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(body) = body?;
    let input = body.validate()?;
    let property = state.properties.create(input).await?;

    Ok(Envelope::new(StatusCode::CREATED, messages::CREATED, property))
}

/// GET /properties
///
/// Filtered, sorted, paginated list of active properties.
pub async fn list_properties(
    State(state): State<AppState>,
    params: Result<Query<ListPropertiesParams>, QueryRejection>,
) -> AppResult<impl IntoResponse> {
    let Query(params) = params?;
    let query = params.into_query()?;
    let page = state.properties.find_all(&query).await?;

    Ok(Envelope::new(StatusCode::OK, messages::LIST_FOUND, page))
}

/// GET /properties/{id}
pub async fn get_property(
    State(state): State<AppState>,
    id: Result<Path<DbId>, PathRejection>,
) -> AppResult<impl IntoResponse> {
    let Path(id) = id?;
    let property = state.properties.find_one(id).await?;

    Ok(Envelope::new(StatusCode::OK, messages::FOUND, property))
}

/// PATCH /properties/{id}
///
/// Partial update; only fields present in the body change.
pub async fn update_property(
    State(state): State<AppState>,
    id: Result<Path<DbId>, PathRejection>,
    body: Result<Json<UpdatePropertyRequest>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Path(id) = id?;
    let Json(body) = body?;
    let changes = body.validate()?;
    let property = state.properties.update(id, changes).await?;

    Ok(Envelope::new(StatusCode::OK, messages::UPDATED, property))
}

/// DELETE /properties/{id}
///
/// Soft delete. The removed property is returned with `deletedAt` set.
pub async fn delete_property(
    State(state): State<AppState>,
    id: Result<Path<DbId>, PathRejection>,
) -> AppResult<impl IntoResponse> {
    let Path(id) = id?;
    let property = state.properties.remove(id).await?;

    Ok(Envelope::new(StatusCode::OK, messages::REMOVED, property))
}
