//! The uniform `{ status, response, data }` envelope.
//!
//! Every endpoint, success or failure, answers with an [`Envelope`]: the
//! numeric status code, a human-readable message, and the payload.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Envelope<T: Serialize> {
    pub status: u16,
    pub response: String,
    pub data: T,
}

impl<T: Serialize> Envelope<T> {
    /// Wrap `data` with its status code and message. Pure; never fails.
    pub fn new(status: StatusCode, message: impl Into<String>, data: T) -> Self {
        Self {
            status: status.as_u16(),
            response: message.into(),
            data,
        }
    }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::OK);
        (status, Json(self)).into_response()
    }
}
