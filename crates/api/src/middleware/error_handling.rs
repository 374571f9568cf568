//! # Error Handling Middleware
//!
//! Maps [`SlotbookError`] values to HTTP status codes and a JSON body of the
//! form `{"error": <message>, "reason": <code>}`. The `reason` code is stable
//! and lets clients tell "slot just taken" from "already booked" from
//! "broken link" without parsing messages.

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use slotbook_core::errors::SlotbookError;
use tracing::error;

/// Application error wrapper that provides HTTP status code mapping
#[derive(Debug)]
pub struct AppError(pub SlotbookError);

/// HTTP status for each error kind.
pub fn status_for(err: &SlotbookError) -> StatusCode {
    match err {
        SlotbookError::Validation(_) => StatusCode::BAD_REQUEST,
        SlotbookError::FormNotFound(_) => StatusCode::NOT_FOUND,
        SlotbookError::SlotNotFound(_) => StatusCode::NOT_FOUND,
        SlotbookError::SlotAlreadyBooked(_) => StatusCode::CONFLICT,
        SlotbookError::DuplicateBooking => StatusCode::CONFLICT,
        SlotbookError::SlotFormMismatch { .. } => StatusCode::BAD_REQUEST,
        SlotbookError::UrlAlreadyExists(_) => StatusCode::CONFLICT,
        SlotbookError::Authentication(_) => StatusCode::UNAUTHORIZED,
        SlotbookError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        SlotbookError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = status_for(&self.0);

        // Store and internal failures are logged in full but not echoed.
        let message = if self.0.is_server_error() {
            error!("Request failed: {:?}", self.0);
            "An unexpected error occurred".to_string()
        } else {
            self.0.to_string()
        };

        let body = Json(json!({ "error": message, "reason": self.0.reason() }));

        (status, body).into_response()
    }
}

impl From<SlotbookError> for AppError {
    fn from(err: SlotbookError) -> Self {
        AppError(err)
    }
}

/// Malformed or incomplete JSON bodies are validation errors.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError(SlotbookError::Validation(rejection.body_text()))
    }
}

/// Path segments that fail to parse (a non-UUID id) are validation errors.
impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError(SlotbookError::Validation(rejection.body_text()))
    }
}

/// Maps a SlotbookError to an HTTP response
pub fn map_error(err: SlotbookError) -> Response {
    AppError(err).into_response()
}
