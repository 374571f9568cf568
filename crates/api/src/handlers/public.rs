//! # Public Handlers
//!
//! Visitors read a form through its url key and book one slot. Nothing here
//! returns applicant details; a slot only reports whether it is taken.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use slotbook_core::{
    errors::SlotbookError,
    models::{
        booking::{BookSlotRequest, BookSlotResponse},
        form::PublicFormResponse,
    },
};
use std::sync::Arc;

use crate::{ApiState, middleware::error_handling::AppError};

/// `GET /api/public/forms/:url`
#[axum::debug_handler]
pub async fn get_public_form(
    State(state): State<Arc<ApiState>>,
    Path(url): Path<String>,
) -> Result<Json<PublicFormResponse>, AppError> {
    let form = state
        .store
        .find_form_by_url(&url)
        .await?
        .ok_or_else(|| SlotbookError::FormNotFound(url.clone()))?;

    Ok(Json(PublicFormResponse::from(form)))
}

/// `POST /api/public/bookings`
///
/// Shape checks run here; availability, ownership and duplicate checks run
/// inside the store's booking transaction.
#[axum::debug_handler]
pub async fn book_slot(
    State(state): State<Arc<ApiState>>,
    payload: Result<Json<BookSlotRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<BookSlotResponse>), AppError> {
    let Json(payload) = payload?;
    let booking = payload.validate()?;

    let confirmation = state.store.book_slot(&booking).await?;

    Ok((
        StatusCode::CREATED,
        Json(BookSlotResponse {
            success: true,
            message: "Booking confirmed".to_string(),
            booking: confirmation,
        }),
    ))
}
