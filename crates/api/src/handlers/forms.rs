//! # Owner Form Handlers
//!
//! Create, list, rename and delete forms, delete single slots, and preview
//! the slots a schedule window would generate. All handlers are scoped to
//! the authenticated owner's user id.

use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
};
use slotbook_core::models::{
    MessageResponse,
    form::{
        CreateFormRequest, CreateFormResponse, Form, FormResponse, OwnerFormResponse,
        PreviewSlotsResponse, ScheduleWindow, UpdateFormResponse, UpdateFormTitleRequest,
    },
};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    ApiState,
    middleware::{auth::OwnerAuth, error_handling::AppError},
};

/// `POST /api/forms`: form definition plus an optional pre-generated slot
/// batch, written in one transaction.
#[axum::debug_handler]
pub async fn create_form(
    State(state): State<Arc<ApiState>>,
    owner: OwnerAuth,
    payload: Result<Json<CreateFormRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreateFormResponse>), AppError> {
    let Json(payload) = payload?;
    let new_form = payload.validate()?;

    let created = state.store.create_form(&owner.user_id, &new_form).await?;

    let form = Form::from(created.form);
    let response = CreateFormResponse {
        success: true,
        form: FormResponse::from(&form),
        slot_count: created.slots.len(),
    };

    Ok((StatusCode::CREATED, Json(response)))
}

/// `GET /api/forms`: the owner's forms, newest first, with applicants.
#[axum::debug_handler]
pub async fn list_forms(
    State(state): State<Arc<ApiState>>,
    owner: OwnerAuth,
) -> Result<Json<Vec<OwnerFormResponse>>, AppError> {
    let forms = state.store.list_forms(&owner.user_id).await?;

    Ok(Json(forms.into_iter().map(OwnerFormResponse::from).collect()))
}

/// `PUT /api/forms/:id`: rename a form.
#[axum::debug_handler]
pub async fn update_form_title(
    State(state): State<Arc<ApiState>>,
    owner: OwnerAuth,
    path: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<UpdateFormTitleRequest>, JsonRejection>,
) -> Result<Json<UpdateFormResponse>, AppError> {
    let Path(id) = path?;
    let Json(payload) = payload?;
    let title = payload.validate()?;

    let updated = state
        .store
        .update_form_title(&owner.user_id, id, &title)
        .await?;

    Ok(Json(UpdateFormResponse {
        success: true,
        form: FormResponse::from(&Form::from(updated)),
    }))
}

/// `DELETE /api/forms/:id`: remove a form with its slots and applicants.
#[axum::debug_handler]
pub async fn delete_form(
    State(state): State<Arc<ApiState>>,
    owner: OwnerAuth,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let Path(id) = path?;
    state.store.delete_form(&owner.user_id, id).await?;

    Ok(Json(MessageResponse::ok("Form deleted")))
}

/// `DELETE /api/forms/slots/:slot_id`: remove one slot, and its applicant
/// when booked.
#[axum::debug_handler]
pub async fn delete_slot(
    State(state): State<Arc<ApiState>>,
    owner: OwnerAuth,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let Path(slot_id) = path?;
    state.store.delete_slot(&owner.user_id, slot_id).await?;

    Ok(Json(MessageResponse::ok("Slot deleted")))
}

/// `POST /api/forms/slots/preview`: run the slot generator without
/// persisting anything.
#[axum::debug_handler]
pub async fn preview_slots(
    State(_state): State<Arc<ApiState>>,
    _owner: OwnerAuth,
    payload: Result<Json<ScheduleWindow>, JsonRejection>,
) -> Result<Json<PreviewSlotsResponse>, AppError> {
    let Json(window) = payload?;
    window.validate()?;

    let slots = window.slots();
    Ok(Json(PreviewSlotsResponse {
        count: slots.len(),
        slots,
    }))
}
