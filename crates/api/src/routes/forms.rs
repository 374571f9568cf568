use axum::{
    Router,
    routing::{delete, post, put},
};
use std::sync::Arc;

use crate::{ApiState, handlers};

/// Owner-side routes. Every handler extracts [`crate::middleware::auth::OwnerAuth`].
pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/forms",
            post(handlers::forms::create_form).get(handlers::forms::list_forms),
        )
        .route(
            "/api/forms/:id",
            put(handlers::forms::update_form_title).delete(handlers::forms::delete_form),
        )
        .route(
            "/api/forms/slots/preview",
            post(handlers::forms::preview_slots),
        )
        .route(
            "/api/forms/slots/:slot_id",
            delete(handlers::forms::delete_slot),
        )
}
