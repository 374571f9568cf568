use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use crate::{ApiState, handlers};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/public/forms/:url",
            get(handlers::public::get_public_form),
        )
        .route("/api/public/bookings", post(handlers::public::book_slot))
}
