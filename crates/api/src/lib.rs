//! # SlotBook API
//!
//! The API crate provides the web server for the SlotBook booking service.
//! Owners create forms with generated time slots; visitors open a form through
//! its public url key and book one slot.
//!
//! ## Architecture
//!
//! - **Routes**: Define API endpoints and URL structure
//! - **Handlers**: Turn requests into store calls and shape the responses
//! - **Middleware**: Owner authentication and error-to-response mapping
//! - **Config**: Environment configuration
//!
//! All persistence goes through the [`FormStore`] trait so the booking
//! invariants stay inside the store's transactions.

/// Configuration module for API settings
pub mod config;
/// Request handlers
pub mod handlers;
/// Owner authentication and error handling
pub mod middleware;
/// Route definitions and API endpoint structure
pub mod routes;

use std::{sync::Arc, time::Duration};

use axum::{
    Router,
    http::{HeaderName, HeaderValue, Method, header},
};
use eyre::Result;
use slotbook_db::{
    DbPool,
    store::{FormStore, PgStore},
};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::FmtSubscriber;

use crate::middleware::auth::USER_ID_HEADER;

/// Shared application state that is accessible to all request handlers
///
/// Created once at startup and shared by reference for the lifetime of the
/// process.
pub struct ApiState {
    /// Persistence for forms, slots and bookings
    pub store: Arc<dyn FormStore>,
    /// Argon2 PHC hash of the owner API key; owner routes reject every
    /// request when unset
    pub owner_key_hash: Option<String>,
}

impl ApiState {
    pub fn new(store: Arc<dyn FormStore>, owner_key_hash: Option<String>) -> Self {
        Self {
            store,
            owner_key_hash,
        }
    }
}

/// Builds the application router with all routes attached to `state`.
pub fn app(state: Arc<ApiState>) -> Router {
    Router::new()
        // Health check endpoints
        .merge(routes::health::routes())
        // Owner form management endpoints
        .merge(routes::forms::routes())
        // Public form read and booking endpoints
        .merge(routes::public::routes())
        .with_state(state)
}

/// Starts the API server with the provided configuration and database pool
///
/// Sets up logging, wraps the pool in a [`PgStore`], applies CORS, tracing
/// and timeout layers and serves until the listener fails.
pub async fn start_server(config: config::ApiConfig, db_pool: DbPool) -> Result<()> {
    // Initialize tracing for logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    if config.owner_key_hash.is_none() {
        warn!("OWNER_API_KEY_HASH is not set; owner endpoints will reject every request");
    }

    let store: Arc<dyn FormStore> = Arc::new(PgStore::new(db_pool));
    let state = Arc::new(ApiState::new(store, config.owner_key_hash.clone()));

    let app = app(state);

    // Apply CORS configuration if origins are specified
    let app = if let Some(origins) = &config.cors_origins {
        let allowed: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|origin| match origin.parse() {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!("Ignoring invalid CORS origin: {}", origin);
                    None
                }
            })
            .collect();

        let cors = CorsLayer::new()
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([
                header::CONTENT_TYPE,
                header::AUTHORIZATION,
                header::ACCEPT,
                HeaderName::from_static(USER_ID_HEADER),
            ])
            .allow_origin(allowed)
            .allow_credentials(true);

        app.layer(cors)
    } else {
        app
    };

    // Request logging and timeout; a timed-out request drops its transaction
    let app = app.layer(
        tower::ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout))),
    );

    // Start the HTTP server
    let addr = config.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
