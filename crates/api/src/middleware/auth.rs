//! # Owner Authentication
//!
//! Owner endpoints require two headers:
//!
//! - `Authorization: Bearer <api key>`, verified against the Argon2 hash in
//!   `OWNER_API_KEY_HASH`
//! - `X-User-ID: <user id>`, naming the owner whose forms are being managed
//!
//! Session issuance lives with the external auth provider; this module only
//! checks the shared key and scopes every owner operation to the user id.

use std::sync::Arc;

use argon2::{
    Argon2, PasswordHasher, PasswordVerifier,
    password_hash::{PasswordHash, SaltString, rand_core::OsRng},
};
use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use eyre::Result;
use slotbook_core::errors::SlotbookError;
use tracing::warn;

use crate::{ApiState, middleware::error_handling::AppError};

pub const USER_ID_HEADER: &str = "x-user-id";

/// Hashes an API key with Argon2 and a random salt, in PHC string format.
pub fn hash_api_key(key: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    let hash = Argon2::default()
        .hash_password(key.as_bytes(), &salt)
        .map_err(|e| eyre::eyre!("Error hashing API key: {}", e))?
        .to_string();

    Ok(hash)
}

/// Checks `key` against a PHC hash. A malformed hash never verifies.
pub fn verify_api_key(hash: &str, key: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(key.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            warn!("Configured owner key hash is not a valid PHC string: {}", e);
            false
        }
    }
}

/// An authenticated owner. Extracting it rejects the request with
/// `UNAUTHORIZED` or `VALIDATION_ERROR` when the headers are missing or wrong.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnerAuth {
    pub user_id: String,
}

#[async_trait]
impl FromRequestParts<Arc<ApiState>> for OwnerAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<ApiState>,
    ) -> Result<Self, Self::Rejection> {
        let key = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                SlotbookError::Authentication("Authorization header is required".to_string())
            })?
            .to_string();

        let hash = state
            .owner_key_hash
            .clone()
            .ok_or_else(|| SlotbookError::Authentication("Invalid API key".to_string()))?;

        // Argon2 is deliberately slow; keep it off the async workers.
        let valid = tokio::task::spawn_blocking(move || verify_api_key(&hash, &key))
            .await
            .map_err(|e| SlotbookError::Internal(Box::new(e)))?;

        if !valid {
            return Err(SlotbookError::Authentication("Invalid API key".to_string()).into());
        }

        let user_id = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| SlotbookError::Validation("X-User-ID header is required".to_string()))?
            .to_string();

        Ok(OwnerAuth { user_id })
    }
}
