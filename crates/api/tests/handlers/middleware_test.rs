use axum::{body::to_bytes, http::StatusCode};
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::Value;
use slotbook_api::middleware::{
    auth::{hash_api_key, verify_api_key},
    error_handling::{map_error, status_for},
};
use slotbook_core::errors::SlotbookError;
use uuid::Uuid;

#[rstest]
#[case(SlotbookError::Validation("bad".into()), StatusCode::BAD_REQUEST)]
#[case(SlotbookError::FormNotFound("k".into()), StatusCode::NOT_FOUND)]
#[case(SlotbookError::SlotNotFound(Uuid::nil()), StatusCode::NOT_FOUND)]
#[case(SlotbookError::SlotAlreadyBooked(Uuid::nil()), StatusCode::CONFLICT)]
#[case(SlotbookError::DuplicateBooking, StatusCode::CONFLICT)]
#[case(
    SlotbookError::SlotFormMismatch { slot_id: Uuid::nil(), form_id: Uuid::nil() },
    StatusCode::BAD_REQUEST
)]
#[case(SlotbookError::UrlAlreadyExists("k".into()), StatusCode::CONFLICT)]
#[case(SlotbookError::Authentication("no".into()), StatusCode::UNAUTHORIZED)]
#[case(SlotbookError::Database(eyre::eyre!("down")), StatusCode::INTERNAL_SERVER_ERROR)]
fn test_status_for_each_error(#[case] error: SlotbookError, #[case] status: StatusCode) {
    assert_eq!(status_for(&error), status);
}

#[tokio::test]
async fn test_error_body_carries_message_and_reason() {
    let response = map_error(SlotbookError::DuplicateBooking);
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["reason"], "DUPLICATE_BOOKING");
    assert!(body["error"].is_string());
}

#[test]
fn test_api_key_hash_round_trip() {
    let hash = hash_api_key("owner-secret").unwrap();

    assert!(hash.starts_with("$argon2"));
    assert!(verify_api_key(&hash, "owner-secret"));
    assert!(!verify_api_key(&hash, "owner-secret "));
    assert_ne!(hash, hash_api_key("owner-secret").unwrap());
}

#[test]
fn test_malformed_hash_never_verifies() {
    assert!(!verify_api_key("not-a-phc-string", "anything"));
}
