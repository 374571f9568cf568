use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{Value, json};
use slotbook_core::errors::SlotbookError;
use slotbook_db::models::DbFormWithSlots;
use uuid::Uuid;

use crate::test_utils::{TestContext, confirmation, db_form, db_slot};

fn booking_body(form_id: Uuid, slot_id: Uuid) -> Value {
    json!({
        "formId": form_id,
        "slotId": slot_id,
        "name": "Alice",
        "email": "alice@example.com"
    })
}

#[tokio::test]
async fn test_public_form_reports_booked_flags_without_applicants() {
    let mut ctx = TestContext::new();
    ctx.store
        .expect_find_form_by_url()
        .withf(|url| url.to_string() == "office-hours")
        .returning(|url| {
            let form = db_form(url);
            let slots = vec![
                db_slot(form.id, "09:00", "09:30", Some(Uuid::new_v4())),
                db_slot(form.id, "09:30", "10:00", None),
            ];
            Ok(Some(DbFormWithSlots { form, slots }))
        });
    let server = ctx.server();

    let response = server.get("/api/public/forms/office-hours").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["url"], "office-hours");
    assert_eq!(body["slots"][0]["isBooked"], true);
    assert_eq!(body["slots"][1]["isBooked"], false);
    assert_eq!(body["slots"][1]["timeStart"], "09:30");
    assert!(body["slots"][0].get("applicant").is_none());
    assert!(body["slots"][0].get("applicantId").is_none());
}

#[tokio::test]
async fn test_unknown_url_key_is_not_found() {
    let mut ctx = TestContext::new();
    ctx.store
        .expect_find_form_by_url()
        .returning(|_| Ok(None));
    let server = ctx.server();

    let response = server.get("/api/public/forms/missing-key").await;

    response.assert_status(StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert_eq!(body["reason"], "FORM_NOT_FOUND");
}

#[tokio::test]
async fn test_booking_a_slot_returns_the_confirmation() {
    let form_id = Uuid::new_v4();
    let slot_id = Uuid::new_v4();
    let mut ctx = TestContext::new();
    ctx.store
        .expect_book_slot()
        .withf(move |request| {
            request.form_id == form_id
                && request.slot_id == slot_id
                && request.name == "Alice"
                && request.contact.email.as_deref() == Some("alice@example.com")
        })
        .times(1)
        .returning(|request| Ok(confirmation(request.form_id, request.slot_id)));
    let server = ctx.server();

    let response = server
        .post("/api/public/bookings")
        .json(&booking_body(form_id, slot_id))
        .await;

    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Booking confirmed");
    assert_eq!(body["booking"]["slotId"], slot_id.to_string());
    assert_eq!(body["booking"]["timeEnd"], "09:30");
}

#[rstest]
#[case(SlotbookError::SlotAlreadyBooked(Uuid::nil()), StatusCode::CONFLICT, "SLOT_ALREADY_BOOKED")]
#[case(SlotbookError::DuplicateBooking, StatusCode::CONFLICT, "DUPLICATE_BOOKING")]
#[case(
    SlotbookError::SlotFormMismatch { slot_id: Uuid::nil(), form_id: Uuid::nil() },
    StatusCode::BAD_REQUEST,
    "SLOT_FORM_MISMATCH"
)]
#[case(SlotbookError::SlotNotFound(Uuid::nil()), StatusCode::NOT_FOUND, "SLOT_NOT_FOUND")]
#[tokio::test]
async fn test_booking_rejections_carry_a_reason(
    #[case] error: SlotbookError,
    #[case] status: StatusCode,
    #[case] reason: &str,
) {
    let mut ctx = TestContext::new();
    ctx.store
        .expect_book_slot()
        .return_once(move |_| Err(error));
    let server = ctx.server();

    let response = server
        .post("/api/public/bookings")
        .json(&booking_body(Uuid::new_v4(), Uuid::new_v4()))
        .await;

    response.assert_status(status);
    let body: Value = response.json();
    assert_eq!(body["reason"], reason);
}

#[tokio::test]
async fn test_booking_without_contact_is_rejected_before_the_store() {
    let server = TestContext::new().server();

    let response = server
        .post("/api/public/bookings")
        .json(&json!({
            "formId": Uuid::new_v4(),
            "slotId": Uuid::new_v4(),
            "name": "Alice",
            "email": "  "
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["reason"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_malformed_booking_body_is_a_validation_error() {
    let server = TestContext::new().server();

    let response = server
        .post("/api/public/bookings")
        .json(&json!({ "formId": "not-a-uuid", "name": "Alice" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["reason"], "VALIDATION_ERROR");
}
