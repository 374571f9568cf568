use axum::http::{HeaderName, HeaderValue, StatusCode, header::AUTHORIZATION};
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{Value, json};
use slotbook_core::errors::SlotbookError;
use slotbook_db::models::DbFormWithSlots;
use uuid::Uuid;

use crate::test_utils::{
    API_KEY, TestContext, USER_ID, as_owner, db_form, db_slot, db_slot_detail,
};

fn create_body() -> Value {
    json!({
        "title": "Office hours",
        "url": "office-hours",
        "startDate": "2024-01-01",
        "endDate": "2024-01-02",
        "timeStart": "09:00",
        "timeEnd": "10:00",
        "timeDuration": 30,
        "slots": [
            { "date": "2024-01-01", "timeStart": "09:00", "timeEnd": "09:30" },
            { "date": "2024-01-01", "timeStart": "09:30", "timeEnd": "10:00" }
        ]
    })
}

#[tokio::test]
async fn test_create_form_returns_created_form() {
    let mut ctx = TestContext::new();
    ctx.store
        .expect_create_form()
        .withf(|user_id, new_form| {
            user_id.to_string() == USER_ID
                && new_form.url == "office-hours"
                && new_form.slots.len() == 2
        })
        .times(1)
        .returning(|_, new_form| {
            let form = db_form(&new_form.url);
            let slots = vec![
                db_slot(form.id, "09:00", "09:30", None),
                db_slot(form.id, "09:30", "10:00", None),
            ];
            Ok(DbFormWithSlots { form, slots })
        });
    let server = ctx.server();

    let response = as_owner(server.post("/api/forms"))
        .json(&create_body())
        .await;

    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["slotCount"], 2);
    assert_eq!(body["form"]["url"], "office-hours");
    assert_eq!(body["form"]["times"]["timeStart"], "09:00");
    assert_eq!(body["form"]["dates"]["endDate"], "2024-01-02");
}

#[tokio::test]
async fn test_create_form_with_taken_url_conflicts() {
    let mut ctx = TestContext::new();
    ctx.store
        .expect_create_form()
        .returning(|_, new_form| Err(SlotbookError::UrlAlreadyExists(new_form.url.clone())));
    let server = ctx.server();

    let response = as_owner(server.post("/api/forms"))
        .json(&create_body())
        .await;

    response.assert_status(StatusCode::CONFLICT);
    let body: Value = response.json();
    assert_eq!(body["reason"], "URL_ALREADY_EXISTS");
}

#[tokio::test]
async fn test_create_form_rejects_invalid_window_before_touching_the_store() {
    let server = TestContext::new().server();

    let mut body = create_body();
    body["endDate"] = json!("2023-12-01");

    let response = as_owner(server.post("/api/forms")).json(&body).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["reason"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_owner_routes_require_an_api_key() {
    let server = TestContext::new().server();

    let response = server
        .get("/api/forms")
        .add_header(
            HeaderName::from_static("x-user-id"),
            HeaderValue::from_static(USER_ID),
        )
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    let body: Value = response.json();
    assert_eq!(body["reason"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_owner_routes_reject_a_wrong_api_key() {
    let server = TestContext::new().server();

    let response = server
        .get("/api/forms")
        .add_header(AUTHORIZATION, HeaderValue::from_static("Bearer not-the-key"))
        .add_header(
            HeaderName::from_static("x-user-id"),
            HeaderValue::from_static(USER_ID),
        )
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_owner_routes_reject_everything_without_a_configured_key() {
    let server = TestContext::without_owner_key().server();

    let response = as_owner(server.get("/api/forms")).await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_owner_routes_require_a_user_id() {
    let server = TestContext::new().server();

    let response = server
        .get("/api/forms")
        .add_header(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", API_KEY)).unwrap(),
        )
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["reason"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_list_forms_includes_applicant_details() {
    let mut ctx = TestContext::new();
    ctx.store
        .expect_list_forms()
        .withf(|user_id| user_id.to_string() == USER_ID)
        .returning(|_| {
            let form = db_form("office-hours");
            let slots = vec![
                db_slot_detail(form.id, Some("Alice")),
                db_slot_detail(form.id, None),
            ];
            Ok(vec![DbFormWithSlots { form, slots }])
        });
    let server = ctx.server();

    let response = as_owner(server.get("/api/forms")).await;

    response.assert_status_ok();
    let body: Value = response.json();
    let forms = body.as_array().unwrap();
    assert_eq!(forms.len(), 1);
    assert_eq!(forms[0]["title"], "Office hours");
    assert_eq!(forms[0]["slots"][0]["applicant"]["name"], "Alice");
    assert!(forms[0]["slots"][1].get("applicant").is_none());
}

#[tokio::test]
async fn test_update_form_title() {
    let form_id = Uuid::new_v4();
    let mut ctx = TestContext::new();
    ctx.store
        .expect_update_form_title()
        .withf(move |user_id, id, title| {
            user_id.to_string() == USER_ID && *id == form_id && title.to_string() == "Renamed"
        })
        .returning(move |_, _, title| {
            let mut form = db_form("office-hours");
            form.id = form_id;
            form.title = title.to_string();
            Ok(form)
        });
    let server = ctx.server();

    let response = as_owner(server.put(&format!("/api/forms/{}", form_id)))
        .json(&json!({ "title": "  Renamed  " }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["form"]["title"], "Renamed");
    assert_eq!(body["form"]["id"], form_id.to_string());
}

#[tokio::test]
async fn test_update_form_title_rejects_short_titles() {
    let server = TestContext::new().server();

    let response = as_owner(server.put(&format!("/api/forms/{}", Uuid::new_v4())))
        .json(&json!({ "title": "ab" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_form() {
    let form_id = Uuid::new_v4();
    let mut ctx = TestContext::new();
    ctx.store
        .expect_delete_form()
        .withf(move |user_id, id| user_id.to_string() == USER_ID && *id == form_id)
        .times(1)
        .returning(|_, _| Ok(()));
    let server = ctx.server();

    let response = as_owner(server.delete(&format!("/api/forms/{}", form_id))).await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["success"], true);
}

#[tokio::test]
async fn test_delete_unknown_form_is_not_found() {
    let mut ctx = TestContext::new();
    ctx.store
        .expect_delete_form()
        .returning(|_, id| Err(SlotbookError::FormNotFound(id.to_string())));
    let server = ctx.server();

    let response = as_owner(server.delete(&format!("/api/forms/{}", Uuid::new_v4()))).await;

    response.assert_status(StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert_eq!(body["reason"], "FORM_NOT_FOUND");
}

#[tokio::test]
async fn test_delete_slot() {
    let slot_id = Uuid::new_v4();
    let mut ctx = TestContext::new();
    ctx.store
        .expect_delete_slot()
        .withf(move |user_id, id| user_id.to_string() == USER_ID && *id == slot_id)
        .times(1)
        .returning(|_, _| Ok(()));
    let server = ctx.server();

    let response = as_owner(server.delete(&format!("/api/forms/slots/{}", slot_id))).await;

    response.assert_status_ok();
}

#[tokio::test]
async fn test_delete_unknown_slot_is_not_found() {
    let mut ctx = TestContext::new();
    ctx.store
        .expect_delete_slot()
        .returning(|_, id| Err(SlotbookError::SlotNotFound(id)));
    let server = ctx.server();

    let response = as_owner(server.delete(&format!("/api/forms/slots/{}", Uuid::new_v4()))).await;

    response.assert_status(StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert_eq!(body["reason"], "SLOT_NOT_FOUND");
}

#[tokio::test]
async fn test_preview_slots_counts_generated_slots() {
    let server = TestContext::new().server();

    let response = as_owner(server.post("/api/forms/slots/preview"))
        .json(&json!({
            "startDate": "2024-01-01",
            "endDate": "2024-01-03",
            "timeStart": "09:00",
            "timeEnd": "10:00",
            "timeDuration": 40
        }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["count"], 3);
    assert_eq!(body["slots"][0]["key"], "2024-01-01-09:00-09:40");
}

#[tokio::test]
async fn test_store_failures_are_not_echoed() {
    let mut ctx = TestContext::new();
    ctx.store
        .expect_list_forms()
        .returning(|_| Err(SlotbookError::Database(eyre::eyre!("password=hunter2"))));
    let server = ctx.server();

    let response = as_owner(server.get("/api/forms")).await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert_eq!(body["reason"], "STORE_FAILURE");
    assert!(!body["error"].as_str().unwrap().contains("hunter2"));
}

#[rstest]
#[case::rename_with_bad_id("PUT", "/api/forms/not-a-uuid")]
#[case::delete_with_bad_id("DELETE", "/api/forms/not-a-uuid")]
#[case::delete_slot_without_id("DELETE", "/api/forms/slots")]
#[case::delete_slot_with_bad_id("DELETE", "/api/forms/slots/42")]
#[tokio::test]
async fn test_malformed_ids_are_json_validation_errors(#[case] method: &str, #[case] path: &str) {
    let server = TestContext::new().server();

    let request = match method {
        "PUT" => server.put(path).json(&json!({ "title": "Renamed" })),
        _ => server.delete(path),
    };
    let response = as_owner(request).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["reason"], "VALIDATION_ERROR");
    assert!(body["error"].is_string());
}
