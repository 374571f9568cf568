use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::Value;
use slotbook_core::errors::SlotbookError;

use crate::test_utils::TestContext;

#[tokio::test]
async fn test_health_reports_ok_when_the_store_answers() {
    let mut ctx = TestContext::new();
    ctx.store.expect_ping().returning(|| Ok(()));
    let server = ctx.server();

    let response = server.get("/health").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_health_degrades_when_the_store_is_down() {
    let mut ctx = TestContext::new();
    ctx.store
        .expect_ping()
        .returning(|| Err(SlotbookError::Database(eyre::eyre!("connection refused"))));
    let server = ctx.server();

    let response = server.get("/health").await;

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = response.json();
    assert_eq!(body["status"], "degraded");
}

#[tokio::test]
async fn test_version_is_public() {
    let server = TestContext::without_owner_key().server();

    let response = server.get("/version").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert!(body["version"].is_string());
}
