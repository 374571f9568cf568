//! The persistence seam used by the HTTP layer.
//!
//! [`PgStore`] forwards to the repository functions over a shared pool.
//! [`MockFormStore`] is generated for handler tests.

use async_trait::async_trait;
use mockall::automock;
use slotbook_core::{
    errors::SlotbookResult,
    models::{
        booking::{BookSlot, BookingConfirmation},
        form::NewForm,
    },
};
use uuid::Uuid;

use crate::{
    DbPool,
    models::{DbForm, DbFormWithSlots, DbSlot, DbSlotDetail},
    repositories::{booking, form, slot},
    store_failure,
};

#[automock]
#[async_trait]
pub trait FormStore: Send + Sync {
    /// Round-trips to the store; used by the health check.
    async fn ping(&self) -> SlotbookResult<()>;

    async fn create_form(&self, user_id: &str, new_form: &NewForm) -> SlotbookResult<DbFormWithSlots<DbSlot>>;

    async fn find_form_by_url(&self, url: &str) -> SlotbookResult<Option<DbFormWithSlots<DbSlot>>>;

    async fn list_forms(&self, user_id: &str) -> SlotbookResult<Vec<DbFormWithSlots<DbSlotDetail>>>;

    async fn update_form_title(&self, user_id: &str, form_id: Uuid, title: &str) -> SlotbookResult<DbForm>;

    async fn delete_form(&self, user_id: &str, form_id: Uuid) -> SlotbookResult<()>;

    async fn delete_slot(&self, user_id: &str, slot_id: Uuid) -> SlotbookResult<()>;

    async fn book_slot(&self, request: &BookSlot) -> SlotbookResult<BookingConfirmation>;
}

#[derive(Debug, Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FormStore for PgStore {
    async fn ping(&self) -> SlotbookResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(store_failure)?;
        Ok(())
    }

    async fn create_form(&self, user_id: &str, new_form: &NewForm) -> SlotbookResult<DbFormWithSlots<DbSlot>> {
        form::create_form(&self.pool, user_id, new_form).await
    }

    async fn find_form_by_url(&self, url: &str) -> SlotbookResult<Option<DbFormWithSlots<DbSlot>>> {
        form::get_form_by_url(&self.pool, url).await
    }

    async fn list_forms(&self, user_id: &str) -> SlotbookResult<Vec<DbFormWithSlots<DbSlotDetail>>> {
        form::list_forms_for_owner(&self.pool, user_id).await
    }

    async fn update_form_title(&self, user_id: &str, form_id: Uuid, title: &str) -> SlotbookResult<DbForm> {
        form::update_form_title(&self.pool, user_id, form_id, title).await
    }

    async fn delete_form(&self, user_id: &str, form_id: Uuid) -> SlotbookResult<()> {
        form::delete_form(&self.pool, user_id, form_id).await
    }

    async fn delete_slot(&self, user_id: &str, slot_id: Uuid) -> SlotbookResult<()> {
        slot::delete_slot(&self.pool, user_id, slot_id).await
    }

    async fn book_slot(&self, request: &BookSlot) -> SlotbookResult<BookingConfirmation> {
        booking::book_slot(&self.pool, request).await
    }
}
