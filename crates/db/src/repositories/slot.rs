use chrono::Utc;
use slotbook_core::{
    errors::{SlotbookError, SlotbookResult},
    models::form::CreateSlotRequest,
};
use sqlx::{PgExecutor, Pool, Postgres};
use tracing::info;
use uuid::Uuid;

use crate::{
    models::{DbSlot, DbSlotDetail},
    store_failure,
};

pub async fn insert_slot<'e, E>(
    executor: E,
    form_id: Uuid,
    slot: &CreateSlotRequest,
) -> Result<DbSlot, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, DbSlot>(
        r#"
        INSERT INTO form_slots (id, form_id, date, time_start, time_end, created_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id, form_id, date, time_start, time_end, applicant_id, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(form_id)
    .bind(slot.date)
    .bind(slot.time_start)
    .bind(slot.time_end)
    .bind(Utc::now())
    .fetch_one(executor)
    .await
}

pub async fn get_slots_by_form_id<'e, E>(executor: E, form_id: Uuid) -> Result<Vec<DbSlot>, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, DbSlot>(
        r#"
        SELECT id, form_id, date, time_start, time_end, applicant_id, created_at
        FROM form_slots
        WHERE form_id = $1
        ORDER BY date ASC, time_start ASC
        "#,
    )
    .bind(form_id)
    .fetch_all(executor)
    .await
}

pub async fn get_slot_details_by_form_ids<'e, E>(
    executor: E,
    form_ids: &[Uuid],
) -> Result<Vec<DbSlotDetail>, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    if form_ids.is_empty() {
        return Ok(Vec::new());
    }

    sqlx::query_as::<_, DbSlotDetail>(
        r#"
        SELECT s.id, s.form_id, s.date, s.time_start, s.time_end, s.applicant_id,
               a.name AS applicant_name,
               a.email AS applicant_email,
               a.phone AS applicant_phone,
               a.created_at AS applicant_created_at
        FROM form_slots s
        LEFT JOIN applicants a ON a.id = s.applicant_id
        WHERE s.form_id = ANY($1)
        ORDER BY s.form_id, s.date ASC, s.time_start ASC
        "#,
    )
    .bind(form_ids)
    .fetch_all(executor)
    .await
}

/// Deletes one slot owned by `user_id`, and its applicant when booked.
pub async fn delete_slot(pool: &Pool<Postgres>, user_id: &str, slot_id: Uuid) -> SlotbookResult<()> {
    let mut tx = pool.begin().await.map_err(store_failure)?;

    let slot = sqlx::query_as::<_, DbSlot>(
        r#"
        SELECT s.id, s.form_id, s.date, s.time_start, s.time_end, s.applicant_id, s.created_at
        FROM form_slots s
        JOIN forms f ON f.id = s.form_id
        WHERE s.id = $1 AND f.user_id = $2
        FOR UPDATE OF s
        "#,
    )
    .bind(slot_id)
    .bind(user_id)
    .fetch_optional(&mut *tx)
    .await
    .map_err(store_failure)?
    .ok_or(SlotbookError::SlotNotFound(slot_id))?;

    if let Some(applicant_id) = slot.applicant_id {
        sqlx::query("DELETE FROM applicants WHERE id = $1")
            .bind(applicant_id)
            .execute(&mut *tx)
            .await
            .map_err(store_failure)?;
    }

    sqlx::query("DELETE FROM form_slots WHERE id = $1")
        .bind(slot_id)
        .execute(&mut *tx)
        .await
        .map_err(store_failure)?;

    tx.commit().await.map_err(store_failure)?;

    info!(
        "Slot deleted: id={}, form_id={}, had_applicant={}",
        slot_id,
        slot.form_id,
        slot.applicant_id.is_some()
    );
    Ok(())
}
