use std::collections::HashMap;

use chrono::Utc;
use slotbook_core::{
    errors::{SlotbookError, SlotbookResult},
    models::form::NewForm,
    time_format::format_wall_time,
};
use sqlx::{Pool, Postgres};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    is_unique_violation,
    models::{DbForm, DbFormWithSlots, DbSlot, DbSlotDetail},
    repositories::slot,
    store_failure,
};

const FORM_COLUMNS: &str =
    "id, title, url, start_date, end_date, time_start, time_end, time_duration, user_id, created_at";

/// Creates a form together with its initial slot batch in one transaction.
pub async fn create_form(
    pool: &Pool<Postgres>,
    user_id: &str,
    new_form: &NewForm,
) -> SlotbookResult<DbFormWithSlots<DbSlot>> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    debug!(
        "Creating form: id={}, url={}, user_id={}, slots={}",
        id,
        new_form.url,
        user_id,
        new_form.slots.len()
    );

    let mut tx = pool.begin().await.map_err(store_failure)?;

    let url_taken = sqlx::query_scalar::<_, bool>(
        r#"
        SELECT EXISTS (SELECT 1 FROM forms WHERE url = $1)
        "#,
    )
    .bind(&new_form.url)
    .fetch_one(&mut *tx)
    .await
    .map_err(store_failure)?;

    if url_taken {
        warn!("Rejected form creation, url key taken: {}", new_form.url);
        return Err(SlotbookError::UrlAlreadyExists(new_form.url.clone()));
    }

    let window = &new_form.window;
    let form = sqlx::query_as::<_, DbForm>(&format!(
        r#"
        INSERT INTO forms ({FORM_COLUMNS})
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        RETURNING {FORM_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(&new_form.title)
    .bind(&new_form.url)
    .bind(window.start_date)
    .bind(window.end_date)
    .bind(window.time_start)
    .bind(window.time_end)
    .bind(window.time_duration as i32)
    .bind(user_id)
    .bind(now)
    .fetch_one(&mut *tx)
    .await
    .map_err(|err| {
        // Two creators raced past the existence check.
        if is_unique_violation(&err, "forms_url_key") {
            SlotbookError::UrlAlreadyExists(new_form.url.clone())
        } else {
            store_failure(err)
        }
    })?;

    let mut slots = Vec::with_capacity(new_form.slots.len());
    for new_slot in &new_form.slots {
        let created = slot::insert_slot(&mut *tx, form.id, new_slot)
            .await
            .map_err(|err| {
                if is_unique_violation(&err, "form_slots_schedule_key") {
                    SlotbookError::Validation(format!(
                        "Duplicate slot on {} at {}",
                        new_slot.date,
                        format_wall_time(&new_slot.time_start)
                    ))
                } else {
                    store_failure(err)
                }
            })?;
        slots.push(created);
    }

    tx.commit().await.map_err(store_failure)?;

    info!(
        "Form created: id={}, url={}, slots={}",
        form.id,
        form.url,
        slots.len()
    );

    Ok(DbFormWithSlots { form, slots })
}

/// Public lookup by url key. Slots come back ordered by date and start time.
pub async fn get_form_by_url(
    pool: &Pool<Postgres>,
    url: &str,
) -> SlotbookResult<Option<DbFormWithSlots<DbSlot>>> {
    debug!("Getting form by url: {}", url);

    let form = sqlx::query_as::<_, DbForm>(&format!(
        r#"
        SELECT {FORM_COLUMNS}
        FROM forms
        WHERE url = $1
        "#
    ))
    .bind(url)
    .fetch_optional(pool)
    .await
    .map_err(store_failure)?;

    let Some(form) = form else {
        debug!("Form not found: url={}", url);
        return Ok(None);
    };

    let slots = slot::get_slots_by_form_id(pool, form.id)
        .await
        .map_err(store_failure)?;

    Ok(Some(DbFormWithSlots { form, slots }))
}

/// All forms of one owner, newest first, with applicant details per slot.
pub async fn list_forms_for_owner(
    pool: &Pool<Postgres>,
    user_id: &str,
) -> SlotbookResult<Vec<DbFormWithSlots<DbSlotDetail>>> {
    let forms = sqlx::query_as::<_, DbForm>(&format!(
        r#"
        SELECT {FORM_COLUMNS}
        FROM forms
        WHERE user_id = $1
        ORDER BY created_at DESC
        "#
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await
    .map_err(store_failure)?;

    let form_ids: Vec<Uuid> = forms.iter().map(|form| form.id).collect();
    let details = slot::get_slot_details_by_form_ids(pool, &form_ids)
        .await
        .map_err(store_failure)?;

    let mut by_form: HashMap<Uuid, Vec<DbSlotDetail>> = HashMap::new();
    for detail in details {
        by_form.entry(detail.form_id).or_default().push(detail);
    }

    debug!("Listed {} forms for user_id={}", forms.len(), user_id);

    Ok(forms
        .into_iter()
        .map(|form| {
            let slots = by_form.remove(&form.id).unwrap_or_default();
            DbFormWithSlots { form, slots }
        })
        .collect())
}

/// Renames a form. The title is the only field that changes after creation.
pub async fn update_form_title(
    pool: &Pool<Postgres>,
    user_id: &str,
    form_id: Uuid,
    title: &str,
) -> SlotbookResult<DbForm> {
    let updated = sqlx::query_as::<_, DbForm>(&format!(
        r#"
        UPDATE forms
        SET title = $3
        WHERE id = $1 AND user_id = $2
        RETURNING {FORM_COLUMNS}
        "#
    ))
    .bind(form_id)
    .bind(user_id)
    .bind(title)
    .fetch_optional(pool)
    .await
    .map_err(store_failure)?
    .ok_or_else(|| SlotbookError::FormNotFound(form_id.to_string()))?;

    info!("Form renamed: id={}", form_id);
    Ok(updated)
}

/// Deletes a form with every slot and applicant under it.
///
/// The ownership check takes `FOR NO KEY UPDATE`, which leaves the `KEY SHARE`
/// lock an in-flight booking needs for its applicant insert free. The booking
/// finishes, then the slot delete proceeds; a booking that arrives later finds
/// its slot gone and reports `SlotNotFound`.
pub async fn delete_form(pool: &Pool<Postgres>, user_id: &str, form_id: Uuid) -> SlotbookResult<()> {
    let mut tx = pool.begin().await.map_err(store_failure)?;

    let owned = sqlx::query_scalar::<_, Uuid>(
        r#"
        SELECT id FROM forms
        WHERE id = $1 AND user_id = $2
        FOR NO KEY UPDATE
        "#,
    )
    .bind(form_id)
    .bind(user_id)
    .fetch_optional(&mut *tx)
    .await
    .map_err(store_failure)?;

    if owned.is_none() {
        return Err(SlotbookError::FormNotFound(form_id.to_string()));
    }

    let applicants = sqlx::query("DELETE FROM applicants WHERE form_id = $1")
        .bind(form_id)
        .execute(&mut *tx)
        .await
        .map_err(store_failure)?
        .rows_affected();

    let slots = sqlx::query("DELETE FROM form_slots WHERE form_id = $1")
        .bind(form_id)
        .execute(&mut *tx)
        .await
        .map_err(store_failure)?
        .rows_affected();

    sqlx::query("DELETE FROM forms WHERE id = $1")
        .bind(form_id)
        .execute(&mut *tx)
        .await
        .map_err(store_failure)?;

    tx.commit().await.map_err(store_failure)?;

    info!(
        "Form deleted: id={}, slots={}, applicants={}",
        form_id, slots, applicants
    );
    Ok(())
}
