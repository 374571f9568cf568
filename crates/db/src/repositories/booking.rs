//! # Booking Coordinator
//!
//! Claims one slot for one applicant inside a single PostgreSQL transaction.
//!
//! Guarantees:
//!
//! - at most one applicant per slot: the slot row is read `FOR UPDATE`, so a
//!   concurrent booking of the same slot blocks until this transaction ends
//!   and then sees the committed applicant reference. The final `UPDATE` is
//!   additionally guarded by `applicant_id IS NULL`.
//! - at most one booking per person per form: requests with the same
//!   `(form, name)` take the same transaction-scoped advisory lock, so the
//!   duplicate check of the second one observes the first one's applicant.
//! - no partial state: every failure returns before `commit`, and dropping an
//!   uncommitted `sqlx::Transaction` rolls it back.

use chrono::Utc;
use slotbook_core::{
    errors::{SlotbookError, SlotbookResult},
    models::{
        applicant::{Applicant, ContactDetails},
        booking::{BookSlot, BookingConfirmation},
        slot::Slot,
    },
};
use sqlx::{PgConnection, Pool, Postgres};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    is_unique_violation,
    models::{DbApplicant, DbSlot},
    store_failure,
};

pub async fn book_slot(pool: &Pool<Postgres>, booking: &BookSlot) -> SlotbookResult<BookingConfirmation> {
    debug!(
        "Booking slot: slot_id={}, form_id={}",
        booking.slot_id, booking.form_id
    );

    let mut tx = pool.begin().await.map_err(store_failure)?;

    lock_applicant_identity(&mut tx, booking.form_id, &booking.name).await?;

    let slot: Slot = sqlx::query_as::<_, DbSlot>(
        r#"
        SELECT id, form_id, date, time_start, time_end, applicant_id, created_at
        FROM form_slots
        WHERE id = $1
        FOR UPDATE
        "#,
    )
    .bind(booking.slot_id)
    .fetch_optional(&mut *tx)
    .await
    .map_err(store_failure)?
    .ok_or(SlotbookError::SlotNotFound(booking.slot_id))?
    .into();

    if let Err(err) = slot.ensure_bookable_for(booking.form_id) {
        warn!("Booking rejected: slot_id={}, reason={}", slot.id, err.reason());
        return Err(err);
    }

    if holds_booking_in_form(&mut tx, booking.form_id, &booking.name, &booking.contact).await? {
        warn!(
            "Booking rejected: slot_id={}, reason=DUPLICATE_BOOKING",
            slot.id
        );
        return Err(SlotbookError::DuplicateBooking);
    }

    let applicant: Applicant = insert_applicant(&mut tx, booking).await?.into();

    let updated = sqlx::query(
        r#"
        UPDATE form_slots
        SET applicant_id = $2
        WHERE id = $1 AND applicant_id IS NULL
        "#,
    )
    .bind(slot.id)
    .bind(applicant.id)
    .execute(&mut *tx)
    .await
    .map_err(|err| link_error(err, slot.id))?;

    if updated.rows_affected() != 1 {
        return Err(SlotbookError::SlotAlreadyBooked(slot.id));
    }

    tx.commit().await.map_err(store_failure)?;

    info!(
        "Slot booked: slot_id={}, form_id={}, applicant_id={}",
        slot.id, slot.form_id, applicant.id
    );

    Ok(BookingConfirmation {
        applicant_id: applicant.id,
        form_id: slot.form_id,
        slot_id: slot.id,
        date: slot.date,
        time_start: slot.time_start,
        time_end: slot.time_end,
        booked_at: applicant.created_at,
    })
}

/// Serializes bookings made under the same name within one form until the
/// surrounding transaction ends.
async fn lock_applicant_identity(conn: &mut PgConnection, form_id: Uuid, name: &str) -> SlotbookResult<()> {
    sqlx::query("SELECT pg_advisory_xact_lock(hashtextextended($1, 0))")
        .bind(format!("{}:{}", form_id, name))
        .execute(conn)
        .await
        .map_err(store_failure)?;

    Ok(())
}

/// Whether an applicant with this name and a matching contact already
/// occupies a slot.
async fn holds_booking_in_form(
    conn: &mut PgConnection,
    form_id: Uuid,
    name: &str,
    contact: &ContactDetails,
) -> SlotbookResult<bool> {
    let same_name = sqlx::query_as::<_, DbApplicant>(
        r#"
        SELECT id, name, email, phone, form_id, form_slot_id, created_at
        FROM applicants
        WHERE form_id = $1 AND name = $2
        "#,
    )
    .bind(form_id)
    .bind(name)
    .fetch_all(&mut *conn)
    .await
    .map_err(store_failure)?;

    let matching: Vec<Uuid> = same_name
        .into_iter()
        .map(Applicant::from)
        .filter(|existing| contact.matches(&existing.contact()))
        .map(|existing| existing.id)
        .collect();

    if matching.is_empty() {
        return Ok(false);
    }

    let occupied = sqlx::query_scalar::<_, bool>(
        r#"
        SELECT EXISTS (SELECT 1 FROM form_slots WHERE applicant_id = ANY($1))
        "#,
    )
    .bind(&matching)
    .fetch_one(&mut *conn)
    .await
    .map_err(store_failure)?;

    Ok(occupied)
}

async fn insert_applicant(conn: &mut PgConnection, booking: &BookSlot) -> SlotbookResult<DbApplicant> {
    sqlx::query_as::<_, DbApplicant>(
        r#"
        INSERT INTO applicants (id, name, email, phone, form_id, form_slot_id, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING id, name, email, phone, form_id, form_slot_id, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&booking.name)
    .bind(booking.contact.email.as_deref())
    .bind(booking.contact.phone.as_deref())
    .bind(booking.form_id)
    .bind(booking.slot_id)
    .bind(Utc::now())
    .fetch_one(conn)
    .await
    .map_err(|err| link_error(err, booking.slot_id))
}

fn link_error(err: sqlx::Error, slot_id: Uuid) -> SlotbookError {
    if is_unique_violation(&err, "applicants_form_slot_id_key")
        || is_unique_violation(&err, "form_slots_applicant_id_key")
    {
        SlotbookError::SlotAlreadyBooked(slot_id)
    } else {
        store_failure(err)
    }
}
