use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    errors::{SlotbookError, SlotbookResult},
    time_format::hhmm,
};

/// Lifecycle of a slot. `Booked` is terminal; an owner may delete a slot in
/// either state but nothing returns a booked slot to `Available`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotState {
    Available,
    Booked,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slot {
    pub id: Uuid,
    pub form_id: Uuid,
    pub date: NaiveDate,
    #[serde(with = "hhmm")]
    pub time_start: NaiveTime,
    #[serde(with = "hhmm")]
    pub time_end: NaiveTime,
    pub applicant_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl Slot {
    pub fn state(&self) -> SlotState {
        match self.applicant_id {
            Some(_) => SlotState::Booked,
            None => SlotState::Available,
        }
    }

    pub fn is_booked(&self) -> bool {
        self.state() == SlotState::Booked
    }

    /// Checks a freshly locked slot before a booking is written.
    ///
    /// The booked check runs before the ownership check, so a booked slot
    /// reports `SlotAlreadyBooked` whichever form id the caller supplied.
    pub fn ensure_bookable_for(&self, form_id: Uuid) -> SlotbookResult<()> {
        if self.is_booked() {
            return Err(SlotbookError::SlotAlreadyBooked(self.id));
        }

        if self.form_id != form_id {
            return Err(SlotbookError::SlotFormMismatch {
                slot_id: self.id,
                form_id,
            });
        }

        Ok(())
    }
}
