use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    errors::{SlotbookError, SlotbookResult},
    models::applicant::{ContactDetails, is_valid_email},
    time_format::hhmm,
};

pub const MIN_NAME_CHARS: usize = 2;
pub const MIN_PHONE_CHARS: usize = 5;

/// Public booking request as received at the edge.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookSlotRequest {
    pub form_id: Uuid,
    pub slot_id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl BookSlotRequest {
    /// Request-shape checks. These do not depend on stored state and run
    /// before any transaction is opened.
    pub fn validate(self) -> SlotbookResult<BookSlot> {
        let name = self.name.trim().to_string();
        if name.chars().count() < MIN_NAME_CHARS {
            return Err(SlotbookError::Validation(format!(
                "Name must be at least {} characters",
                MIN_NAME_CHARS
            )));
        }

        let contact = ContactDetails::new(self.email, self.phone);
        if contact.is_empty() {
            return Err(SlotbookError::Validation(
                "Either an email address or a phone number is required".to_string(),
            ));
        }

        if let Some(email) = &contact.email {
            if !is_valid_email(email) {
                return Err(SlotbookError::Validation(format!(
                    "Invalid email address: {}",
                    email
                )));
            }
        }

        if let Some(phone) = &contact.phone {
            if phone.chars().count() < MIN_PHONE_CHARS {
                return Err(SlotbookError::Validation(format!(
                    "Phone number must be at least {} characters",
                    MIN_PHONE_CHARS
                )));
            }
        }

        Ok(BookSlot {
            form_id: self.form_id,
            slot_id: self.slot_id,
            name,
            contact,
        })
    }
}

/// A validated booking, ready for the coordinator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookSlot {
    pub form_id: Uuid,
    pub slot_id: Uuid,
    pub name: String,
    pub contact: ContactDetails,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingConfirmation {
    pub applicant_id: Uuid,
    pub form_id: Uuid,
    pub slot_id: Uuid,
    pub date: NaiveDate,
    #[serde(with = "hhmm")]
    pub time_start: NaiveTime,
    #[serde(with = "hhmm")]
    pub time_end: NaiveTime,
    pub booked_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookSlotResponse {
    pub success: bool,
    pub message: String,
    pub booking: BookingConfirmation,
}
