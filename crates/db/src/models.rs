use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use slotbook_core::models::{
    applicant::{Applicant, ApplicantResponse},
    form::{
        Form, FormResponse, OwnerFormResponse, OwnerSlotResponse, PublicFormResponse,
        PublicSlotResponse, ScheduleWindow,
    },
    slot::Slot,
};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct DbForm {
    pub id: Uuid,
    pub title: String,
    pub url: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub time_start: NaiveTime,
    pub time_end: NaiveTime,
    pub time_duration: i32,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct DbSlot {
    pub id: Uuid,
    pub form_id: Uuid,
    pub date: NaiveDate,
    pub time_start: NaiveTime,
    pub time_end: NaiveTime,
    pub applicant_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct DbApplicant {
    pub id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub form_id: Uuid,
    pub form_slot_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// A slot joined with its applicant, if any. Owner views only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct DbSlotDetail {
    pub id: Uuid,
    pub form_id: Uuid,
    pub date: NaiveDate,
    pub time_start: NaiveTime,
    pub time_end: NaiveTime,
    pub applicant_id: Option<Uuid>,
    pub applicant_name: Option<String>,
    pub applicant_email: Option<String>,
    pub applicant_phone: Option<String>,
    pub applicant_created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbFormWithSlots<S> {
    pub form: DbForm,
    pub slots: Vec<S>,
}

impl From<DbForm> for Form {
    fn from(row: DbForm) -> Self {
        Self {
            id: row.id,
            title: row.title,
            url: row.url,
            window: ScheduleWindow {
                start_date: row.start_date,
                end_date: row.end_date,
                time_start: row.time_start,
                time_end: row.time_end,
                time_duration: row.time_duration.unsigned_abs(),
            },
            user_id: row.user_id,
            created_at: row.created_at,
        }
    }
}

impl From<DbSlot> for Slot {
    fn from(row: DbSlot) -> Self {
        Self {
            id: row.id,
            form_id: row.form_id,
            date: row.date,
            time_start: row.time_start,
            time_end: row.time_end,
            applicant_id: row.applicant_id,
            created_at: row.created_at,
        }
    }
}

impl From<DbApplicant> for Applicant {
    fn from(row: DbApplicant) -> Self {
        Self {
            id: row.id,
            name: row.name,
            email: row.email,
            phone: row.phone,
            form_id: row.form_id,
            form_slot_id: row.form_slot_id,
            created_at: row.created_at,
        }
    }
}

impl From<DbSlot> for PublicSlotResponse {
    fn from(row: DbSlot) -> Self {
        Self {
            id: row.id,
            date: row.date,
            time_start: row.time_start,
            time_end: row.time_end,
            is_booked: row.applicant_id.is_some(),
        }
    }
}

impl From<DbSlotDetail> for OwnerSlotResponse {
    fn from(row: DbSlotDetail) -> Self {
        let applicant = match (row.applicant_name, row.applicant_created_at) {
            (Some(name), Some(created_at)) => Some(ApplicantResponse {
                name,
                email: row.applicant_email,
                phone: row.applicant_phone,
                created_at,
            }),
            _ => None,
        };

        Self {
            id: row.id,
            date: row.date,
            time_start: row.time_start,
            time_end: row.time_end,
            applicant,
        }
    }
}

impl From<DbFormWithSlots<DbSlot>> for PublicFormResponse {
    fn from(value: DbFormWithSlots<DbSlot>) -> Self {
        Self {
            form: FormResponse::from(&Form::from(value.form)),
            slots: value.slots.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<DbFormWithSlots<DbSlotDetail>> for OwnerFormResponse {
    fn from(value: DbFormWithSlots<DbSlotDetail>) -> Self {
        Self {
            form: FormResponse::from(&Form::from(value.form)),
            slots: value.slots.into_iter().map(Into::into).collect(),
        }
    }
}
