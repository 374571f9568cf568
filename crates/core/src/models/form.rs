use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use rand::{Rng, distributions::Alphanumeric};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    errors::{SlotbookError, SlotbookResult},
    models::applicant::ApplicantResponse,
    slot_generator::{GeneratedSlot, generate_slots},
    time_format::{format_wall_time, hhmm},
};

pub const URL_KEY_LENGTH: usize = 12;
pub const MIN_URL_KEY_CHARS: usize = 6;
pub const MIN_TITLE_CHARS: usize = 3;
pub const MAX_DURATION_MINUTES: u32 = 24 * 60;

/// Random public url key for a new form.
pub fn generate_url_key() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(URL_KEY_LENGTH)
        .map(char::from)
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Form {
    pub id: Uuid,
    pub title: String,
    pub url: String,
    pub window: ScheduleWindow,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
}

/// Date range, daily time window and slot length of a form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleWindow {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(with = "hhmm")]
    pub time_start: NaiveTime,
    #[serde(with = "hhmm")]
    pub time_end: NaiveTime,
    pub time_duration: u32,
}

impl ScheduleWindow {
    pub fn validate(&self) -> SlotbookResult<()> {
        if self.end_date < self.start_date {
            return Err(SlotbookError::Validation(
                "End date must not be before start date".to_string(),
            ));
        }

        if self.start_date == self.end_date && self.time_end <= self.time_start {
            return Err(SlotbookError::Validation(
                "End time must be after start time on a single-day form".to_string(),
            ));
        }

        if self.time_duration == 0 || self.time_duration > MAX_DURATION_MINUTES {
            return Err(SlotbookError::Validation(format!(
                "Slot duration must be between 1 and {} minutes",
                MAX_DURATION_MINUTES
            )));
        }

        Ok(())
    }

    pub fn slots(&self) -> Vec<GeneratedSlot> {
        generate_slots(
            self.start_date,
            self.end_date,
            self.time_start,
            self.time_end,
            self.time_duration,
        )
    }

    pub fn contains_date(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }

    /// A slot must lie inside the date range and the daily window, and last
    /// exactly `time_duration` minutes.
    pub fn validate_slot(&self, slot: &CreateSlotRequest) -> SlotbookResult<()> {
        if slot.time_end <= slot.time_start {
            return Err(SlotbookError::Validation(format!(
                "Slot on {} must end after it starts",
                slot.date
            )));
        }

        if !self.contains_date(slot.date) {
            return Err(SlotbookError::Validation(format!(
                "Slot date {} is outside the form's date range",
                slot.date
            )));
        }

        if slot.time_start < self.time_start || slot.time_end > self.time_end {
            return Err(SlotbookError::Validation(format!(
                "Slot {} {}-{} is outside the daily window {}-{}",
                slot.date,
                format_wall_time(&slot.time_start),
                format_wall_time(&slot.time_end),
                format_wall_time(&self.time_start),
                format_wall_time(&self.time_end)
            )));
        }

        if slot.time_end - slot.time_start != Duration::minutes(i64::from(self.time_duration)) {
            return Err(SlotbookError::Validation(format!(
                "Slot {} {} must last {} minutes",
                slot.date,
                format_wall_time(&slot.time_start),
                self.time_duration
            )));
        }

        Ok(())
    }
}

/// Rejects duplicate or overlapping slots within one batch.
fn ensure_no_overlap(slots: &[CreateSlotRequest]) -> SlotbookResult<()> {
    let mut ordered: Vec<&CreateSlotRequest> = slots.iter().collect();
    ordered.sort_by_key(|slot| (slot.date, slot.time_start));

    for pair in ordered.windows(2) {
        let (earlier, later) = (pair[0], pair[1]);
        if earlier.date == later.date && earlier.time_end > later.time_start {
            return Err(SlotbookError::Validation(format!(
                "Slots on {} at {} and {} overlap",
                later.date,
                format_wall_time(&earlier.time_start),
                format_wall_time(&later.time_start)
            )));
        }
    }

    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFormRequest {
    pub title: String,
    /// Public url key; generated server-side when omitted.
    pub url: Option<String>,
    #[serde(flatten)]
    pub window: ScheduleWindow,
    #[serde(default)]
    pub slots: Vec<CreateSlotRequest>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSlotRequest {
    pub date: NaiveDate,
    #[serde(with = "hhmm")]
    pub time_start: NaiveTime,
    #[serde(with = "hhmm")]
    pub time_end: NaiveTime,
}

impl From<GeneratedSlot> for CreateSlotRequest {
    fn from(slot: GeneratedSlot) -> Self {
        Self {
            date: slot.date,
            time_start: slot.time_start,
            time_end: slot.time_end,
        }
    }
}

/// A validated form definition with its initial slot batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewForm {
    pub title: String,
    pub url: String,
    pub window: ScheduleWindow,
    pub slots: Vec<CreateSlotRequest>,
}

impl CreateFormRequest {
    pub fn validate(self) -> SlotbookResult<NewForm> {
        let title = self.title.trim().to_string();
        if title.is_empty() {
            return Err(SlotbookError::Validation("Title is required".to_string()));
        }

        let url = match self.url.map(|u| u.trim().to_string()) {
            Some(url) => {
                validate_url_key(&url)?;
                url
            }
            None => generate_url_key(),
        };

        self.window.validate()?;

        for slot in &self.slots {
            self.window.validate_slot(slot)?;
        }
        ensure_no_overlap(&self.slots)?;

        Ok(NewForm {
            title,
            url,
            window: self.window,
            slots: self.slots,
        })
    }
}

fn validate_url_key(url: &str) -> SlotbookResult<()> {
    if url.chars().count() < MIN_URL_KEY_CHARS {
        return Err(SlotbookError::Validation(format!(
            "Url key must be at least {} characters",
            MIN_URL_KEY_CHARS
        )));
    }

    if !url
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(SlotbookError::Validation(
            "Url key may only contain letters, digits, '-' and '_'".to_string(),
        ));
    }

    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFormTitleRequest {
    pub title: String,
}

impl UpdateFormTitleRequest {
    pub fn validate(self) -> SlotbookResult<String> {
        let title = self.title.trim().to_string();
        if title.chars().count() < MIN_TITLE_CHARS {
            return Err(SlotbookError::Validation(format!(
                "Title must be at least {} characters",
                MIN_TITLE_CHARS
            )));
        }
        Ok(title)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormDates {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormTimes {
    #[serde(with = "hhmm")]
    pub time_start: NaiveTime,
    #[serde(with = "hhmm")]
    pub time_end: NaiveTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormResponse {
    pub id: Uuid,
    pub title: String,
    pub url: String,
    pub dates: FormDates,
    pub times: FormTimes,
    pub time_duration: u32,
    pub created_at: DateTime<Utc>,
}

impl From<&Form> for FormResponse {
    fn from(form: &Form) -> Self {
        Self {
            id: form.id,
            title: form.title.clone(),
            url: form.url.clone(),
            dates: FormDates {
                start_date: form.window.start_date,
                end_date: form.window.end_date,
            },
            times: FormTimes {
                time_start: form.window.time_start,
                time_end: form.window.time_end,
            },
            time_duration: form.window.time_duration,
            created_at: form.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFormResponse {
    pub success: bool,
    pub form: FormResponse,
    pub slot_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFormResponse {
    pub success: bool,
    pub form: FormResponse,
}

/// Public view of a form. Slots only say whether they are taken.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicFormResponse {
    #[serde(flatten)]
    pub form: FormResponse,
    pub slots: Vec<PublicSlotResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicSlotResponse {
    pub id: Uuid,
    pub date: NaiveDate,
    #[serde(with = "hhmm")]
    pub time_start: NaiveTime,
    #[serde(with = "hhmm")]
    pub time_end: NaiveTime,
    pub is_booked: bool,
}

/// Owner dashboard view of a form, including who booked what.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerFormResponse {
    #[serde(flatten)]
    pub form: FormResponse,
    pub slots: Vec<OwnerSlotResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerSlotResponse {
    pub id: Uuid,
    pub date: NaiveDate,
    #[serde(with = "hhmm")]
    pub time_start: NaiveTime,
    #[serde(with = "hhmm")]
    pub time_end: NaiveTime,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub applicant: Option<ApplicantResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewSlotsResponse {
    pub count: usize,
    pub slots: Vec<GeneratedSlot>,
}
