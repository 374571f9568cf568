use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_'+\-.]*[A-Za-z0-9_+\-]@([A-Za-z0-9][A-Za-z0-9\-]*\.)+[A-Za-z]{2,}$")
        .expect("email pattern is valid")
});

pub fn is_valid_email(value: &str) -> bool {
    !value.starts_with('.') && !value.contains("..") && EMAIL_PATTERN.is_match(value)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Applicant {
    pub id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub form_id: Uuid,
    pub form_slot_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl Applicant {
    pub fn contact(&self) -> ContactDetails {
        ContactDetails::new(self.email.clone(), self.phone.clone())
    }
}

/// The email / phone pair used to recognise a returning applicant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactDetails {
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl ContactDetails {
    /// Blank strings count as absent.
    pub fn new(email: Option<String>, phone: Option<String>) -> Self {
        Self {
            email: non_blank(email),
            phone: non_blank(phone),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.phone.is_none()
    }

    /// Same email when both sides have one, or same phone when both sides
    /// have one. Two contacts with nothing in common never match.
    pub fn matches(&self, other: &ContactDetails) -> bool {
        let same_email = matches!(
            (&self.email, &other.email),
            (Some(mine), Some(theirs)) if mine == theirs
        );
        let same_phone = matches!(
            (&self.phone, &other.phone),
            (Some(mine), Some(theirs)) if mine == theirs
        );

        same_email || same_phone
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Applicant details as shown to the owning user. Never part of the public
/// form read.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicantResponse {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
}
