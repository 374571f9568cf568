pub mod applicant;
pub mod booking;
pub mod form;
pub mod slot;

use serde::{Deserialize, Serialize};

/// Generic acknowledgement body for owner-side mutations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}
