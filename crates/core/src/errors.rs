use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum SlotbookError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Form not found: {0}")]
    FormNotFound(String),

    #[error("Slot not found: {0}")]
    SlotNotFound(Uuid),

    #[error("Slot {0} is already booked")]
    SlotAlreadyBooked(Uuid),

    #[error("An active booking already exists for this contact in this form")]
    DuplicateBooking,

    #[error("Slot {slot_id} does not belong to form {form_id}")]
    SlotFormMismatch { slot_id: Uuid, form_id: Uuid },

    #[error("Url key already exists: {0}")]
    UrlAlreadyExists(String),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Database error: {0}")]
    Database(#[from] eyre::Report),

    #[error("Internal server error: {0}")]
    Internal(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl SlotbookError {
    /// Stable machine-checkable code carried in every error response.
    pub fn reason(&self) -> &'static str {
        match self {
            SlotbookError::Validation(_) => "VALIDATION_ERROR",
            SlotbookError::FormNotFound(_) => "FORM_NOT_FOUND",
            SlotbookError::SlotNotFound(_) => "SLOT_NOT_FOUND",
            SlotbookError::SlotAlreadyBooked(_) => "SLOT_ALREADY_BOOKED",
            SlotbookError::DuplicateBooking => "DUPLICATE_BOOKING",
            SlotbookError::SlotFormMismatch { .. } => "SLOT_FORM_MISMATCH",
            SlotbookError::UrlAlreadyExists(_) => "URL_ALREADY_EXISTS",
            SlotbookError::Authentication(_) => "UNAUTHORIZED",
            SlotbookError::Database(_) => "STORE_FAILURE",
            SlotbookError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn is_server_error(&self) -> bool {
        matches!(self, SlotbookError::Database(_) | SlotbookError::Internal(_))
    }
}

pub type SlotbookResult<T> = Result<T, SlotbookError>;
