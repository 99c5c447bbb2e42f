use thiserror::Error;

/// Errors surfaced by the booking engine and record store.
///
/// Out-of-range check-in counts are deliberately *not* errors: they are
/// saturated at the track bound (see `record::enforce_invariants`), so a
/// host tapping "+1" one time too many never sees a failure.
#[derive(Debug, Error)]
pub enum RsvpError {
    #[error("invalid {field}: {message}")]
    Validation { field: &'static str, message: String },

    #[error("{field} already exists")]
    Duplicate { field: &'static str },

    #[error("not found")]
    NotFound,

    #[error("event is at capacity and the waitlist is disabled")]
    CapacityExceeded,

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

impl RsvpError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        RsvpError::Validation {
            field,
            message: message.into(),
        }
    }
}
