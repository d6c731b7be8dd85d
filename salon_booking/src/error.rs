use salon_models::appointment::AppointmentStatus;
use salon_notify::NotificationError;
use salon_storage::StorageError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BookingError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Cannot change status from {from} to {to}")]
    InvalidTransition {
        from: AppointmentStatus,
        to: AppointmentStatus,
    },

    #[error("Notification could not be delivered: {0}")]
    Delivery(#[source] NotificationError),

    #[error("Storage failure")]
    Persistence(#[source] StorageError),
}

impl BookingError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        BookingError::Validation(message.into())
    }
}

impl From<StorageError> for BookingError {
    fn from(error: StorageError) -> Self {
        match error {
            StorageError::NotFound { entity, id } => {
                BookingError::NotFound(format!("{entity} {id} not found"))
            }
            StorageError::Conflict(message) => BookingError::Conflict(message),
            StorageError::InvalidTransition { from, to } => {
                BookingError::InvalidTransition { from, to }
            }
            other => BookingError::Persistence(other),
        }
    }
}

/// Trimmed, non-empty text or a validation error naming `field`.
pub(crate) fn required(value: &str, field: &str) -> Result<String, BookingError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(BookingError::validation(format!("{field} is required")));
    }
    Ok(value.to_owned())
}

/// `None` for absent or blank text.
pub(crate) fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

/// Logs a swallowed side-effect failure and reports whether it succeeded.
pub(crate) fn best_effort<E: std::fmt::Display>(
    what: &str,
    id: i64,
    result: Result<(), E>,
) -> bool {
    match result {
        Ok(()) => true,
        Err(error) => {
            log::warn!("Side effect failed. [action = {what}, id = {id}, error = {error}]");
            false
        }
    }
}
