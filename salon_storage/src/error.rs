use salon_models::appointment::AppointmentStatus;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    #[error("{0}")]
    Conflict(String),

    #[error("Cannot change status from {from} to {to}")]
    InvalidTransition {
        from: AppointmentStatus,
        to: AppointmentStatus,
    },

    #[error("Stored row is invalid: {0}")]
    Corrupted(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),

    #[error(transparent)]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

impl StorageError {
    pub(crate) fn not_found(entity: &'static str, id: i64) -> Self {
        StorageError::NotFound { entity, id }
    }

    pub(crate) fn slot_taken() -> Self {
        StorageError::Conflict("Time slot already booked".to_owned())
    }
}

/// Maps a unique-index violation on the upcoming-slot index to `Conflict`.
pub(crate) fn map_slot_violation(error: sqlx::Error) -> StorageError {
    match &error {
        sqlx::Error::Database(db) if db.is_unique_violation() => StorageError::slot_taken(),
        _ => StorageError::Sqlx(error),
    }
}
