use async_trait::async_trait;
use chrono::NaiveDate;
use salon_models::{
    appointment::{AppointmentDetails, AppointmentId, AppointmentStatus, Slot},
    service::ServiceId,
    user::PhoneNumber,
};

use crate::StorageError;

pub struct NewBooking {
    pub name: String,
    pub phone: PhoneNumber,
    pub email: Option<String>,
    pub service_id: ServiceId,
    pub slot: Slot,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct AppointmentFilter {
    pub date: Option<NaiveDate>,
    pub service_id: Option<ServiceId>,
    pub status: Option<AppointmentStatus>,
    pub phone: Option<PhoneNumber>,
}

/// Result of a status update: the row after the write and the status it
/// replaced, both read inside the same transaction.
#[derive(Debug, Clone)]
pub struct StatusChange {
    pub appointment: AppointmentDetails,
    pub previous: AppointmentStatus,
}

#[async_trait]
pub trait AppointmentStorage: Send + Sync {
    /// Resolves the client by phone (creating them if unknown), checks the
    /// service is active and inserts an upcoming appointment. All of it runs in
    /// one transaction; an occupied slot yields `StorageError::Conflict`.
    async fn book(&self, booking: NewBooking) -> Result<AppointmentDetails, StorageError>;

    async fn get(&self, id: AppointmentId) -> Result<Option<AppointmentDetails>, StorageError>;

    /// Ordered by date, then time.
    async fn list(&self, filter: &AppointmentFilter)
    -> Result<Vec<AppointmentDetails>, StorageError>;

    /// Fails with `InvalidTransition` when the current status cannot move to
    /// `status`. Moving back to upcoming re-checks the slot.
    async fn set_status(
        &self,
        id: AppointmentId,
        status: AppointmentStatus,
    ) -> Result<StatusChange, StorageError>;

    /// Fails with `Conflict` when another upcoming appointment holds `slot`.
    async fn reschedule(
        &self,
        id: AppointmentId,
        slot: Slot,
    ) -> Result<AppointmentDetails, StorageError>;
}
