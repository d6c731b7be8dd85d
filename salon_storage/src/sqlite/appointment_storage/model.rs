use salon_models::{
    appointment::{Appointment, AppointmentDetails, Slot},
    chrono::{NaiveDate, NaiveDateTime, NaiveTime},
    user::PhoneNumber,
};

use crate::StorageError;

#[derive(Debug, sqlx::FromRow)]
pub struct AppointmentStorageModel {
    pub id: i64,
    pub user_id: i64,
    pub service_id: i64,
    pub appointment_date: NaiveDate,
    pub appointment_time: NaiveTime,
    pub status: String,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
    pub user_name: String,
    pub user_phone: Option<String>,
    pub service_name: String,
    pub service_duration: i64,
}

impl TryFrom<AppointmentStorageModel> for AppointmentDetails {
    type Error = StorageError;

    fn try_from(value: AppointmentStorageModel) -> Result<Self, Self::Error> {
        let status = value.status.parse().map_err(|_| {
            StorageError::Corrupted(format!(
                "appointment {} has status {:?}",
                value.id, value.status
            ))
        })?;

        Ok(Self {
            appointment: Appointment {
                id: value.id,
                user_id: value.user_id,
                service_id: value.service_id,
                slot: Slot::new(value.appointment_date, value.appointment_time),
                status,
                notes: value.notes,
                created_at: value.created_at,
            },
            user_name: value.user_name,
            user_phone: value.user_phone.map(PhoneNumber::from_normalized),
            service_name: value.service_name,
            service_duration: value.service_duration,
        })
    }
}
