use std::sync::Arc;

use salon_models::{
    appointment::{AppointmentDetails, AppointmentId, AppointmentStatus, DATE_FORMAT, Slot},
    chrono::NaiveDate,
    service::ServiceId,
};
use salon_notify::NotificationGateway;
use salon_scheduler::ReminderScheduler;
use salon_storage::{AppointmentFilter, AppointmentStorage, NewBooking, StatusChange};
use serde::{Deserialize, Serialize};

use crate::{
    BookingError,
    error::{best_effort, optional, required},
};

#[derive(Debug, Clone, Deserialize)]
pub struct BookingRequest {
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub service_id: ServiceId,
    pub appointment_date: String,
    pub appointment_time: String,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppointmentQuery {
    pub date: Option<String>,
    pub service_id: Option<ServiceId>,
    /// Defaults to `upcoming`; `all` disables the filter.
    pub status: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: String,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RescheduleRequest {
    pub appointment_date: String,
    pub appointment_time: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BookingNotifications {
    pub client_notified: bool,
    pub owner_notified: bool,
    pub reminder_scheduled: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct BookingOutcome {
    pub appointment: AppointmentDetails,
    pub notifications: BookingNotifications,
}

/// Result of a status change or reschedule. `None` marks a side effect that
/// was not attempted.
#[derive(Debug, Clone, Serialize)]
pub struct AppointmentUpdate {
    pub appointment: AppointmentDetails,
    pub client_notified: Option<bool>,
    pub reminder_scheduled: Option<bool>,
}

/// Appointment lifecycle. Persists first, then triggers reminders and
/// notifications; those never undo a committed change.
pub struct BookingEngine {
    storage: Arc<dyn AppointmentStorage>,
    scheduler: Arc<dyn ReminderScheduler>,
    gateway: Arc<NotificationGateway>,
}

impl BookingEngine {
    pub fn new(
        storage: Arc<dyn AppointmentStorage>,
        scheduler: Arc<dyn ReminderScheduler>,
        gateway: Arc<NotificationGateway>,
    ) -> Self {
        Self {
            storage,
            scheduler,
            gateway,
        }
    }

    pub async fn create(&self, request: BookingRequest) -> Result<BookingOutcome, BookingError> {
        let name = required(&request.name, "name")?;
        let phone = self
            .gateway
            .normalize_phone(&request.phone)
            .ok_or_else(|| BookingError::validation("phone is required"))?;
        let slot = parse_slot(&request.appointment_date, &request.appointment_time)?;

        let appointment = self
            .storage
            .book(NewBooking {
                name,
                phone,
                email: optional(request.email),
                service_id: request.service_id,
                slot,
                notes: optional(request.notes),
            })
            .await?;
        let id = appointment.id();

        let client_notified = best_effort(
            "booking_confirmation",
            id,
            self.gateway.send_booking_confirmation(&appointment).await,
        );
        let owner_notified = best_effort(
            "owner_alert",
            id,
            self.gateway.send_owner_alert(&appointment).await,
        );
        let reminder_scheduled = self.schedule_reminder(id).await;

        Ok(BookingOutcome {
            appointment,
            notifications: BookingNotifications {
                client_notified,
                owner_notified,
                reminder_scheduled,
            },
        })
    }

    pub async fn get(&self, id: AppointmentId) -> Result<AppointmentDetails, BookingError> {
        self.storage
            .get(id)
            .await?
            .ok_or_else(|| not_found(id))
    }

    pub async fn list(
        &self,
        query: AppointmentQuery,
    ) -> Result<Vec<AppointmentDetails>, BookingError> {
        let date = query
            .date
            .as_deref()
            .map(|d| {
                NaiveDate::parse_from_str(d.trim(), DATE_FORMAT)
                    .map_err(|_| BookingError::validation("date must be YYYY-MM-DD"))
            })
            .transpose()?;

        let status = match query.status.as_deref().map(str::trim) {
            None | Some("") => Some(AppointmentStatus::Upcoming),
            Some("all") => None,
            Some(status) => Some(parse_status(status)?),
        };

        let phone = match optional(query.phone) {
            Some(raw) => Some(
                self.gateway
                    .normalize_phone(&raw)
                    .ok_or_else(|| BookingError::validation("Invalid phone number"))?,
            ),
            None => None,
        };

        let filter = AppointmentFilter {
            date,
            service_id: query.service_id,
            status,
            phone,
        };

        Ok(self.storage.list(&filter).await?)
    }

    pub async fn update_status(
        &self,
        id: AppointmentId,
        request: StatusUpdateRequest,
    ) -> Result<AppointmentUpdate, BookingError> {
        let next = parse_status(&request.status)?;
        let StatusChange {
            appointment,
            previous,
        } = self.storage.set_status(id, next).await?;
        log::info!(
            "Appointment status changed. [appointment_id = {id}, from = {previous}, to = {next}]"
        );

        let mut update = AppointmentUpdate {
            appointment,
            client_notified: None,
            reminder_scheduled: None,
        };

        match (previous, next) {
            (from, AppointmentStatus::Cancelled) if from != AppointmentStatus::Cancelled => {
                self.cancel_reminder(id).await;
                let reason = optional(request.reason);
                update.client_notified = Some(best_effort(
                    "cancellation",
                    id,
                    self.gateway
                        .send_cancellation(&update.appointment, reason.as_deref())
                        .await,
                ));
            }
            (AppointmentStatus::Cancelled, AppointmentStatus::Upcoming) => {
                update.reminder_scheduled = Some(self.reschedule_reminder(id).await);
            }
            (AppointmentStatus::Upcoming, AppointmentStatus::Completed) => {
                self.cancel_reminder(id).await;
            }
            _ => {}
        }

        Ok(update)
    }

    pub async fn reschedule(
        &self,
        id: AppointmentId,
        request: RescheduleRequest,
    ) -> Result<AppointmentUpdate, BookingError> {
        let slot = parse_slot(&request.appointment_date, &request.appointment_time)?;
        let current = self.get(id).await?;
        if current.appointment.status == AppointmentStatus::Completed {
            return Err(BookingError::validation(
                "Completed appointments cannot be rescheduled",
            ));
        }

        let previous = current.slot();
        let appointment = self.storage.reschedule(id, slot).await?;
        log::info!("Appointment rescheduled. [appointment_id = {id}, from = {previous}, to = {slot}]");

        let reminder_scheduled = self.reschedule_reminder(id).await;
        let client_notified = best_effort(
            "reschedule",
            id,
            self.gateway.send_reschedule(&appointment, previous).await,
        );

        Ok(AppointmentUpdate {
            appointment,
            client_notified: Some(client_notified),
            reminder_scheduled: Some(reminder_scheduled),
        })
    }

    /// Sends the reminder now, outside the scheduler. Unlike other
    /// notifications a failure here is the caller's error.
    pub async fn send_manual_reminder(&self, id: AppointmentId) -> Result<(), BookingError> {
        let appointment = self.get(id).await?;
        if !appointment.is_upcoming() {
            return Err(BookingError::validation(
                "Can only send reminders for upcoming appointments",
            ));
        }

        self.gateway
            .send_appointment_reminder(&appointment)
            .await
            .map_err(BookingError::Delivery)
    }

    async fn schedule_reminder(&self, id: AppointmentId) -> bool {
        match self.scheduler.schedule_reminder(id).await {
            Ok(scheduled) => scheduled.is_some(),
            Err(error) => {
                log::warn!("Reminder not scheduled. [appointment_id = {id}, error = {error:#}]");
                false
            }
        }
    }

    async fn reschedule_reminder(&self, id: AppointmentId) -> bool {
        match self.scheduler.reschedule_reminder(id).await {
            Ok(scheduled) => scheduled.is_some(),
            Err(error) => {
                log::warn!("Reminder not rescheduled. [appointment_id = {id}, error = {error:#}]");
                false
            }
        }
    }

    async fn cancel_reminder(&self, id: AppointmentId) {
        if let Err(error) = self.scheduler.cancel_reminder(id).await {
            log::warn!("Reminder not cancelled. [appointment_id = {id}, error = {error:#}]");
        }
    }
}

fn parse_slot(date: &str, time: &str) -> Result<Slot, BookingError> {
    let date = required(date, "appointment_date")?;
    let time = required(time, "appointment_time")?;
    Slot::parse(&date, &time).map_err(|e| BookingError::validation(e.to_string()))
}

fn parse_status(status: &str) -> Result<AppointmentStatus, BookingError> {
    status
        .trim()
        .parse()
        .map_err(|_| BookingError::validation("Invalid status"))
}

fn not_found(id: AppointmentId) -> BookingError {
    BookingError::NotFound(format!("appointment {id} not found"))
}

#[cfg(test)]
mod tests;
