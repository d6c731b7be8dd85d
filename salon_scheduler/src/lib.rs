pub mod delivery;
mod reminder_scheduler;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use salon_models::appointment::{AppointmentId, AppointmentStatus};
use salon_storage::{AppointmentFilter, AppointmentStorage};

pub use delivery::ReminderDeliveryChannel;
pub use reminder_scheduler::AppointmentReminderScheduler;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledReminder {
    pub appointment_id: AppointmentId,
    pub fire_at: NaiveDateTime,
}

/// One pending reminder per appointment, fired at most once.
#[async_trait]
pub trait ReminderScheduler: Send + Sync + 'static {
    /// Replaces any pending reminder for the appointment. Returns `None` when
    /// the appointment is not upcoming or its reminder time has already passed.
    async fn schedule_reminder(
        &self,
        appointment_id: AppointmentId,
    ) -> anyhow::Result<Option<ScheduledReminder>>;

    /// Idempotent.
    async fn cancel_reminder(&self, appointment_id: AppointmentId) -> anyhow::Result<()>;

    async fn reschedule_reminder(
        &self,
        appointment_id: AppointmentId,
    ) -> anyhow::Result<Option<ScheduledReminder>> {
        self.cancel_reminder(appointment_id).await?;
        self.schedule_reminder(appointment_id).await
    }

    async fn pending_reminder(&self, appointment_id: AppointmentId) -> Option<NaiveDateTime>;
}

/// Schedules a reminder for every upcoming appointment. The job table lives in
/// memory, so this runs once on startup.
pub async fn restore_reminders(
    scheduler: &dyn ReminderScheduler,
    storage: &dyn AppointmentStorage,
) -> anyhow::Result<usize> {
    let upcoming = storage
        .list(&AppointmentFilter {
            status: Some(AppointmentStatus::Upcoming),
            ..Default::default()
        })
        .await?;

    let mut restored = 0;
    for appointment in &upcoming {
        match scheduler.schedule_reminder(appointment.id()).await {
            Ok(Some(_)) => restored += 1,
            Ok(None) => {}
            Err(error) => log::warn!(
                "Could not restore reminder. [appointment_id = {}, error = {:#}]",
                appointment.id(),
                error
            ),
        }
    }

    log::info!(
        "Reminders restored. [restored = {}, upcoming = {}]",
        restored,
        upcoming.len()
    );

    Ok(restored)
}
