use std::{
    collections::HashMap,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

use async_trait::async_trait;
use chrono::{NaiveDateTime, TimeDelta};
use salon_models::{appointment::AppointmentId, clock::Clock};
use salon_storage::AppointmentStorage;
use tokio::{sync::RwLock, task::JoinHandle};
use tokio_util::sync::CancellationToken;

use crate::{ReminderDeliveryChannel, ReminderScheduler, ScheduledReminder};

struct ReminderHandle {
    generation: u64,
    fire_at: NaiveDateTime,
    cancellation_token: CancellationToken,
    _task: JoinHandle<()>,
}

type ReminderTaskStore = RwLock<HashMap<AppointmentId, ReminderHandle>>;

/// Keeps one timer task per upcoming appointment. Every mutation of the task
/// table happens under its write lock, so a cancel never races a schedule for
/// the same appointment.
pub struct AppointmentReminderScheduler {
    tasks: Arc<ReminderTaskStore>,
    storage: Arc<dyn AppointmentStorage>,
    delivery_channel: Arc<dyn ReminderDeliveryChannel>,
    clock: Arc<dyn Clock>,
    next_generation: AtomicU64,
    shutdown: CancellationToken,
}

impl AppointmentReminderScheduler {
    pub fn new(
        storage: Arc<dyn AppointmentStorage>,
        delivery_channel: Arc<dyn ReminderDeliveryChannel>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            tasks: Arc::new(RwLock::new(HashMap::new())),
            storage,
            delivery_channel,
            clock,
            next_generation: AtomicU64::new(0),
            shutdown: CancellationToken::new(),
        }
    }

    /// Reads the appointment while the table is locked, so a later caller
    /// always schedules from state at least as new as an earlier one.
    async fn schedule_locked(
        &self,
        tasks: &mut HashMap<AppointmentId, ReminderHandle>,
        appointment_id: AppointmentId,
    ) -> anyhow::Result<Option<ScheduledReminder>> {
        let Some(appointment) = self.storage.get(appointment_id).await? else {
            cancel_locked(tasks, appointment_id);
            anyhow::bail!("Appointment {appointment_id} not found");
        };

        let fire_at = appointment.slot().reminder_at();
        let delay = if appointment.is_upcoming() {
            reminder_delay(fire_at, self.clock.now())
        } else {
            None
        };

        if let Some(previous) = tasks.remove(&appointment_id) {
            previous.cancellation_token.cancel();
        }

        let Some(delay) = delay else {
            log::info!(
                "Reminder not scheduled. [appointment_id = {}, fire_at = {}, status = {}]",
                appointment_id,
                fire_at,
                appointment.appointment.status
            );
            return Ok(None);
        };

        let handle = self.spawn_reminder_task(appointment_id, fire_at, delay);
        tasks.insert(appointment_id, handle);

        log::info!("Reminder scheduled. [appointment_id = {appointment_id}, fire_at = {fire_at}]");

        Ok(Some(ScheduledReminder {
            appointment_id,
            fire_at,
        }))
    }

    fn spawn_reminder_task(
        &self,
        appointment_id: AppointmentId,
        fire_at: NaiveDateTime,
        delay: std::time::Duration,
    ) -> ReminderHandle {
        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);
        let cancellation_token = self.shutdown.child_token();

        let reminder = PendingReminder {
            appointment_id,
            fire_at,
            generation,
            cancellation_token: cancellation_token.clone(),
            tasks: Arc::clone(&self.tasks),
            storage: Arc::clone(&self.storage),
            delivery_channel: Arc::clone(&self.delivery_channel),
        };
        let task = tokio::spawn(reminder.run(delay));

        ReminderHandle {
            generation,
            fire_at,
            cancellation_token,
            _task: task,
        }
    }
}

impl Drop for AppointmentReminderScheduler {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

#[async_trait]
impl ReminderScheduler for AppointmentReminderScheduler {
    async fn schedule_reminder(
        &self,
        appointment_id: AppointmentId,
    ) -> anyhow::Result<Option<ScheduledReminder>> {
        let mut tasks = self.tasks.write().await;
        self.schedule_locked(&mut tasks, appointment_id).await
    }

    async fn cancel_reminder(&self, appointment_id: AppointmentId) -> anyhow::Result<()> {
        let mut tasks = self.tasks.write().await;
        cancel_locked(&mut tasks, appointment_id);
        Ok(())
    }

    async fn reschedule_reminder(
        &self,
        appointment_id: AppointmentId,
    ) -> anyhow::Result<Option<ScheduledReminder>> {
        let mut tasks = self.tasks.write().await;
        cancel_locked(&mut tasks, appointment_id);
        self.schedule_locked(&mut tasks, appointment_id).await
    }

    async fn pending_reminder(&self, appointment_id: AppointmentId) -> Option<NaiveDateTime> {
        self.tasks
            .read()
            .await
            .get(&appointment_id)
            .map(|handle| handle.fire_at)
    }
}

fn cancel_locked(
    tasks: &mut HashMap<AppointmentId, ReminderHandle>,
    appointment_id: AppointmentId,
) {
    if let Some(handle) = tasks.remove(&appointment_id) {
        handle.cancellation_token.cancel();
        log::info!(
            "Reminder cancelled. [appointment_id = {}, fire_at = {}]",
            appointment_id,
            handle.fire_at
        );
    }
}

/// Time left until `fire_at`, or `None` unless it is strictly in the future.
pub(crate) fn reminder_delay(
    fire_at: NaiveDateTime,
    now: NaiveDateTime,
) -> Option<std::time::Duration> {
    let delta = fire_at - now;
    if delta <= TimeDelta::zero() {
        return None;
    }

    delta.to_std().ok()
}

struct PendingReminder {
    appointment_id: AppointmentId,
    fire_at: NaiveDateTime,
    generation: u64,
    cancellation_token: CancellationToken,
    tasks: Arc<ReminderTaskStore>,
    storage: Arc<dyn AppointmentStorage>,
    delivery_channel: Arc<dyn ReminderDeliveryChannel>,
}

impl PendingReminder {
    async fn run(self, delay: std::time::Duration) {
        tokio::select! {
            biased;
            _ = self.cancellation_token.cancelled() => return,
            _ = tokio::time::sleep(delay) => {}
        }

        {
            // Cancellation happens under the same lock, so checking here is final.
            let mut tasks = self.tasks.write().await;
            if self.cancellation_token.is_cancelled() {
                return;
            }
            if tasks
                .get(&self.appointment_id)
                .is_some_and(|handle| handle.generation == self.generation)
            {
                tasks.remove(&self.appointment_id);
            }
        }

        self.fire().await;
    }

    async fn fire(&self) {
        let appointment = match self.storage.get(self.appointment_id).await {
            Ok(Some(appointment)) => appointment,
            Ok(None) => {
                log::info!(
                    "Reminder skipped, appointment is gone. [appointment_id = {}]",
                    self.appointment_id
                );
                return;
            }
            Err(error) => {
                log::warn!(
                    "Reminder dropped, could not load appointment. [appointment_id = {}, error = {}]",
                    self.appointment_id,
                    error
                );
                return;
            }
        };

        if !appointment.is_upcoming() || appointment.slot().reminder_at() != self.fire_at {
            log::info!(
                "Reminder skipped, appointment changed. [appointment_id = {}, status = {}, slot = {}]",
                self.appointment_id,
                appointment.appointment.status,
                appointment.slot()
            );
            return;
        }

        match self.delivery_channel.send_reminder(&appointment).await {
            Ok(()) => log::info!(
                "Reminder delivered. [appointment_id = {}, fire_at = {}]",
                self.appointment_id,
                self.fire_at
            ),
            Err(error) => log::warn!(
                "Reminder delivery failed. [appointment_id = {}, error = {:#}]",
                self.appointment_id,
                error
            ),
        }
    }
}
