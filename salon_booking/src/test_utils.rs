use std::sync::{
    Arc, Mutex,
    atomic::{AtomicBool, Ordering},
};

use async_trait::async_trait;
use salon_models::{
    appointment::{AppointmentId, Slot},
    chrono::NaiveDateTime,
    chrono_tz::Tz,
    clock::ManualClock,
    service::ServiceId,
    settings::BusinessSettings,
    user::PhoneNumber,
};
use salon_notify::{NotificationGateway, NotificationTransport, TransportError};
use salon_scheduler::{AppointmentReminderScheduler, ReminderScheduler, ScheduledReminder};
use salon_storage::{
    ServiceInput, ServiceStorage,
    sqlite::{
        appointment_storage::SqliteAppointmentStorage,
        catalog_storage::{SqliteOfferStorage, SqliteServiceStorage},
        connect_in_memory,
        review_storage::SqliteReviewStorage,
    },
};

use crate::{BookingEngine, BookingRequest, Catalog, ReviewModeration};

pub const OWNER_PHONE: &str = "919000000000";

#[derive(Default)]
pub struct RecordingTransport {
    sent: Mutex<Vec<(String, String)>>,
    failing: AtomicBool,
}

impl RecordingTransport {
    pub fn fail(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_to(&self, phone: &str) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter(|(to, _)| to == phone)
            .map(|(_, text)| text)
            .collect()
    }
}

#[async_trait]
impl NotificationTransport for RecordingTransport {
    async fn send(&self, to: &PhoneNumber, text: &str) -> Result<(), TransportError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(TransportError::Api {
                status: 503,
                body: "unavailable".to_owned(),
            });
        }
        self.sent
            .lock()
            .unwrap()
            .push((to.as_str().to_owned(), text.to_owned()));
        Ok(())
    }
}

/// Scheduler whose every call fails.
pub struct BrokenScheduler;

#[async_trait]
impl ReminderScheduler for BrokenScheduler {
    async fn schedule_reminder(
        &self,
        appointment_id: AppointmentId,
    ) -> anyhow::Result<Option<ScheduledReminder>> {
        anyhow::bail!("scheduler offline for {appointment_id}")
    }

    async fn cancel_reminder(&self, appointment_id: AppointmentId) -> anyhow::Result<()> {
        anyhow::bail!("scheduler offline for {appointment_id}")
    }

    async fn pending_reminder(&self, _appointment_id: AppointmentId) -> Option<NaiveDateTime> {
        None
    }
}

pub struct Harness {
    pub engine: BookingEngine,
    pub reviews: ReviewModeration,
    pub catalog: Catalog,
    pub scheduler: Arc<dyn ReminderScheduler>,
    pub transport: Arc<RecordingTransport>,
    pub clock: Arc<ManualClock>,
    pub haircut: ServiceId,
}

pub fn at(date: &str, time: &str) -> NaiveDateTime {
    Slot::parse(date, time).unwrap().starts_at()
}

pub async fn harness() -> Harness {
    build(None).await
}

pub async fn harness_with_scheduler(scheduler: Arc<dyn ReminderScheduler>) -> Harness {
    build(Some(scheduler)).await
}

async fn build(scheduler: Option<Arc<dyn ReminderScheduler>>) -> Harness {
    let pool = connect_in_memory().await.unwrap();
    let clock = Arc::new(ManualClock::new(at("2024-12-20", "10:00")));
    let transport = Arc::new(RecordingTransport::default());

    let gateway = Arc::new(NotificationGateway::new(
        transport.clone(),
        &BusinessSettings {
            name: "Beauty Palace".to_owned(),
            location: "Saswad, Pune".to_owned(),
            owner_phone: "9000000000".to_owned(),
            default_country_code: "91".to_owned(),
            timezone: Tz::Asia__Kolkata,
        },
    ));

    let appointments = Arc::new(SqliteAppointmentStorage::new(pool.clone()));
    let services = Arc::new(SqliteServiceStorage::new(pool.clone()));
    let scheduler: Arc<dyn ReminderScheduler> = match scheduler {
        Some(scheduler) => scheduler,
        None => Arc::new(AppointmentReminderScheduler::new(
            appointments.clone(),
            gateway.clone(),
            clock.clone(),
        )),
    };

    let haircut = services
        .create(ServiceInput {
            name: "Haircut".to_owned(),
            description: "Cut and style".to_owned(),
            price: 800.0,
            duration: 60,
            image_url: None,
            is_active: true,
        })
        .await
        .unwrap()
        .id;

    Harness {
        engine: BookingEngine::new(appointments, scheduler.clone(), gateway.clone()),
        reviews: ReviewModeration::new(Arc::new(SqliteReviewStorage::new(pool.clone())), gateway),
        catalog: Catalog::new(
            services,
            Arc::new(SqliteOfferStorage::new(pool)),
            clock.clone(),
        ),
        scheduler,
        transport,
        clock,
        haircut,
    }
}

impl Harness {
    pub fn booking(&self, phone: &str, date: &str, time: &str) -> BookingRequest {
        BookingRequest {
            name: "Asha".to_owned(),
            phone: phone.to_owned(),
            email: None,
            service_id: self.haircut,
            appointment_date: date.to_owned(),
            appointment_time: time.to_owned(),
            notes: None,
        }
    }
}
