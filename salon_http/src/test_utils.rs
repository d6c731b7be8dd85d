use std::sync::{Arc, Mutex};

use actix_web::web;
use async_trait::async_trait;
use salon_booking::{BookingEngine, Catalog, ReviewModeration};
use salon_models::{
    chrono::NaiveDate,
    chrono_tz::Tz,
    clock::ManualClock,
    service::ServiceId,
    settings::{BusinessSettings, WebhookSettings},
    user::PhoneNumber,
};
use salon_notify::{NotificationGateway, NotificationTransport, TransportError};
use salon_scheduler::AppointmentReminderScheduler;
use salon_storage::{
    ServiceInput, ServiceStorage,
    sqlite::{
        appointment_storage::SqliteAppointmentStorage,
        catalog_storage::{SqliteOfferStorage, SqliteServiceStorage},
        connect_in_memory,
        review_storage::SqliteReviewStorage,
    },
};

use crate::AppState;

pub const ADMIN_TOKEN: &str = "secret";
pub const VERIFY_TOKEN: &str = "verify-me";
pub const APP_SECRET: &str = "app-secret";

#[derive(Default)]
pub struct RecordingTransport {
    sent: Mutex<Vec<(String, String)>>,
}

impl RecordingTransport {
    pub fn sent_to(&self, phone: &str) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .filter(|(to, _)| to == phone)
            .map(|(_, text)| text.clone())
            .collect()
    }
}

#[async_trait]
impl NotificationTransport for RecordingTransport {
    async fn send(&self, to: &PhoneNumber, text: &str) -> Result<(), TransportError> {
        self.sent
            .lock()
            .unwrap()
            .push((to.as_str().to_owned(), text.to_owned()));
        Ok(())
    }
}

pub struct TestApp {
    pub state: web::Data<AppState>,
    pub transport: Arc<RecordingTransport>,
    pub haircut: ServiceId,
}

pub async fn test_app(app_secret: Option<&str>) -> TestApp {
    let pool = connect_in_memory().await.unwrap();
    let clock = Arc::new(ManualClock::new(
        NaiveDate::from_ymd_opt(2024, 12, 20)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap(),
    ));
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
    let scheduler = Arc::new(AppointmentReminderScheduler::new(
        appointments.clone(),
        gateway.clone(),
        clock.clone(),
    ));

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

    let state = web::Data::new(AppState {
        engine: BookingEngine::new(appointments, scheduler, gateway.clone()),
        reviews: ReviewModeration::new(
            Arc::new(SqliteReviewStorage::new(pool.clone())),
            gateway.clone(),
        ),
        catalog: Catalog::new(services, Arc::new(SqliteOfferStorage::new(pool)), clock),
        gateway,
        webhook: WebhookSettings {
            verify_token: VERIFY_TOKEN.to_owned(),
            app_secret: app_secret.map(str::to_owned),
        },
        admin_token: ADMIN_TOKEN.to_owned(),
    });

    TestApp {
        state,
        transport,
        haircut,
    }
}

pub fn bearer() -> (&'static str, String) {
    ("Authorization", format!("Bearer {ADMIN_TOKEN}"))
}
