mod appsettings;

use std::{sync::Arc, time::Duration};

use actix_web::web;
use anyhow::Context;
use salon_booking::{BookingEngine, Catalog, ReviewModeration};
use salon_http::AppState;
use salon_models::{
    clock::SystemClock,
    settings::{NotificationSettings, TransportKind},
};
use salon_notify::{LogTransport, NotificationGateway, NotificationTransport, WhatsAppTransport};
use salon_scheduler::{AppointmentReminderScheduler, restore_reminders};
use salon_storage::sqlite::{
    appointment_storage::SqliteAppointmentStorage,
    catalog_storage::{SqliteOfferStorage, SqliteServiceStorage},
    connect,
    review_storage::SqliteReviewStorage,
};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    pretty_env_logger::formatted_builder()
        .parse_filters(&std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_owned()))
        .init();

    let settings = appsettings::load().context("Failed to load settings")?;
    let pool = connect(&settings.database.url)
        .await
        .context("Failed to open database")?;

    let transport = build_transport(&settings.notifications)?;
    let gateway = Arc::new(NotificationGateway::new(transport, &settings.business));
    let clock = Arc::new(SystemClock::new(settings.business.timezone));

    let appointments = Arc::new(SqliteAppointmentStorage::new(pool.clone()));
    let scheduler = Arc::new(AppointmentReminderScheduler::new(
        appointments.clone(),
        gateway.clone(),
        clock.clone(),
    ));

    let restored = restore_reminders(scheduler.as_ref(), appointments.as_ref())
        .await
        .context("Failed to restore reminders")?;
    log::info!("Restored reminders. [count = {}]", restored);

    let state = web::Data::new(AppState {
        engine: BookingEngine::new(appointments, scheduler, gateway.clone()),
        reviews: ReviewModeration::new(
            Arc::new(SqliteReviewStorage::new(pool.clone())),
            gateway.clone(),
        ),
        catalog: Catalog::new(
            Arc::new(SqliteServiceStorage::new(pool.clone())),
            Arc::new(SqliteOfferStorage::new(pool)),
            clock,
        ),
        gateway,
        webhook: settings.webhook,
        admin_token: settings.admin.api_token,
    });

    salon_http::serve(state, &settings.server).await?;
    Ok(())
}

fn build_transport(
    settings: &NotificationSettings,
) -> anyhow::Result<Arc<dyn NotificationTransport>> {
    match settings.transport {
        TransportKind::Log => {
            log::warn!("Notifications are only logged, nothing is sent.");
            Ok(Arc::new(LogTransport))
        }
        TransportKind::WhatsApp => {
            let whatsapp = settings
                .whatsapp
                .as_ref()
                .context("notifications.whatsapp must be set for the whatsapp transport")?;
            let transport =
                WhatsAppTransport::new(whatsapp, Duration::from_secs(settings.timeout_secs))?;
            Ok(Arc::new(transport))
        }
    }
}
