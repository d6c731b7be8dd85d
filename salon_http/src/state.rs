use std::sync::Arc;

use salon_booking::{BookingEngine, Catalog, ReviewModeration};
use salon_models::settings::WebhookSettings;
use salon_notify::NotificationGateway;

pub struct AppState {
    pub engine: BookingEngine,
    pub reviews: ReviewModeration,
    pub catalog: Catalog,
    pub gateway: Arc<NotificationGateway>,
    pub webhook: WebhookSettings,
    pub admin_token: String,
}
