use async_trait::async_trait;
use salon_models::appointment::AppointmentDetails;

#[async_trait]
pub trait ReminderDeliveryChannel: Send + Sync + 'static {
    async fn send_reminder(&self, appointment: &AppointmentDetails) -> anyhow::Result<()>;
}
