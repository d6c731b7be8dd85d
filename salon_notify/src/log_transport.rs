use async_trait::async_trait;
use salon_models::user::PhoneNumber;

use crate::{NotificationTransport, TransportError};

/// Writes messages to the log instead of sending them.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogTransport;

#[async_trait]
impl NotificationTransport for LogTransport {
    async fn send(&self, to: &PhoneNumber, text: &str) -> Result<(), TransportError> {
        log::info!("Message not sent, logging transport. [to = {to}]\n{text}");
        Ok(())
    }
}
