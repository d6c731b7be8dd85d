use async_trait::async_trait;
use salon_models::user::PhoneNumber;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Messaging API returned {status}: {body}")]
    Api { status: u16, body: String },
}

/// Delivers already rendered text to a normalized phone number.
#[async_trait]
pub trait NotificationTransport: Send + Sync + 'static {
    async fn send(&self, to: &PhoneNumber, text: &str) -> Result<(), TransportError>;
}
