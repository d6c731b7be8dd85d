use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use salon_models::{settings::WhatsAppSettings, user::PhoneNumber};
use serde::Serialize;

use crate::{NotificationTransport, TransportError};

#[derive(Debug, Serialize, PartialEq)]
struct TextBody<'a> {
    body: &'a str,
}

#[derive(Debug, Serialize, PartialEq)]
struct TextMessage<'a> {
    messaging_product: &'static str,
    to: &'a str,
    #[serde(rename = "type")]
    kind: &'static str,
    text: TextBody<'a>,
}

impl<'a> TextMessage<'a> {
    fn new(to: &'a PhoneNumber, body: &'a str) -> Self {
        Self {
            messaging_product: "whatsapp",
            to: to.as_str(),
            kind: "text",
            text: TextBody { body },
        }
    }
}

/// WhatsApp Cloud API text messages.
pub struct WhatsAppTransport {
    client: Client,
    messages_url: String,
    access_token: String,
}

impl WhatsAppTransport {
    pub fn new(settings: &WhatsAppSettings, timeout: Duration) -> Result<Self, TransportError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            messages_url: messages_url(&settings.api_url, &settings.phone_number_id),
            access_token: settings.access_token.clone(),
        })
    }
}

fn messages_url(api_url: &str, phone_number_id: &str) -> String {
    format!("{}/{}/messages", api_url.trim_end_matches('/'), phone_number_id)
}

#[async_trait]
impl NotificationTransport for WhatsAppTransport {
    async fn send(&self, to: &PhoneNumber, text: &str) -> Result<(), TransportError> {
        let response = self
            .client
            .post(&self.messages_url)
            .bearer_auth(&self.access_token)
            .json(&TextMessage::new(to, text))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::Api {
                status: status.as_u16(),
                body,
            });
        }

        log::debug!("WhatsApp message accepted. [to = {to}]");
        Ok(())
    }
}
