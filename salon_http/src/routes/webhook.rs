use actix_web::{HttpRequest, HttpResponse, web};
use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;

use crate::{ApiError, AppState};

const SIGNATURE_HEADER: &str = "X-Hub-Signature-256";
const SIGNATURE_PREFIX: &str = "sha256=";

#[derive(Debug, Deserialize)]
struct VerifyQuery {
    #[serde(rename = "hub.mode")]
    mode: Option<String>,
    #[serde(rename = "hub.verify_token")]
    verify_token: Option<String>,
    #[serde(rename = "hub.challenge")]
    challenge: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct WebhookPayload {
    #[serde(default)]
    entry: Vec<Entry>,
}

#[derive(Debug, Default, Deserialize)]
struct Entry {
    #[serde(default)]
    changes: Vec<Change>,
}

#[derive(Debug, Default, Deserialize)]
struct Change {
    #[serde(default)]
    value: ChangeValue,
}

#[derive(Debug, Default, Deserialize)]
struct ChangeValue {
    #[serde(default)]
    messages: Vec<InboundMessage>,
}

#[derive(Debug, Default, Deserialize)]
struct InboundMessage {
    #[serde(default)]
    from: String,
    text: Option<InboundText>,
}

#[derive(Debug, Default, Deserialize)]
struct InboundText {
    #[serde(default)]
    body: String,
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/api/whatsapp/webhook")
            .route(web::get().to(verify))
            .route(web::post().to(receive)),
    );
}

async fn verify(
    state: web::Data<AppState>,
    query: web::Query<VerifyQuery>,
) -> Result<HttpResponse, ApiError> {
    let query = query.into_inner();
    let token_matches = !state.webhook.verify_token.is_empty()
        && query.verify_token.as_deref() == Some(state.webhook.verify_token.as_str());

    match (query.mode.as_deref(), query.challenge) {
        (Some("subscribe"), Some(challenge)) if token_matches => {
            log::info!("Webhook verified.");
            Ok(HttpResponse::Ok().content_type("text/plain").body(challenge))
        }
        _ => {
            log::warn!("Webhook verification failed. [mode = {:?}]", query.mode);
            Err(ApiError::Forbidden)
        }
    }
}

async fn receive(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Bytes,
) -> Result<HttpResponse, ApiError> {
    if let Some(secret) = state.webhook.app_secret.as_deref().filter(|s| !s.is_empty()) {
        let signature = req
            .headers()
            .get(SIGNATURE_HEADER)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();
        if !verify_signature(secret, &body, signature) {
            log::warn!("Rejected webhook with bad signature.");
            return Err(ApiError::Unauthorized);
        }
    }

    let payload: WebhookPayload = serde_json::from_slice(&body)
        .map_err(|e| ApiError::BadRequest(format!("Invalid webhook payload: {e}")))?;

    let messages = payload
        .entry
        .into_iter()
        .flat_map(|entry| entry.changes)
        .flat_map(|change| change.value.messages)
        .filter_map(|message| message.text.map(|text| (message.from, text.body)));

    let mut services = None;
    for (from, text) in messages {
        if from.is_empty() {
            continue;
        }
        log::info!("Inbound message. [from = {}]", from);

        if services.is_none() {
            services = Some(state.catalog.list_services(false).await?);
        }
        let catalog = services.as_deref().unwrap_or_default();

        match state.gateway.send_auto_reply(&from, &text, catalog).await {
            Ok(kind) => log::debug!("Auto-reply sent. [from = {}, kind = {:?}]", from, kind),
            Err(e) => log::warn!("Failed to send auto-reply. [from = {}, error = {}]", from, e),
        }
    }

    Ok(HttpResponse::Ok().content_type("text/plain").body("OK"))
}

/// Checks a `sha256=<hex>` HMAC of `body` keyed with the app secret.
fn verify_signature(secret: &str, body: &[u8], header: &str) -> bool {
    let Some(signature) = header
        .strip_prefix(SIGNATURE_PREFIX)
        .and_then(|hex_digest| hex::decode(hex_digest).ok())
    else {
        return false;
    };
    let Ok(mut mac) = Hmac::<Sha256>::new_from_slice(secret.as_bytes()) else {
        return false;
    };
    mac.update(body);
    mac.verify_slice(&signature).is_ok()
}

#[cfg(test)]
pub(crate) fn sign(secret: &str, body: &[u8]) -> String {
    let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes()).unwrap();
    mac.update(body);
    format!("{SIGNATURE_PREFIX}{}", hex::encode(mac.finalize().into_bytes()))
}
