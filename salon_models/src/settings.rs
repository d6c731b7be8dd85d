use chrono_tz::Tz;
use serde::Deserialize;

#[derive(Deserialize, Debug, Clone)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Deserialize, Debug, Clone)]
pub struct DatabaseSettings {
    pub url: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct BusinessSettings {
    pub name: String,
    pub location: String,
    pub owner_phone: String,
    #[serde(default = "default_country_code")]
    pub default_country_code: String,
    #[serde(default = "default_timezone")]
    pub timezone: Tz,
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    /// Writes messages to the log instead of sending them.
    #[default]
    Log,
    WhatsApp,
}

#[derive(Deserialize, Debug, Clone)]
pub struct WhatsAppSettings {
    #[serde(default = "default_whatsapp_api_url")]
    pub api_url: String,
    pub phone_number_id: String,
    pub access_token: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct NotificationSettings {
    #[serde(default)]
    pub transport: TransportKind,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    pub whatsapp: Option<WhatsAppSettings>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct WebhookSettings {
    pub verify_token: String,
    pub app_secret: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct AdminSettings {
    pub api_token: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub business: BusinessSettings,
    pub notifications: NotificationSettings,
    pub webhook: WebhookSettings,
    pub admin: AdminSettings,
}

fn default_host() -> String {
    "0.0.0.0".to_owned()
}

fn default_port() -> u16 {
    8080
}

fn default_country_code() -> String {
    "91".to_owned()
}

fn default_timezone() -> Tz {
    Tz::Asia__Kolkata
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_whatsapp_api_url() -> String {
    "https://graph.facebook.com/v18.0".to_owned()
}
