use chrono::NaiveDateTime;
use serde::Serialize;

pub type ServiceId = i64;

/// Catalog entry. Never removed, only deactivated, so past appointments keep
/// a valid reference.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Service {
    pub id: ServiceId,
    pub name: String,
    pub description: String,
    pub price: f64,
    /// Minutes.
    pub duration: i64,
    pub image_url: Option<String>,
    pub is_active: bool,
    /// UTC.
    pub created_at: NaiveDateTime,
}
