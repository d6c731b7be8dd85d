use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

pub type OfferId = i64;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Offer {
    pub id: OfferId,
    pub title: String,
    pub description: String,
    pub discount_percentage: f64,
    pub valid_until: NaiveDate,
    pub terms: Option<String>,
    pub is_active: bool,
    /// UTC.
    pub created_at: NaiveDateTime,
}

impl Offer {
    pub fn is_visible_on(&self, today: NaiveDate) -> bool {
        self.is_active && self.valid_until >= today
    }
}
