use salon_models::{
    chrono::{NaiveDate, NaiveDateTime},
    offer::Offer,
    service::Service,
};

#[derive(Debug, sqlx::FromRow)]
pub struct ServiceStorageModel {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub duration: i64,
    pub image_url: Option<String>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
}

impl From<ServiceStorageModel> for Service {
    fn from(value: ServiceStorageModel) -> Self {
        Self {
            id: value.id,
            name: value.name,
            description: value.description,
            price: value.price,
            duration: value.duration,
            image_url: value.image_url,
            is_active: value.is_active,
            created_at: value.created_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
pub struct OfferStorageModel {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub discount_percentage: f64,
    pub valid_until: NaiveDate,
    pub terms: Option<String>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
}

impl From<OfferStorageModel> for Offer {
    fn from(value: OfferStorageModel) -> Self {
        Self {
            id: value.id,
            title: value.title,
            description: value.description,
            discount_percentage: value.discount_percentage,
            valid_until: value.valid_until,
            terms: value.terms,
            is_active: value.is_active,
            created_at: value.created_at,
        }
    }
}
