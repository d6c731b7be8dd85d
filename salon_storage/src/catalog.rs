use async_trait::async_trait;
use chrono::NaiveDate;
use salon_models::{
    offer::{Offer, OfferId},
    service::{Service, ServiceId},
};

use crate::StorageError;

#[derive(Debug, Clone)]
pub struct ServiceInput {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub duration: i64,
    pub image_url: Option<String>,
    pub is_active: bool,
}

#[derive(Debug, Clone)]
pub struct OfferInput {
    pub title: String,
    pub description: String,
    pub discount_percentage: f64,
    pub valid_until: NaiveDate,
    pub terms: Option<String>,
    pub is_active: bool,
}

#[async_trait]
pub trait ServiceStorage: Send + Sync {
    /// Oldest first.
    async fn list(&self, include_inactive: bool) -> Result<Vec<Service>, StorageError>;
    async fn get(&self, id: ServiceId) -> Result<Option<Service>, StorageError>;
    async fn create(&self, service: ServiceInput) -> Result<Service, StorageError>;
    async fn update(&self, id: ServiceId, service: ServiceInput) -> Result<Service, StorageError>;
    async fn deactivate(&self, id: ServiceId) -> Result<(), StorageError>;
}

#[async_trait]
pub trait OfferStorage: Send + Sync {
    /// Active offers still valid on `today`, newest first.
    async fn list_visible(&self, today: NaiveDate) -> Result<Vec<Offer>, StorageError>;
    async fn list_all(&self) -> Result<Vec<Offer>, StorageError>;
    async fn create(&self, offer: OfferInput) -> Result<Offer, StorageError>;
    async fn update(&self, id: OfferId, offer: OfferInput) -> Result<Offer, StorageError>;
    async fn deactivate(&self, id: OfferId) -> Result<(), StorageError>;
}
