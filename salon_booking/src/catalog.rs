use std::sync::Arc;

use salon_models::{
    appointment::DATE_FORMAT,
    chrono::NaiveDate,
    clock::Clock,
    offer::{Offer, OfferId},
    service::{Service, ServiceId},
};
use salon_storage::{OfferInput, OfferStorage, ServiceInput, ServiceStorage};
use serde::Deserialize;

use crate::{
    BookingError,
    error::{optional, required},
};

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    /// Minutes.
    pub duration: i64,
    pub image_url: Option<String>,
    pub is_active: Option<bool>,
}

impl ServiceRequest {
    fn validate(self) -> Result<ServiceInput, BookingError> {
        let name = required(&self.name, "name")?;
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(BookingError::validation("price must not be negative"));
        }
        if self.duration <= 0 {
            return Err(BookingError::validation("duration must be positive"));
        }

        Ok(ServiceInput {
            name,
            description: self.description.trim().to_owned(),
            price: self.price,
            duration: self.duration,
            image_url: optional(self.image_url),
            is_active: self.is_active.unwrap_or(true),
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OfferRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub discount_percentage: f64,
    pub valid_until: String,
    pub terms: Option<String>,
    pub is_active: Option<bool>,
}

impl OfferRequest {
    fn validate(self) -> Result<OfferInput, BookingError> {
        let title = required(&self.title, "title")?;
        if !(self.discount_percentage > 0.0 && self.discount_percentage <= 100.0) {
            return Err(BookingError::validation(
                "discount_percentage must be between 0 and 100",
            ));
        }
        let valid_until = NaiveDate::parse_from_str(self.valid_until.trim(), DATE_FORMAT)
            .map_err(|_| BookingError::validation("valid_until must be YYYY-MM-DD"))?;

        Ok(OfferInput {
            title,
            description: self.description.trim().to_owned(),
            discount_percentage: self.discount_percentage,
            valid_until,
            terms: optional(self.terms),
            is_active: self.is_active.unwrap_or(true),
        })
    }
}

/// Services and offers. Deletion only deactivates.
pub struct Catalog {
    services: Arc<dyn ServiceStorage>,
    offers: Arc<dyn OfferStorage>,
    clock: Arc<dyn Clock>,
}

impl Catalog {
    pub fn new(
        services: Arc<dyn ServiceStorage>,
        offers: Arc<dyn OfferStorage>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            services,
            offers,
            clock,
        }
    }

    pub async fn list_services(&self, include_inactive: bool) -> Result<Vec<Service>, BookingError> {
        Ok(self.services.list(include_inactive).await?)
    }

    pub async fn get_service(&self, id: ServiceId) -> Result<Service, BookingError> {
        self.services
            .get(id)
            .await?
            .ok_or_else(|| BookingError::NotFound(format!("service {id} not found")))
    }

    pub async fn create_service(&self, request: ServiceRequest) -> Result<Service, BookingError> {
        Ok(self.services.create(request.validate()?).await?)
    }

    pub async fn update_service(
        &self,
        id: ServiceId,
        request: ServiceRequest,
    ) -> Result<Service, BookingError> {
        Ok(self.services.update(id, request.validate()?).await?)
    }

    pub async fn deactivate_service(&self, id: ServiceId) -> Result<(), BookingError> {
        Ok(self.services.deactivate(id).await?)
    }

    /// Active offers whose last day is today or later.
    pub async fn list_visible_offers(&self) -> Result<Vec<Offer>, BookingError> {
        Ok(self.offers.list_visible(self.clock.today()).await?)
    }

    pub async fn list_all_offers(&self) -> Result<Vec<Offer>, BookingError> {
        Ok(self.offers.list_all().await?)
    }

    pub async fn create_offer(&self, request: OfferRequest) -> Result<Offer, BookingError> {
        Ok(self.offers.create(request.validate()?).await?)
    }

    pub async fn update_offer(
        &self,
        id: OfferId,
        request: OfferRequest,
    ) -> Result<Offer, BookingError> {
        Ok(self.offers.update(id, request.validate()?).await?)
    }

    pub async fn deactivate_offer(&self, id: OfferId) -> Result<(), BookingError> {
        Ok(self.offers.deactivate(id).await?)
    }
}
