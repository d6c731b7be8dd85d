mod model;

use async_trait::async_trait;
use chrono::NaiveDate;
use model::{OfferStorageModel, ServiceStorageModel};
use salon_models::{
    offer::{Offer, OfferId},
    service::{Service, ServiceId},
};
use sqlx::SqlitePool;

use crate::{OfferInput, OfferStorage, ServiceInput, ServiceStorage, StorageError};

pub struct SqliteServiceStorage {
    pool: SqlitePool,
}

impl SqliteServiceStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ServiceStorage for SqliteServiceStorage {
    async fn list(&self, include_inactive: bool) -> Result<Vec<Service>, StorageError> {
        let rows = sqlx::query_as::<_, ServiceStorageModel>(
            "SELECT * FROM services WHERE is_active = 1 OR ? ORDER BY created_at ASC, id ASC",
        )
        .bind(include_inactive)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn get(&self, id: ServiceId) -> Result<Option<Service>, StorageError> {
        let row = sqlx::query_as::<_, ServiceStorageModel>("SELECT * FROM services WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Into::into))
    }

    async fn create(&self, service: ServiceInput) -> Result<Service, StorageError> {
        let row = sqlx::query_as::<_, ServiceStorageModel>(
            "INSERT INTO services (name, description, price, duration, image_url, is_active)
             VALUES (?, ?, ?, ?, ?, ?)
             RETURNING *",
        )
        .bind(service.name)
        .bind(service.description)
        .bind(service.price)
        .bind(service.duration)
        .bind(service.image_url)
        .bind(service.is_active)
        .fetch_one(&self.pool)
        .await?;

        log::info!("Service created. [service_id = {}]", row.id);
        Ok(row.into())
    }

    async fn update(&self, id: ServiceId, service: ServiceInput) -> Result<Service, StorageError> {
        let row = sqlx::query_as::<_, ServiceStorageModel>(
            "UPDATE services
             SET name = ?, description = ?, price = ?, duration = ?, image_url = ?, is_active = ?
             WHERE id = ?
             RETURNING *",
        )
        .bind(service.name)
        .bind(service.description)
        .bind(service.price)
        .bind(service.duration)
        .bind(service.image_url)
        .bind(service.is_active)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Into::into)
            .ok_or_else(|| StorageError::not_found("service", id))
    }

    async fn deactivate(&self, id: ServiceId) -> Result<(), StorageError> {
        let result = sqlx::query("UPDATE services SET is_active = 0 WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::not_found("service", id));
        }

        log::info!("Service deactivated. [service_id = {id}]");
        Ok(())
    }
}

pub struct SqliteOfferStorage {
    pool: SqlitePool,
}

impl SqliteOfferStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OfferStorage for SqliteOfferStorage {
    async fn list_visible(&self, today: NaiveDate) -> Result<Vec<Offer>, StorageError> {
        let rows = sqlx::query_as::<_, OfferStorageModel>(
            "SELECT * FROM offers
             WHERE is_active = 1 AND valid_until >= ?
             ORDER BY created_at DESC, id DESC",
        )
        .bind(today)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn list_all(&self) -> Result<Vec<Offer>, StorageError> {
        let rows = sqlx::query_as::<_, OfferStorageModel>(
            "SELECT * FROM offers ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn create(&self, offer: OfferInput) -> Result<Offer, StorageError> {
        let row = sqlx::query_as::<_, OfferStorageModel>(
            "INSERT INTO offers (title, description, discount_percentage, valid_until, terms, is_active)
             VALUES (?, ?, ?, ?, ?, ?)
             RETURNING *",
        )
        .bind(offer.title)
        .bind(offer.description)
        .bind(offer.discount_percentage)
        .bind(offer.valid_until)
        .bind(offer.terms)
        .bind(offer.is_active)
        .fetch_one(&self.pool)
        .await?;

        log::info!("Offer created. [offer_id = {}]", row.id);
        Ok(row.into())
    }

    async fn update(&self, id: OfferId, offer: OfferInput) -> Result<Offer, StorageError> {
        let row = sqlx::query_as::<_, OfferStorageModel>(
            "UPDATE offers
             SET title = ?, description = ?, discount_percentage = ?, valid_until = ?,
                 terms = ?, is_active = ?
             WHERE id = ?
             RETURNING *",
        )
        .bind(offer.title)
        .bind(offer.description)
        .bind(offer.discount_percentage)
        .bind(offer.valid_until)
        .bind(offer.terms)
        .bind(offer.is_active)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Into::into)
            .ok_or_else(|| StorageError::not_found("offer", id))
    }

    async fn deactivate(&self, id: OfferId) -> Result<(), StorageError> {
        let result = sqlx::query("UPDATE offers SET is_active = 0 WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::not_found("offer", id));
        }

        log::info!("Offer deactivated. [offer_id = {id}]");
        Ok(())
    }
}
