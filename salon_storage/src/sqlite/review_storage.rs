mod model;

use std::collections::HashMap;

use async_trait::async_trait;
use model::{ReviewImageStorageModel, ReviewStorageModel};
use salon_models::review::{ReviewDetails, ReviewId, ReviewImage, ReviewStatus};
use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};

use super::user_storage;
use crate::{NewReview, ReviewStorage, StorageError};

const SELECT_DETAILS: &str = "
SELECT r.id, r.user_id, r.service_name, r.rating, r.comment, r.status, r.created_at,
       u.name AS user_name, u.phone AS user_phone
FROM reviews r
JOIN users u ON u.id = r.user_id";

pub struct SqliteReviewStorage {
    pool: SqlitePool,
}

impl SqliteReviewStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

/// Loads images for every review in `rows` with a single query.
async fn with_images(
    conn: &mut SqliteConnection,
    rows: Vec<ReviewStorageModel>,
) -> Result<Vec<ReviewDetails>, StorageError> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }

    let mut query = QueryBuilder::<Sqlite>::new("SELECT * FROM review_images WHERE review_id IN (");
    let mut ids = query.separated(", ");
    for row in &rows {
        ids.push_bind(row.id);
    }
    query.push(") ORDER BY id ASC");

    let images = query
        .build_query_as::<ReviewImageStorageModel>()
        .fetch_all(&mut *conn)
        .await?;

    let mut by_review: HashMap<ReviewId, Vec<ReviewImage>> = HashMap::new();
    for image in images {
        by_review
            .entry(image.review_id)
            .or_default()
            .push(image.into());
    }

    rows.into_iter()
        .map(|row| {
            let images = by_review.remove(&row.id).unwrap_or_default();
            row.into_details(images)
        })
        .collect()
}

async fn fetch_details(
    conn: &mut SqliteConnection,
    id: ReviewId,
) -> Result<Option<ReviewDetails>, StorageError> {
    let row = sqlx::query_as::<_, ReviewStorageModel>(&format!("{SELECT_DETAILS} WHERE r.id = ?"))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

    match row {
        Some(row) => Ok(with_images(conn, vec![row]).await?.pop()),
        None => Ok(None),
    }
}

#[async_trait]
impl ReviewStorage for SqliteReviewStorage {
    async fn submit(&self, review: NewReview) -> Result<ReviewDetails, StorageError> {
        let NewReview {
            reviewer,
            service_name,
            rating,
            comment,
            image_paths,
        } = review;

        let mut tx = self.pool.begin().await?;

        let user = match &reviewer.phone {
            Some(phone) => {
                user_storage::resolve_by_phone(
                    &mut tx,
                    &reviewer.name,
                    phone,
                    reviewer.email.as_deref(),
                )
                .await?
            }
            None => {
                user_storage::create_without_phone(&mut tx, &reviewer.name, reviewer.email.as_deref())
                    .await?
            }
        };

        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO reviews (user_id, service_name, rating, comment, status)
             VALUES (?, ?, ?, ?, ?)
             RETURNING id",
        )
        .bind(user.id)
        .bind(service_name)
        .bind(i64::from(rating.value()))
        .bind(comment)
        .bind(ReviewStatus::Pending.as_str())
        .fetch_one(&mut *tx)
        .await?;

        for path in &image_paths {
            sqlx::query("INSERT INTO review_images (review_id, image_path) VALUES (?, ?)")
                .bind(id)
                .bind(path)
                .execute(&mut *tx)
                .await?;
        }

        let details = fetch_details(&mut tx, id)
            .await?
            .ok_or_else(|| StorageError::not_found("review", id))?;

        tx.commit().await?;
        log::info!(
            "Review submitted. [review_id = {}, user_id = {}, images = {}]",
            id,
            user.id,
            image_paths.len()
        );

        Ok(details)
    }

    async fn get(&self, id: ReviewId) -> Result<Option<ReviewDetails>, StorageError> {
        let mut conn = self.pool.acquire().await?;
        fetch_details(&mut conn, id).await
    }

    async fn list(&self, status: Option<ReviewStatus>) -> Result<Vec<ReviewDetails>, StorageError> {
        let mut query = QueryBuilder::<Sqlite>::new(SELECT_DETAILS);
        if let Some(status) = status {
            query.push(" WHERE r.status = ").push_bind(status.as_str());
        }
        query.push(" ORDER BY r.created_at DESC, r.id DESC");

        let mut conn = self.pool.acquire().await?;
        let rows = query
            .build_query_as::<ReviewStorageModel>()
            .fetch_all(&mut *conn)
            .await?;

        with_images(&mut conn, rows).await
    }

    async fn set_status(
        &self,
        id: ReviewId,
        status: ReviewStatus,
    ) -> Result<ReviewDetails, StorageError> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query("UPDATE reviews SET status = ? WHERE id = ?")
            .bind(status.as_str())
            .bind(id)
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StorageError::not_found("review", id));
        }

        let updated = fetch_details(&mut tx, id)
            .await?
            .ok_or_else(|| StorageError::not_found("review", id))?;

        tx.commit().await?;
        log::info!("Review status changed. [review_id = {id}, status = {status}]");

        Ok(updated)
    }

    async fn delete(&self, id: ReviewId) -> Result<(), StorageError> {
        let result = sqlx::query("DELETE FROM reviews WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::not_found("review", id));
        }

        log::info!("Review deleted. [review_id = {id}]");
        Ok(())
    }
}
