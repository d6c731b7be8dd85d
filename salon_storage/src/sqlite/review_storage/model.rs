use salon_models::{
    chrono::NaiveDateTime,
    review::{Rating, Review, ReviewDetails, ReviewImage},
    user::PhoneNumber,
};

use crate::StorageError;

#[derive(Debug, sqlx::FromRow)]
pub struct ReviewStorageModel {
    pub id: i64,
    pub user_id: i64,
    pub service_name: String,
    pub rating: i64,
    pub comment: String,
    pub status: String,
    pub created_at: NaiveDateTime,
    pub user_name: String,
    pub user_phone: Option<String>,
}

impl ReviewStorageModel {
    pub fn into_details(self, images: Vec<ReviewImage>) -> Result<ReviewDetails, StorageError> {
        let rating = Rating::try_from(self.rating)
            .map_err(|e| StorageError::Corrupted(format!("review {}: {e}", self.id)))?;
        let status = self.status.parse().map_err(|_| {
            StorageError::Corrupted(format!("review {} has status {:?}", self.id, self.status))
        })?;

        Ok(ReviewDetails {
            review: Review {
                id: self.id,
                user_id: self.user_id,
                service_name: self.service_name,
                rating,
                comment: self.comment,
                status,
                images,
                created_at: self.created_at,
            },
            user_name: self.user_name,
            user_phone: self.user_phone.map(PhoneNumber::from_normalized),
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
pub struct ReviewImageStorageModel {
    pub id: i64,
    pub review_id: i64,
    pub image_path: String,
    pub created_at: NaiveDateTime,
}

impl From<ReviewImageStorageModel> for ReviewImage {
    fn from(value: ReviewImageStorageModel) -> Self {
        Self {
            id: value.id,
            review_id: value.review_id,
            image_path: value.image_path,
            created_at: value.created_at,
        }
    }
}
