use async_trait::async_trait;
use salon_models::{
    review::{Rating, ReviewDetails, ReviewId, ReviewStatus},
    user::PhoneNumber,
};

use crate::StorageError;

pub struct Reviewer {
    pub name: String,
    pub phone: Option<PhoneNumber>,
    pub email: Option<String>,
}

pub struct NewReview {
    pub reviewer: Reviewer,
    pub service_name: String,
    pub rating: Rating,
    pub comment: String,
    pub image_paths: Vec<String>,
}

#[async_trait]
pub trait ReviewStorage: Send + Sync {
    /// Stores the review as pending together with its images.
    async fn submit(&self, review: NewReview) -> Result<ReviewDetails, StorageError>;

    async fn get(&self, id: ReviewId) -> Result<Option<ReviewDetails>, StorageError>;

    /// Newest first. `None` returns every review.
    async fn list(&self, status: Option<ReviewStatus>) -> Result<Vec<ReviewDetails>, StorageError>;

    async fn set_status(
        &self,
        id: ReviewId,
        status: ReviewStatus,
    ) -> Result<ReviewDetails, StorageError>;

    /// Removes the review and its images.
    async fn delete(&self, id: ReviewId) -> Result<(), StorageError>;
}
