use std::sync::Arc;

use salon_models::review::{MAX_REVIEW_IMAGES, Rating, ReviewDetails, ReviewId, ReviewStatus};
use salon_notify::NotificationGateway;
use salon_storage::{NewReview, ReviewStorage, Reviewer};
use serde::{Deserialize, Serialize};

use crate::{
    BookingError,
    error::{best_effort, optional, required},
};

const DEFAULT_SERVICE_NAME: &str = "General";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReviewSubmission {
    pub name: String,
    pub comment: String,
    pub rating: Option<i64>,
    pub service_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    /// Paths of already uploaded images.
    #[serde(default)]
    pub images: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReviewOutcome {
    pub review: ReviewDetails,
    pub thank_you_sent: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReviewStatusChange {
    pub review: ReviewDetails,
    /// `None` when no notification was due.
    pub client_notified: Option<bool>,
}

pub struct ReviewModeration {
    storage: Arc<dyn ReviewStorage>,
    gateway: Arc<NotificationGateway>,
}

impl ReviewModeration {
    pub fn new(storage: Arc<dyn ReviewStorage>, gateway: Arc<NotificationGateway>) -> Self {
        Self { storage, gateway }
    }

    pub async fn submit(&self, submission: ReviewSubmission) -> Result<ReviewOutcome, BookingError> {
        let name = required(&submission.name, "name")?;
        let comment = required(&submission.comment, "comment")?;
        let rating = match submission.rating {
            Some(value) => {
                Rating::try_from(value).map_err(|e| BookingError::validation(e.to_string()))?
            }
            None => Rating::default(),
        };

        let phone = match optional(submission.phone) {
            Some(raw) => Some(
                self.gateway
                    .normalize_phone(&raw)
                    .ok_or_else(|| BookingError::validation("Invalid phone number"))?,
            ),
            None => None,
        };

        let image_paths: Vec<String> = submission
            .images
            .into_iter()
            .filter_map(|path| optional(Some(path)))
            .collect();
        if image_paths.len() > MAX_REVIEW_IMAGES {
            return Err(BookingError::validation(format!(
                "At most {MAX_REVIEW_IMAGES} images are allowed"
            )));
        }

        let review = self
            .storage
            .submit(NewReview {
                reviewer: Reviewer {
                    name,
                    phone,
                    email: optional(submission.email),
                },
                service_name: optional(submission.service_name)
                    .unwrap_or_else(|| DEFAULT_SERVICE_NAME.to_owned()),
                rating,
                comment,
                image_paths,
            })
            .await?;

        let thank_you_sent = review.user_phone.is_some()
            && best_effort(
                "review_thank_you",
                review.review.id,
                self.gateway.send_review_thank_you(&review).await,
            );

        Ok(ReviewOutcome {
            review,
            thank_you_sent,
        })
    }

    pub async fn set_status(
        &self,
        id: ReviewId,
        status: &str,
    ) -> Result<ReviewStatusChange, BookingError> {
        let next: ReviewStatus = status
            .trim()
            .parse()
            .map_err(|_| BookingError::validation("Invalid status"))?;

        let previous = self
            .storage
            .get(id)
            .await?
            .ok_or_else(|| BookingError::NotFound(format!("review {id} not found")))?
            .review
            .status;

        let review = self.storage.set_status(id, next).await?;

        let newly_approved =
            next == ReviewStatus::Approved && previous != ReviewStatus::Approved;
        let client_notified = if newly_approved && review.user_phone.is_some() {
            Some(best_effort(
                "review_approved",
                id,
                self.gateway.send_review_approved(&review).await,
            ))
        } else {
            None
        };

        Ok(ReviewStatusChange {
            review,
            client_notified,
        })
    }

    pub async fn list_approved(&self) -> Result<Vec<ReviewDetails>, BookingError> {
        Ok(self.storage.list(Some(ReviewStatus::Approved)).await?)
    }

    pub async fn list_all(&self) -> Result<Vec<ReviewDetails>, BookingError> {
        Ok(self.storage.list(None).await?)
    }

    pub async fn delete(&self, id: ReviewId) -> Result<(), BookingError> {
        Ok(self.storage.delete(id).await?)
    }
}
