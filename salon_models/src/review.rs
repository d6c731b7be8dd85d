use std::{fmt, str::FromStr};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::user::{PhoneNumber, UserId};

pub type ReviewId = i64;
pub type ReviewImageId = i64;

pub const MAX_REVIEW_IMAGES: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewStatus {
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid status: {0}")]
pub struct ParseReviewStatusError(pub String);

impl ReviewStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewStatus::Pending => "pending",
            ReviewStatus::Approved => "approved",
            ReviewStatus::Rejected => "rejected",
        }
    }
}

impl FromStr for ReviewStatus {
    type Err = ParseReviewStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ReviewStatus::Pending),
            "approved" => Ok(ReviewStatus::Approved),
            "rejected" => Ok(ReviewStatus::Rejected),
            other => Err(ParseReviewStatusError(other.to_owned())),
        }
    }
}

impl fmt::Display for ReviewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Rating must be between 1 and 5, got {0}")]
pub struct RatingOutOfRange(pub i64);

/// Star rating, 1 to 5 inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Rating(u8);

impl Rating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn value(&self) -> u8 {
        self.0
    }
}

impl Default for Rating {
    fn default() -> Self {
        Self(Self::MAX)
    }
}

impl TryFrom<i64> for Rating {
    type Error = RatingOutOfRange;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if (i64::from(Self::MIN)..=i64::from(Self::MAX)).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(RatingOutOfRange(value))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewImage {
    pub id: ReviewImageId,
    pub review_id: ReviewId,
    pub image_path: String,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Review {
    pub id: ReviewId,
    pub user_id: UserId,
    /// Free text, not a catalog reference.
    pub service_name: String,
    pub rating: Rating,
    pub comment: String,
    pub status: ReviewStatus,
    pub images: Vec<ReviewImage>,
    /// UTC, unlike the business-local slot and clock times.
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewDetails {
    #[serde(flatten)]
    pub review: Review,
    pub user_name: String,
    #[serde(skip_serializing)]
    pub user_phone: Option<PhoneNumber>,
}
