use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use salon_booking::BookingError;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Booking(#[from] BookingError),

    #[error("{0}")]
    BadRequest(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden")]
    Forbidden,
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Booking(error) => match error {
                BookingError::Validation(_) | BookingError::InvalidTransition { .. } => {
                    StatusCode::BAD_REQUEST
                }
                BookingError::NotFound(_) => StatusCode::NOT_FOUND,
                BookingError::Conflict(_) => StatusCode::CONFLICT,
                BookingError::Delivery(_) => StatusCode::BAD_GATEWAY,
                BookingError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if let ApiError::Booking(BookingError::Persistence(source)) = self {
            log::error!("Request failed on storage. [error = {source}]");
        }

        HttpResponse::build(status).json(json!({ "error": self.to_string() }))
    }
}
