mod appointments;
mod catalog;
mod error;
mod reviews;

pub use appointments::{
    AppointmentQuery, AppointmentUpdate, BookingEngine, BookingNotifications, BookingOutcome,
    BookingRequest, RescheduleRequest, StatusUpdateRequest,
};
pub use catalog::{Catalog, OfferRequest, ServiceRequest};
pub use error::BookingError;
pub use reviews::{ReviewModeration, ReviewOutcome, ReviewStatusChange, ReviewSubmission};

#[cfg(test)]
mod test_utils;
