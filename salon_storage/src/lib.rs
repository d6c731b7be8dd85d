mod appointment;
mod catalog;
mod error;
mod review;
pub mod sqlite;

pub use appointment::{AppointmentFilter, AppointmentStorage, NewBooking, StatusChange};
pub use catalog::{OfferInput, OfferStorage, ServiceInput, ServiceStorage};
pub use error::StorageError;
pub use review::{NewReview, ReviewStorage, Reviewer};
