pub mod appointments;
pub mod health;
pub mod offers;
pub mod reviews;
pub mod services;
pub mod webhook;
