pub mod appointment;
pub mod clock;
pub mod offer;
pub mod review;
pub mod service;
pub mod settings;
pub mod user;

pub use chrono;
pub use chrono_tz;
