mod gateway;
mod log_transport;
pub mod template;
mod transport;
mod whatsapp;

pub use gateway::{NotificationError, NotificationGateway};
pub use log_transport::LogTransport;
pub use template::{AutoReplyKind, Business, Notification};
pub use transport::{NotificationTransport, TransportError};
pub use whatsapp::WhatsAppTransport;
