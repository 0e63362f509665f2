//! Transport objects

pub mod base;
pub mod notifications;
pub mod plain;


pub use base::TransportBase;
pub use notifications::NotificationRouter;
pub use plain::{PlainTransport, PlainTransportParams};
