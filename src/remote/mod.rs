// Client for the external comments and reservations API.

pub mod client;
pub mod envelope;
pub mod error;
pub mod types;
