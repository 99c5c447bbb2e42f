pub mod aggregate;
pub mod booking;
pub mod error;
pub mod record;
pub mod slots;
pub mod validate;

pub use error::RsvpError;
