//! Domain value types for the scheduling engine.

pub mod booking;
pub mod interval;
pub mod practitioner;
pub mod window;

pub use booking::{Booking, BookingStatus, NewBooking};
pub use interval::TimeInterval;
pub use practitioner::{Practitioner, Specialty};
pub use window::AvailabilityWindow;
