//! Service layer for business logic and orchestration.
//!
//! This module contains the service layer that sits between the repository
//! traits and the HTTP API. Services orchestrate repository calls and
//! implement the scheduling business logic: slot generation, booking
//! arbitration, and the facade that ties them together.

pub mod booking;
pub mod scheduling;
pub mod slots;

#[cfg(test)]
mod slots_tests;

pub use scheduling::{SchedulingService, SlotQuery};
pub use slots::{HORIZON_DAYS, MAX_SUGGESTIONS};
