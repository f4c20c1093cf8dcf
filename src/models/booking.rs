//! Committed bookings and their lifecycle status.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::interval::TimeInterval;
use crate::api::{BookingId, PractitionerId};

/// Lifecycle status of a booking.
///
/// The engine only distinguishes cancelled from everything else: cancelled
/// bookings release their interval, all other statuses hold it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Completed => "completed",
        }
    }
}

impl std::str::FromStr for BookingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(BookingStatus::Pending),
            "confirmed" => Ok(BookingStatus::Confirmed),
            "cancelled" => Ok(BookingStatus::Cancelled),
            "completed" => Ok(BookingStatus::Completed),
            other => Err(format!("Unknown booking status: {}", other)),
        }
    }
}

/// A committed reservation of one consultation-duration slot.
///
/// Invariant: for a given practitioner and date, the intervals of all
/// bookings with status != cancelled are pairwise disjoint under half-open
/// semantics. The ledger enforces this at commit time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    pub booking_id: BookingId,
    pub practitioner_id: PractitionerId,
    pub date: NaiveDate,
    pub interval: TimeInterval,
    pub patient_name: String,
    pub patient_email: String,
    pub patient_phone: Option<String>,
    pub reason: String,
    pub status: BookingStatus,
}

impl Booking {
    /// Whether this booking currently holds its interval on the calendar.
    pub fn holds_interval(&self) -> bool {
        self.status != BookingStatus::Cancelled
    }
}

/// Payload for inserting a new booking into the ledger.
///
/// The interval is computed by the arbiter from the practitioner's
/// consultation duration; the ledger assigns the identifier and the
/// initial `pending` status.
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub practitioner_id: PractitionerId,
    pub date: NaiveDate,
    pub interval: TimeInterval,
    pub patient_name: String,
    pub patient_email: String,
    pub patient_phone: Option<String>,
    pub reason: String,
}
