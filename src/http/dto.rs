//! Data Transfer Objects for the HTTP API.
//!
//! These DTOs are used for request/response serialization in the REST API.
//! The slot and booking DTOs are re-exported from the api module since they
//! already derive Serialize/Deserialize.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

// Re-export existing DTOs that are already serializable
pub use crate::api::{
    AvailableSlot, BookedSlot, BookingFailure, BookingRequest, BookingResult, PractitionerSummary,
};

use crate::api::{ClinicId, PractitionerId, SpecialtyId};
use crate::api::serde_hhmm;

/// Query parameters for the slot listing endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotsQuery {
    /// Clinic whose practitioners are scanned
    pub clinic_id: ClinicId,
    /// Restrict to one practitioner (takes precedence over specialty_id)
    #[serde(default)]
    pub practitioner_id: Option<PractitionerId>,
    /// Restrict to one specialty
    #[serde(default)]
    pub specialty_id: Option<SpecialtyId>,
    /// Restrict to one day; omitted means the rolling horizon
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

/// Slot listing response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotListResponse {
    /// Available slots, ordered by (date, start_time)
    pub slots: Vec<AvailableSlot>,
    /// Number of slots returned
    pub total: usize,
}

/// Flat wire shape of a booking outcome.
///
/// The conversational assistant reads `success` and `message` directly;
/// the slot fields are present only on success.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingOutcome {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<BookingFailure>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub booking_id: Option<crate::api::BookingId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub practitioner_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(default, with = "serde_hhmm::option", skip_serializing_if = "Option::is_none")]
    pub start_time: Option<NaiveTime>,
    #[serde(default, with = "serde_hhmm::option", skip_serializing_if = "Option::is_none")]
    pub end_time: Option<NaiveTime>,
}

impl From<BookingResult> for BookingOutcome {
    fn from(result: BookingResult) -> Self {
        let message = result.message();
        match result {
            BookingResult::Booked(slot) => Self {
                success: true,
                message,
                failure: None,
                booking_id: Some(slot.booking_id),
                practitioner_name: Some(slot.practitioner_name),
                date: Some(slot.date),
                start_time: Some(slot.start_time),
                end_time: Some(slot.end_time),
            },
            BookingResult::Rejected { kind, .. } => Self {
                success: false,
                message,
                failure: Some(kind),
                booking_id: None,
                practitioner_name: None,
                date: None,
                start_time: None,
                end_time: None,
            },
        }
    }
}

/// Query parameters for the practitioner search endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PractitionerSearchQuery {
    pub clinic_id: ClinicId,
    /// Case-insensitive specialty-name substring; omitted matches everyone
    #[serde(default)]
    pub specialty: Option<String>,
}

/// Practitioner search response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PractitionerListResponse {
    pub practitioners: Vec<PractitionerSummary>,
    pub total: usize,
}

/// Request body for creating a practitioner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePractitionerRequest {
    pub clinic_id: ClinicId,
    #[serde(default)]
    pub specialty_id: Option<SpecialtyId>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    /// Consultation duration in minutes, must be > 0
    pub consultation_duration: u32,
}

/// Request body for creating a specialty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSpecialtyRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Request body for creating an availability window.
///
/// Exactly one of `day_of_week` (0 = Monday .. 6 = Sunday) or
/// `specific_date` must be set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateWindowRequest {
    pub practitioner_id: PractitionerId,
    #[serde(default)]
    pub day_of_week: Option<u8>,
    #[serde(default)]
    pub specific_date: Option<NaiveDate>,
    #[serde(with = "serde_hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "serde_hhmm")]
    pub end_time: NaiveTime,
}

/// Query parameters for the window listing endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowsQuery {
    pub practitioner_id: PractitionerId,
}

/// Request body for activating/deactivating a window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateWindowRequest {
    pub is_active: bool,
}

/// Query parameters for the booking listing endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingsQuery {
    pub practitioner_id: PractitionerId,
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

/// Request body for updating a booking's lifecycle status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateBookingRequest {
    /// One of: pending, confirmed, cancelled, completed
    pub status: String,
}

/// Response wrapping a created entity's identifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedResponse {
    pub id: uuid::Uuid,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status of the service
    pub status: String,
    /// Version of the API
    pub version: String,
    /// Database connection status
    pub database: String,
}
