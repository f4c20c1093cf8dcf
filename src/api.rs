//! Public API surface for the scheduling backend.
//!
//! This file consolidates the DTO types and typed identifiers shared by the
//! service layer and the HTTP API. All types derive Serialize/Deserialize
//! for JSON serialization.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Clinic (owning organization) identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ClinicId(pub Uuid);

/// Practitioner identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PractitionerId(pub Uuid);

/// Specialty identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SpecialtyId(pub Uuid);

/// Availability window identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WindowId(pub Uuid);

/// Booking identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BookingId(pub Uuid);

macro_rules! impl_id {
    ($name:ident) => {
        impl $name {
            pub fn new(value: Uuid) -> Self {
                $name(value)
            }

            /// Generate a fresh random identifier.
            pub fn random() -> Self {
                $name(Uuid::new_v4())
            }

            pub fn value(&self) -> Uuid {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

impl_id!(ClinicId);
impl_id!(PractitionerId);
impl_id!(SpecialtyId);
impl_id!(WindowId);
impl_id!(BookingId);

/// Serde helpers for times rendered as `HH:MM` on the wire.
///
/// The conversational assistant presents start/end times to end users, so
/// the API contract is minute precision. Parsing accepts an optional
/// seconds component for round-tripping stored values.
pub mod serde_hhmm {
    use chrono::NaiveTime;
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&time.format("%H:%M").to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&raw, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(&raw, "%H:%M:%S"))
            .map_err(serde::de::Error::custom)
    }

    /// Same as the module-level functions but for `Option<NaiveTime>`.
    pub mod option {
        use chrono::NaiveTime;
        use serde::{self, Deserialize, Deserializer, Serializer};

        pub fn serialize<S>(time: &Option<NaiveTime>, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            match time {
                Some(t) => super::serialize(t, serializer),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveTime>, D::Error>
        where
            D: Deserializer<'de>,
        {
            let raw: Option<String> = Option::deserialize(deserializer)?;
            match raw {
                None => Ok(None),
                Some(s) => NaiveTime::parse_from_str(&s, "%H:%M")
                    .or_else(|_| NaiveTime::parse_from_str(&s, "%H:%M:%S"))
                    .map(Some)
                    .map_err(serde::de::Error::custom),
            }
        }
    }
}

/// A free, bookable slot derived from a practitioner's availability windows.
///
/// Slots are ephemeral: they are computed fresh on every listing call and
/// never persisted. Two slots are equal iff all fields match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailableSlot {
    pub practitioner_id: PractitionerId,
    pub practitioner_name: String,
    pub specialty_name: Option<String>,
    pub date: NaiveDate,
    #[serde(with = "serde_hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "serde_hhmm")]
    pub end_time: NaiveTime,
}

/// Booking request submitted by the conversational assistant or the API.
///
/// Either `practitioner_id` or `specialty_id` must be supplied; when only a
/// specialty is given the first active practitioner of that specialty
/// (ordered by ascending identifier) is used.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingRequest {
    pub clinic_id: ClinicId,
    #[serde(default)]
    pub practitioner_id: Option<PractitionerId>,
    #[serde(default)]
    pub specialty_id: Option<SpecialtyId>,
    pub date: NaiveDate,
    #[serde(with = "serde_hhmm")]
    pub start_time: NaiveTime,
    pub patient_name: String,
    pub patient_email: String,
    #[serde(default)]
    pub patient_phone: Option<String>,
    pub reason: String,
}

/// Compact practitioner row for the conversational assistant's
/// specialty search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PractitionerSummary {
    pub practitioner_id: PractitionerId,
    pub name: String,
    pub specialty: Option<String>,
}

/// Why a booking attempt was rejected.
///
/// These are expected business outcomes, reported as data rather than
/// errors so callers can present a human-readable message. Infrastructure
/// failures travel separately as `RepositoryError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingFailure {
    /// The referenced practitioner does not exist or is inactive.
    ResourceNotFound,
    /// The requested interval conflicts with a committed booking.
    SlotUnavailable,
    /// The request is malformed (e.g. no practitioner resolvable).
    InvalidInput,
}

/// Data describing a successfully committed booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookedSlot {
    pub booking_id: BookingId,
    pub practitioner_name: String,
    pub date: NaiveDate,
    #[serde(with = "serde_hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "serde_hhmm")]
    pub end_time: NaiveTime,
}

/// Outcome of a booking attempt.
///
/// A tagged result: callers match exhaustively instead of probing an
/// untyped map. Conversion to the flat wire shape lives in the HTTP layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum BookingResult {
    /// The booking was committed to the ledger.
    Booked(BookedSlot),
    /// The booking was rejected; nothing was written.
    Rejected {
        kind: BookingFailure,
        message: String,
    },
}

impl BookingResult {
    pub fn is_booked(&self) -> bool {
        matches!(self, BookingResult::Booked(_))
    }

    /// Human-readable message for either outcome.
    pub fn message(&self) -> String {
        match self {
            BookingResult::Booked(slot) => format!(
                "Your appointment with {} on {} at {} is confirmed.",
                slot.practitioner_name,
                slot.date,
                slot.start_time.format("%H:%M")
            ),
            BookingResult::Rejected { message, .. } => message.clone(),
        }
    }
}
