//! Practitioner and specialty domain types.

use serde::{Deserialize, Serialize};

use crate::api::{ClinicId, PractitionerId, SpecialtyId};

/// Medical specialty (e.g. Cardiology, Pediatrics).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Specialty {
    pub specialty_id: SpecialtyId,
    pub name: String,
    pub description: Option<String>,
}

/// A bookable practitioner belonging to a clinic.
///
/// The consultation duration is the sole quantization unit of the engine:
/// every generated slot and every booking consumes exactly one duration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Practitioner {
    pub practitioner_id: PractitionerId,
    pub clinic_id: ClinicId,
    pub specialty_id: Option<SpecialtyId>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    /// Consultation duration in minutes, always > 0.
    pub consultation_duration: u32,
    pub is_active: bool,
}

impl Practitioner {
    /// Display name as presented to patients.
    pub fn display_name(&self) -> String {
        format!("Dr. {} {}", self.first_name, self.last_name)
    }
}
