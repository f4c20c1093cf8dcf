//! Shared fixtures for the integration test suites.

use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};
use uuid::Uuid;

use clinic_rust::api::{BookingRequest, ClinicId, PractitionerId, SpecialtyId, WindowId};
use clinic_rust::db::repositories::LocalRepository;
use clinic_rust::db::repository::{FullRepository, PractitionerRepository, WindowRepository};
use clinic_rust::models::{AvailabilityWindow, Practitioner, Specialty, TimeInterval};

pub fn t(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

/// 2025-03-10, a Monday, used as the anchor date of most scenarios.
pub fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
}

/// A seeded clinic: one specialty, one active practitioner with a Monday
/// morning window.
pub struct ClinicFixture {
    pub repository: Arc<LocalRepository>,
    pub clinic_id: ClinicId,
    pub specialty_id: SpecialtyId,
    pub practitioner_id: PractitionerId,
}

impl ClinicFixture {
    pub async fn new() -> Self {
        let repository = Arc::new(LocalRepository::new());
        let clinic_id = ClinicId::random();
        let specialty_id = SpecialtyId::random();
        let practitioner_id = PractitionerId::random();

        repository
            .create_specialty(Specialty {
                specialty_id,
                name: "Cardiology".to_string(),
                description: None,
            })
            .await
            .unwrap();

        repository
            .create_practitioner(Practitioner {
                practitioner_id,
                clinic_id,
                specialty_id: Some(specialty_id),
                first_name: "Ada".to_string(),
                last_name: "Lovelace".to_string(),
                email: "ada@clinic.test".to_string(),
                phone: None,
                consultation_duration: 30,
                is_active: true,
            })
            .await
            .unwrap();

        // Monday 09:00-12:00, recurring.
        repository
            .create_window(AvailabilityWindow {
                window_id: WindowId::random(),
                practitioner_id,
                day_of_week: Some(0),
                specific_date: None,
                interval: TimeInterval::new(t(9, 0), t(12, 0)).unwrap(),
                is_recurring: true,
                is_active: true,
            })
            .await
            .unwrap();

        Self {
            repository,
            clinic_id,
            specialty_id,
            practitioner_id,
        }
    }

    pub fn repository(&self) -> Arc<dyn FullRepository> {
        Arc::clone(&self.repository) as Arc<dyn FullRepository>
    }

    /// Add another active practitioner sharing the fixture specialty.
    pub async fn add_practitioner(&self, id: Uuid, duration: u32) -> PractitionerId {
        self.add_practitioner_in(id, duration, self.specialty_id).await
    }

    /// Add another active practitioner with an explicit specialty.
    pub async fn add_practitioner_in(
        &self,
        id: Uuid,
        duration: u32,
        specialty_id: SpecialtyId,
    ) -> PractitionerId {
        let practitioner_id = PractitionerId::new(id);
        self.repository
            .create_practitioner(Practitioner {
                practitioner_id,
                clinic_id: self.clinic_id,
                specialty_id: Some(specialty_id),
                first_name: "Grace".to_string(),
                last_name: "Hopper".to_string(),
                email: format!("{}@clinic.test", id),
                phone: None,
                consultation_duration: duration,
                is_active: true,
            })
            .await
            .unwrap();
        practitioner_id
    }

    pub fn booking_request(&self, start: NaiveTime) -> BookingRequest {
        BookingRequest {
            clinic_id: self.clinic_id,
            practitioner_id: Some(self.practitioner_id),
            specialty_id: None,
            date: monday(),
            start_time: start,
            patient_name: "Jean Martin".to_string(),
            patient_email: "jean@example.test".to_string(),
            patient_phone: None,
            reason: "Checkup".to_string(),
        }
    }
}
