//! In-memory repository implementation.
//!
//! Used for unit testing and local development. State lives behind a single
//! mutex, which also gives the booking commit its required atomicity: the
//! conflict re-read and the insert happen under one lock acquisition, so
//! concurrent overlapping attempts serialize and exactly one wins.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use parking_lot::Mutex;

use crate::api::{BookingId, ClinicId, PractitionerId, SpecialtyId, WindowId};
use crate::db::repository::{
    BookingCommit, BookingRepository, ErrorContext, FullRepository, PractitionerRepository,
    RepositoryError, RepositoryResult, WindowRepository,
};
use crate::models::{
    AvailabilityWindow, Booking, BookingStatus, NewBooking, Practitioner, Specialty,
};

#[derive(Default)]
struct Inner {
    practitioners: HashMap<PractitionerId, Practitioner>,
    specialties: HashMap<SpecialtyId, Specialty>,
    windows: HashMap<WindowId, AvailabilityWindow>,
    bookings: HashMap<BookingId, Booking>,
}

/// In-memory implementation of all repository traits.
#[derive(Default)]
pub struct LocalRepository {
    // The lock is never held across an await point.
    inner: Mutex<Inner>,
}

impl LocalRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PractitionerRepository for LocalRepository {
    async fn get_practitioner(
        &self,
        practitioner_id: PractitionerId,
    ) -> RepositoryResult<Option<Practitioner>> {
        Ok(self.inner.lock().practitioners.get(&practitioner_id).cloned())
    }

    async fn list_active_practitioners(
        &self,
        clinic_id: ClinicId,
    ) -> RepositoryResult<Vec<Practitioner>> {
        let inner = self.inner.lock();
        let mut practitioners: Vec<Practitioner> = inner
            .practitioners
            .values()
            .filter(|p| p.clinic_id == clinic_id && p.is_active)
            .cloned()
            .collect();
        practitioners.sort_by_key(|p| p.practitioner_id);
        Ok(practitioners)
    }

    async fn list_practitioners_by_specialty(
        &self,
        clinic_id: ClinicId,
        specialty_id: SpecialtyId,
    ) -> RepositoryResult<Vec<Practitioner>> {
        let inner = self.inner.lock();
        let mut practitioners: Vec<Practitioner> = inner
            .practitioners
            .values()
            .filter(|p| {
                p.clinic_id == clinic_id && p.is_active && p.specialty_id == Some(specialty_id)
            })
            .cloned()
            .collect();
        practitioners.sort_by_key(|p| p.practitioner_id);
        Ok(practitioners)
    }

    async fn create_practitioner(&self, practitioner: Practitioner) -> RepositoryResult<()> {
        if practitioner.consultation_duration == 0 {
            return Err(RepositoryError::validation_with_context(
                "Consultation duration must be positive",
                ErrorContext::new("create_practitioner")
                    .with_entity("practitioner")
                    .with_entity_id(practitioner.practitioner_id),
            ));
        }
        self.inner
            .lock()
            .practitioners
            .insert(practitioner.practitioner_id, practitioner);
        Ok(())
    }

    async fn get_specialty(
        &self,
        specialty_id: SpecialtyId,
    ) -> RepositoryResult<Option<Specialty>> {
        Ok(self.inner.lock().specialties.get(&specialty_id).cloned())
    }

    async fn list_specialties(&self) -> RepositoryResult<Vec<Specialty>> {
        let inner = self.inner.lock();
        let mut specialties: Vec<Specialty> = inner.specialties.values().cloned().collect();
        specialties.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(specialties)
    }

    async fn create_specialty(&self, specialty: Specialty) -> RepositoryResult<()> {
        self.inner
            .lock()
            .specialties
            .insert(specialty.specialty_id, specialty);
        Ok(())
    }
}

#[async_trait]
impl WindowRepository for LocalRepository {
    async fn list_active_windows(
        &self,
        practitioner_id: PractitionerId,
    ) -> RepositoryResult<Vec<AvailabilityWindow>> {
        let inner = self.inner.lock();
        let mut windows: Vec<AvailabilityWindow> = inner
            .windows
            .values()
            .filter(|w| w.practitioner_id == practitioner_id && w.is_active)
            .cloned()
            .collect();
        windows.sort_by_key(|w| (w.day_of_week, w.specific_date, w.interval.start));
        Ok(windows)
    }

    async fn create_window(&self, window: AvailabilityWindow) -> RepositoryResult<()> {
        if !window.is_well_formed() {
            return Err(RepositoryError::validation_with_context(
                "Window must have exactly one of day_of_week or specific_date and start < end",
                ErrorContext::new("create_window")
                    .with_entity("window")
                    .with_entity_id(window.window_id),
            ));
        }

        let mut inner = self.inner.lock();
        // Disjointness is an invariant enforced at write time; the slot
        // generator never deduplicates overlapping windows.
        if let Some(existing) = inner
            .windows
            .values()
            .find(|w| w.is_active && w.collides_with(&window))
        {
            return Err(RepositoryError::validation_with_context(
                format!(
                    "Window {} overlaps existing window {} ({})",
                    window.interval, existing.window_id, existing.interval
                ),
                ErrorContext::new("create_window")
                    .with_entity("window")
                    .with_entity_id(window.window_id),
            ));
        }
        inner.windows.insert(window.window_id, window);
        Ok(())
    }

    async fn set_window_active(&self, window_id: WindowId, active: bool) -> RepositoryResult<()> {
        let mut inner = self.inner.lock();
        match inner.windows.get_mut(&window_id) {
            Some(window) => {
                window.is_active = active;
                Ok(())
            }
            None => Err(RepositoryError::not_found_with_context(
                format!("Window {} not found", window_id),
                ErrorContext::new("set_window_active").with_entity("window"),
            )),
        }
    }
}

#[async_trait]
impl BookingRepository for LocalRepository {
    async fn list_active_bookings(
        &self,
        practitioner_id: PractitionerId,
        date: NaiveDate,
    ) -> RepositoryResult<Vec<Booking>> {
        let inner = self.inner.lock();
        let mut bookings: Vec<Booking> = inner
            .bookings
            .values()
            .filter(|b| {
                b.practitioner_id == practitioner_id && b.date == date && b.holds_interval()
            })
            .cloned()
            .collect();
        bookings.sort_by_key(|b| b.interval.start);
        Ok(bookings)
    }

    async fn insert_booking_if_free(&self, new: NewBooking) -> RepositoryResult<BookingCommit> {
        // Read-check-insert under a single lock acquisition.
        let mut inner = self.inner.lock();

        let conflict = inner.bookings.values().any(|b| {
            b.practitioner_id == new.practitioner_id
                && b.date == new.date
                && b.holds_interval()
                && b.interval.overlaps(&new.interval)
        });
        if conflict {
            return Ok(BookingCommit::Conflict);
        }

        let booking = Booking {
            booking_id: BookingId::random(),
            practitioner_id: new.practitioner_id,
            date: new.date,
            interval: new.interval,
            patient_name: new.patient_name,
            patient_email: new.patient_email,
            patient_phone: new.patient_phone,
            reason: new.reason,
            status: BookingStatus::Pending,
        };
        inner.bookings.insert(booking.booking_id, booking.clone());
        Ok(BookingCommit::Committed(booking))
    }

    async fn list_bookings_for_practitioner(
        &self,
        practitioner_id: PractitionerId,
        date: Option<NaiveDate>,
    ) -> RepositoryResult<Vec<Booking>> {
        let inner = self.inner.lock();
        let mut bookings: Vec<Booking> = inner
            .bookings
            .values()
            .filter(|b| {
                b.practitioner_id == practitioner_id && date.map_or(true, |d| b.date == d)
            })
            .cloned()
            .collect();
        bookings.sort_by_key(|b| (b.date, b.interval.start));
        Ok(bookings)
    }

    async fn set_booking_status(
        &self,
        booking_id: BookingId,
        status: BookingStatus,
    ) -> RepositoryResult<()> {
        let mut inner = self.inner.lock();
        match inner.bookings.get_mut(&booking_id) {
            Some(booking) => {
                booking.status = status;
                Ok(())
            }
            None => Err(RepositoryError::not_found_with_context(
                format!("Booking {} not found", booking_id),
                ErrorContext::new("set_booking_status").with_entity("booking"),
            )),
        }
    }
}

#[async_trait]
impl FullRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(true)
    }
}
