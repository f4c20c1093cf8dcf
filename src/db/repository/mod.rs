//! Repository trait definitions for the scheduling engine.
//!
//! The engine never owns persistent storage: practitioners, availability
//! windows, and bookings are supplied by a repository implementation. Two
//! backends exist, an in-memory `LocalRepository` and a Diesel/Postgres
//! implementation behind the `postgres-repo` feature.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::api::{BookingId, ClinicId, PractitionerId, SpecialtyId, WindowId};
use crate::models::{AvailabilityWindow, Booking, BookingStatus, NewBooking, Practitioner, Specialty};

pub mod error;

pub use error::{ErrorContext, RepositoryError, RepositoryResult};

/// Outcome of the ledger's atomic conflict-checked insert.
///
/// A conflict is an expected, frequent outcome of concurrent use and is
/// therefore data, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookingCommit {
    /// The booking was inserted; no committed booking overlapped it.
    Committed(Booking),
    /// A non-cancelled booking overlapped the candidate interval; nothing
    /// was written.
    Conflict,
}

/// Repository operations for practitioners and specialties.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait PractitionerRepository: Send + Sync {
    /// Fetch a single practitioner by ID, active or not.
    async fn get_practitioner(
        &self,
        practitioner_id: PractitionerId,
    ) -> RepositoryResult<Option<Practitioner>>;

    /// List the active practitioners of a clinic, ordered by ascending
    /// identifier.
    async fn list_active_practitioners(
        &self,
        clinic_id: ClinicId,
    ) -> RepositoryResult<Vec<Practitioner>>;

    /// List the active practitioners of a clinic with the given specialty,
    /// ordered by ascending identifier.
    async fn list_practitioners_by_specialty(
        &self,
        clinic_id: ClinicId,
        specialty_id: SpecialtyId,
    ) -> RepositoryResult<Vec<Practitioner>>;

    /// Insert a practitioner.
    ///
    /// # Returns
    /// * `Err(RepositoryError::ValidationError)` - if the consultation
    ///   duration is zero
    async fn create_practitioner(&self, practitioner: Practitioner) -> RepositoryResult<()>;

    /// Fetch a specialty by ID.
    async fn get_specialty(
        &self,
        specialty_id: SpecialtyId,
    ) -> RepositoryResult<Option<Specialty>>;

    /// List all specialties, ordered by name.
    async fn list_specialties(&self) -> RepositoryResult<Vec<Specialty>>;

    /// Insert a specialty.
    async fn create_specialty(&self, specialty: Specialty) -> RepositoryResult<()>;
}

/// Read/write access to a practitioner's availability windows.
///
/// Windows are written by the administrative API and read-only to the
/// engine. Disjointness per practitioner/day is a validated invariant at
/// write time; the generator does not deduplicate overlapping windows.
#[async_trait]
pub trait WindowRepository: Send + Sync {
    /// List the active windows of a practitioner, ordered by start time.
    async fn list_active_windows(
        &self,
        practitioner_id: PractitionerId,
    ) -> RepositoryResult<Vec<AvailabilityWindow>>;

    /// Insert a window.
    ///
    /// # Returns
    /// * `Err(RepositoryError::ValidationError)` - if the window shape is
    ///   malformed or it overlaps an existing active window of the same
    ///   practitioner on the same day
    async fn create_window(&self, window: AvailabilityWindow) -> RepositoryResult<()>;

    /// Activate or deactivate a window.
    async fn set_window_active(&self, window_id: WindowId, active: bool) -> RepositoryResult<()>;
}

/// The booking ledger: committed bookings plus the atomic commit operation.
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// List the non-cancelled bookings of a practitioner on a date, ordered
    /// by start time.
    async fn list_active_bookings(
        &self,
        practitioner_id: PractitionerId,
        date: NaiveDate,
    ) -> RepositoryResult<Vec<Booking>>;

    /// Atomically insert a booking if its interval conflicts with no
    /// non-cancelled booking for the same practitioner and date.
    ///
    /// The conflict re-read, the half-open overlap check, and the insert
    /// execute inside one critical section (a transaction with at least
    /// serializable visibility of concurrently-committing bookings, or an
    /// equivalent lock), so that of N concurrent overlapping attempts
    /// exactly one commits.
    ///
    /// # Returns
    /// * `Ok(BookingCommit::Committed)` - the booking, with assigned ID and
    ///   `pending` status
    /// * `Ok(BookingCommit::Conflict)` - an overlap was found; no write
    async fn insert_booking_if_free(&self, new: NewBooking) -> RepositoryResult<BookingCommit>;

    /// List all bookings of a practitioner, optionally restricted to a
    /// date, ordered by (date, start time). Includes cancelled bookings.
    async fn list_bookings_for_practitioner(
        &self,
        practitioner_id: PractitionerId,
        date: Option<NaiveDate>,
    ) -> RepositoryResult<Vec<Booking>>;

    /// Update the lifecycle status of a booking (e.g. confirm or cancel).
    async fn set_booking_status(
        &self,
        booking_id: BookingId,
        status: BookingStatus,
    ) -> RepositoryResult<()>;
}

/// Combined repository interface used by the service layer.
#[async_trait]
pub trait FullRepository:
    PractitionerRepository + WindowRepository + BookingRepository + Send + Sync
{
    /// Verify the backend is reachable.
    async fn health_check(&self) -> RepositoryResult<bool>;
}
