//! Scheduling facade.
//!
//! `SchedulingService` is the single entry point of the engine: it owns the
//! repository handle and composes the slot generator and the booking
//! arbiter into the operations the API exposes. The service is cheap to
//! clone and holds no mutable state of its own; all shared state lives
//! behind the repository.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};

use crate::api::{
    AvailableSlot, BookingFailure, BookingRequest, BookingResult, ClinicId, PractitionerId,
    PractitionerSummary, SpecialtyId,
};
use crate::db::repository::{
    BookingRepository, FullRepository, PractitionerRepository, RepositoryResult, WindowRepository,
};
use crate::models::Practitioner;

use super::{booking, slots};

/// Filters for a slot listing call.
///
/// `practitioner_id` narrows to one practitioner and takes precedence over
/// `specialty_id`; with neither, every active practitioner of the clinic is
/// scanned. `date` restricts the listing to a single day; without it the
/// rolling horizon is scanned.
#[derive(Debug, Clone, Default)]
pub struct SlotQuery {
    pub practitioner_id: Option<PractitionerId>,
    pub specialty_id: Option<SpecialtyId>,
    pub date: Option<NaiveDate>,
}

/// Business-logic facade over slot generation and booking arbitration.
#[derive(Clone)]
pub struct SchedulingService {
    repository: Arc<dyn FullRepository>,
}

impl SchedulingService {
    pub fn new(repository: Arc<dyn FullRepository>) -> Self {
        SchedulingService { repository }
    }

    pub fn repository(&self) -> &Arc<dyn FullRepository> {
        &self.repository
    }

    /// List available slots for the clinic, evaluated against the current
    /// wall-clock time.
    pub async fn list_available_slots(
        &self,
        clinic_id: ClinicId,
        query: &SlotQuery,
    ) -> RepositoryResult<Vec<AvailableSlot>> {
        self.list_available_slots_at(clinic_id, query, chrono::Local::now().naive_local())
            .await
    }

    /// List available slots with an explicit evaluation instant.
    ///
    /// Slots whose start is not strictly after `now` are excluded, so the
    /// result never offers a slot in the past. The listing is read-only and
    /// idempotent: repeating it without intervening writes returns the same
    /// slots.
    pub async fn list_available_slots_at(
        &self,
        clinic_id: ClinicId,
        query: &SlotQuery,
        now: NaiveDateTime,
    ) -> RepositoryResult<Vec<AvailableSlot>> {
        let practitioners = self.candidate_practitioners(clinic_id, query).await?;
        if practitioners.is_empty() {
            return Ok(Vec::new());
        }

        let specialty_names = self.specialty_names().await?;

        let mut slots = Vec::new();
        match query.date {
            Some(date) => {
                for practitioner in &practitioners {
                    self.collect_for_date(practitioner, &specialty_names, date, now, &mut slots)
                        .await?;
                }
            }
            None => {
                // Horizon scan stops early once the cap is reached, but only
                // between dates: within a date every practitioner is scanned
                // so the final sort sees the whole day.
                'horizon: for date in slots::horizon_dates(now.date()) {
                    for practitioner in &practitioners {
                        self.collect_for_date(practitioner, &specialty_names, date, now, &mut slots)
                            .await?;
                    }
                    if slots.len() >= slots::MAX_SUGGESTIONS {
                        break 'horizon;
                    }
                }
            }
        }

        Ok(slots::sort_and_cap(slots))
    }

    /// Attempt to book a slot described by `request`.
    ///
    /// The practitioner is taken from the request directly, or resolved
    /// from the specialty as the first active practitioner in identifier
    /// order. Business rejections come back as `BookingResult::Rejected`;
    /// only infrastructure failures are errors.
    pub async fn book_slot(&self, request: &BookingRequest) -> RepositoryResult<BookingResult> {
        let practitioner_id = match request.practitioner_id {
            Some(id) => id,
            None => match request.specialty_id {
                Some(specialty_id) => {
                    let candidates = self
                        .repository
                        .list_practitioners_by_specialty(request.clinic_id, specialty_id)
                        .await?;
                    match candidates.first() {
                        Some(p) => p.practitioner_id,
                        None => {
                            return Ok(BookingResult::Rejected {
                                kind: BookingFailure::ResourceNotFound,
                                message: "No active practitioner for this specialty".to_string(),
                            });
                        }
                    }
                }
                None => {
                    return Ok(BookingResult::Rejected {
                        kind: BookingFailure::InvalidInput,
                        message: "Either practitioner_id or specialty_id is required".to_string(),
                    });
                }
            },
        };

        booking::book(self.repository.as_ref(), practitioner_id, request).await
    }

    /// Search the clinic's active practitioners by specialty name,
    /// case-insensitive substring match. An empty `name` matches everyone.
    pub async fn search_practitioners(
        &self,
        clinic_id: ClinicId,
        name: Option<&str>,
    ) -> RepositoryResult<Vec<PractitionerSummary>> {
        let specialty_names = self.specialty_names().await?;
        let needle = name.unwrap_or("").to_lowercase();

        let summaries = self
            .repository
            .list_active_practitioners(clinic_id)
            .await?
            .into_iter()
            .filter_map(|p| {
                let specialty = p
                    .specialty_id
                    .and_then(|id| specialty_names.get(&id).cloned());
                let matches = needle.is_empty()
                    || specialty
                        .as_deref()
                        .is_some_and(|s| s.to_lowercase().contains(&needle));
                matches.then(|| PractitionerSummary {
                    practitioner_id: p.practitioner_id,
                    name: p.display_name(),
                    specialty,
                })
            })
            .collect();

        Ok(summaries)
    }

    async fn candidate_practitioners(
        &self,
        clinic_id: ClinicId,
        query: &SlotQuery,
    ) -> RepositoryResult<Vec<Practitioner>> {
        if let Some(id) = query.practitioner_id {
            let practitioner = self.repository.get_practitioner(id).await?;
            return Ok(practitioner
                .into_iter()
                .filter(|p| p.is_active && p.clinic_id == clinic_id)
                .collect());
        }
        if let Some(specialty_id) = query.specialty_id {
            return self
                .repository
                .list_practitioners_by_specialty(clinic_id, specialty_id)
                .await;
        }
        self.repository.list_active_practitioners(clinic_id).await
    }

    async fn specialty_names(&self) -> RepositoryResult<HashMap<SpecialtyId, String>> {
        Ok(self
            .repository
            .list_specialties()
            .await?
            .into_iter()
            .map(|s| (s.specialty_id, s.name))
            .collect())
    }

    async fn collect_for_date(
        &self,
        practitioner: &Practitioner,
        specialty_names: &HashMap<SpecialtyId, String>,
        date: NaiveDate,
        now: NaiveDateTime,
        out: &mut Vec<AvailableSlot>,
    ) -> RepositoryResult<()> {
        let windows = self
            .repository
            .list_active_windows(practitioner.practitioner_id)
            .await?;
        if windows.is_empty() {
            return Ok(());
        }
        let bookings = self
            .repository
            .list_active_bookings(practitioner.practitioner_id, date)
            .await?;

        let specialty_name = practitioner
            .specialty_id
            .and_then(|id| specialty_names.get(&id))
            .map(String::as_str);

        out.extend(slots::generate_for_date(
            practitioner,
            specialty_name,
            &windows,
            &bookings,
            date,
            now,
        ));
        Ok(())
    }
}
