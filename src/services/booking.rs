//! Booking arbitration.
//!
//! Orchestrates a booking attempt: validates the practitioner, derives the
//! candidate interval from the consultation duration, and delegates the
//! conflict check plus insert to the ledger's atomic commit operation. Every
//! precondition failure returns before any write. Business outcomes
//! (conflict, unknown practitioner) are reported as data; only repository
//! failures propagate as errors.

use crate::api::{BookedSlot, BookingFailure, BookingRequest, BookingResult, PractitionerId};
use crate::db::repository::{
    BookingCommit, BookingRepository, FullRepository, PractitionerRepository, RepositoryResult,
};
use crate::models::{NewBooking, TimeInterval};

/// Attempt to book `request.start_time` on `request.date` with the given
/// practitioner.
///
/// The ledger re-reads the committed bookings for the practitioner and
/// date at commit time, inside the same critical section as the insert, so
/// two concurrent attempts on overlapping intervals cannot both succeed.
pub async fn book(
    repo: &dyn FullRepository,
    practitioner_id: PractitionerId,
    request: &BookingRequest,
) -> RepositoryResult<BookingResult> {
    let practitioner = match repo.get_practitioner(practitioner_id).await? {
        Some(p) if p.is_active && p.clinic_id == request.clinic_id => p,
        _ => {
            return Ok(BookingResult::Rejected {
                kind: BookingFailure::ResourceNotFound,
                message: "Practitioner not found".to_string(),
            });
        }
    };

    let interval = match TimeInterval::starting_at(
        request.start_time,
        practitioner.consultation_duration as i64,
    ) {
        Some(interval) => interval,
        None => {
            return Ok(BookingResult::Rejected {
                kind: BookingFailure::InvalidInput,
                message: format!(
                    "A consultation starting at {} would cross midnight",
                    request.start_time.format("%H:%M")
                ),
            });
        }
    };

    let commit = repo
        .insert_booking_if_free(NewBooking {
            practitioner_id: practitioner.practitioner_id,
            date: request.date,
            interval,
            patient_name: request.patient_name.clone(),
            patient_email: request.patient_email.clone(),
            patient_phone: request.patient_phone.clone(),
            reason: request.reason.clone(),
        })
        .await?;

    match commit {
        BookingCommit::Committed(booking) => Ok(BookingResult::Booked(BookedSlot {
            booking_id: booking.booking_id,
            practitioner_name: practitioner.display_name(),
            date: booking.date,
            start_time: booking.interval.start,
            end_time: booking.interval.end,
        })),
        BookingCommit::Conflict => Ok(BookingResult::Rejected {
            kind: BookingFailure::SlotUnavailable,
            message: "This slot is no longer available".to_string(),
        }),
    }
}
