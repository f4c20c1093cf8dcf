//! Free-slot generation.
//!
//! Pure computation: given a practitioner, the availability windows
//! applicable to a date, and the non-cancelled bookings on that date,
//! produce the ordered list of free slots. The walk is a fixed stride of
//! one consultation duration, so generated slots never overlap each other
//! by construction; candidates overlapping a booking or lying in the past
//! are dropped.

use chrono::{NaiveDate, NaiveDateTime};

use crate::api::AvailableSlot;
use crate::models::{AvailabilityWindow, Booking, Practitioner, TimeInterval};

/// Rolling horizon scanned when no explicit date is requested.
pub const HORIZON_DAYS: u64 = 14;

/// Hard cap on the number of suggestions returned by a listing call.
pub const MAX_SUGGESTIONS: usize = 15;

/// The ordered candidate dates of the rolling horizon: today inclusive
/// through today + HORIZON_DAYS - 1.
pub fn horizon_dates(today: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    today.iter_days().take(HORIZON_DAYS as usize)
}

/// Generate the free slots of one practitioner on one date.
///
/// `windows` are the practitioner's active windows (applicability to
/// `date` is checked here); `bookings` are the non-cancelled bookings on
/// `date`. Candidates whose start, combined with `date`, is not strictly
/// after `now` are dropped, so a listing never offers a slot in the past.
///
/// Slots are collected in window-encounter order; callers sort the merged
/// result by `(date, start_time)` for presentation. A practitioner with no
/// applicable window yields an empty vector, not an error, and a malformed
/// window is skipped rather than aborting the listing.
pub fn generate_for_date(
    practitioner: &Practitioner,
    specialty_name: Option<&str>,
    windows: &[AvailabilityWindow],
    bookings: &[Booking],
    date: NaiveDate,
    now: NaiveDateTime,
) -> Vec<AvailableSlot> {
    let duration = practitioner.consultation_duration as i64;
    let mut slots = Vec::new();

    for window in windows {
        if !window.is_active || !window.applies_on(date) {
            continue;
        }
        if !window.is_well_formed() {
            log::warn!(
                "Skipping malformed availability window {} for practitioner {}",
                window.window_id,
                practitioner.practitioner_id
            );
            continue;
        }

        let mut current = window.interval.start;
        loop {
            let candidate = match TimeInterval::starting_at(current, duration) {
                Some(c) if c.end <= window.interval.end => c,
                _ => break,
            };

            let free = !bookings.iter().any(|b| b.interval.overlaps(&candidate));
            if free && date.and_time(candidate.start) > now {
                slots.push(AvailableSlot {
                    practitioner_id: practitioner.practitioner_id,
                    practitioner_name: practitioner.display_name(),
                    specialty_name: specialty_name.map(str::to_string),
                    date,
                    start_time: candidate.start,
                    end_time: candidate.end,
                });
            }

            current = candidate.end;
        }
    }

    slots
}

/// Sort merged slots by `(date, start_time)` and apply the suggestion cap.
pub fn sort_and_cap(mut slots: Vec<AvailableSlot>) -> Vec<AvailableSlot> {
    slots.sort_by_key(|s| (s.date, s.start_time));
    slots.truncate(MAX_SUGGESTIONS);
    slots
}
