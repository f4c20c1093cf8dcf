use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use uuid::Uuid;

use crate::api::{ClinicId, PractitionerId, WindowId};
use crate::models::{AvailabilityWindow, Booking, BookingStatus, Practitioner, TimeInterval};
use crate::services::slots::{generate_for_date, horizon_dates, sort_and_cap, HORIZON_DAYS};

fn t(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

// 2025-03-10 is a Monday.
fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
}

fn midnight_before(date: NaiveDate) -> NaiveDateTime {
    date.and_hms_opt(0, 0, 0).unwrap()
}

fn practitioner(duration: u32) -> Practitioner {
    Practitioner {
        practitioner_id: PractitionerId::new(Uuid::nil()),
        clinic_id: ClinicId::random(),
        specialty_id: None,
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        email: "ada@clinic.test".to_string(),
        phone: None,
        consultation_duration: duration,
        is_active: true,
    }
}

fn monday_window(start: NaiveTime, end: NaiveTime) -> AvailabilityWindow {
    AvailabilityWindow {
        window_id: WindowId::random(),
        practitioner_id: PractitionerId::new(Uuid::nil()),
        day_of_week: Some(0),
        specific_date: None,
        interval: TimeInterval::new(start, end).unwrap(),
        is_recurring: true,
        is_active: true,
    }
}

fn booking(start: NaiveTime, end: NaiveTime) -> Booking {
    Booking {
        booking_id: crate::api::BookingId::random(),
        practitioner_id: PractitionerId::new(Uuid::nil()),
        date: monday(),
        interval: TimeInterval::new(start, end).unwrap(),
        patient_name: "Pat".to_string(),
        patient_email: "pat@example.test".to_string(),
        patient_phone: None,
        reason: "checkup".to_string(),
        status: BookingStatus::Pending,
    }
}

#[test]
fn test_empty_window_yields_six_half_hour_slots() {
    let p = practitioner(30);
    let windows = vec![monday_window(t(9, 0), t(12, 0))];
    let slots = generate_for_date(&p, None, &windows, &[], monday(), midnight_before(monday()));

    assert_eq!(slots.len(), 6);
    assert_eq!(slots[0].start_time, t(9, 0));
    assert_eq!(slots[0].end_time, t(9, 30));
    assert_eq!(slots[5].start_time, t(11, 30));
    assert_eq!(slots[5].end_time, t(12, 0));
}

#[test]
fn test_booked_interval_is_excluded() {
    let p = practitioner(30);
    let windows = vec![monday_window(t(9, 0), t(12, 0))];
    let bookings = vec![booking(t(10, 0), t(10, 30))];
    let slots = generate_for_date(
        &p,
        None,
        &windows,
        &bookings,
        monday(),
        midnight_before(monday()),
    );

    assert_eq!(slots.len(), 5);
    assert!(slots.iter().all(|s| s.start_time != t(10, 0)));
}

#[test]
fn test_generation_is_idempotent() {
    let p = practitioner(30);
    let windows = vec![monday_window(t(9, 0), t(12, 0))];
    let bookings = vec![booking(t(9, 30), t(10, 0))];
    let now = midnight_before(monday());

    let first = generate_for_date(&p, None, &windows, &bookings, monday(), now);
    let second = generate_for_date(&p, None, &windows, &bookings, monday(), now);
    assert_eq!(first, second);
}

#[test]
fn test_past_slots_are_dropped() {
    let p = practitioner(30);
    let windows = vec![monday_window(t(9, 0), t(12, 0))];
    // Mid-morning: slots starting at or before 10:30 are gone, only
    // 11:00 and 11:30 remain.
    let now = monday().and_hms_opt(10, 30, 0).unwrap();
    let slots = generate_for_date(&p, None, &windows, &[], monday(), now);

    assert_eq!(slots.len(), 2);
    assert_eq!(slots[0].start_time, t(11, 0));
    assert_eq!(slots[1].start_time, t(11, 30));
}

#[test]
fn test_slot_exactly_at_now_is_dropped() {
    let p = practitioner(30);
    let windows = vec![monday_window(t(9, 0), t(12, 0))];
    let now = monday().and_hms_opt(9, 0, 0).unwrap();
    let slots = generate_for_date(&p, None, &windows, &[], monday(), now);

    // Strictly-after comparison: the 09:00 slot itself is gone.
    assert_eq!(slots[0].start_time, t(9, 30));
}

#[test]
fn test_partial_trailing_slot_is_not_emitted() {
    let p = practitioner(45);
    // 09:00-10:00 fits one 45-minute consultation, not two.
    let windows = vec![monday_window(t(9, 0), t(10, 0))];
    let slots = generate_for_date(&p, None, &windows, &[], monday(), midnight_before(monday()));

    assert_eq!(slots.len(), 1);
    assert_eq!(slots[0].start_time, t(9, 0));
    assert_eq!(slots[0].end_time, t(9, 45));
}

#[test]
fn test_every_slot_lies_inside_its_window() {
    let p = practitioner(20);
    let windows = vec![
        monday_window(t(9, 0), t(11, 0)),
        monday_window(t(14, 0), t(15, 0)),
    ];
    let slots = generate_for_date(&p, None, &windows, &[], monday(), midnight_before(monday()));

    assert!(!slots.is_empty());
    for s in &slots {
        let inside = windows.iter().any(|w| {
            w.interval.start <= s.start_time && s.end_time <= w.interval.end
        });
        assert!(inside, "slot {}-{} outside all windows", s.start_time, s.end_time);
        assert_eq!(
            (s.end_time - s.start_time).num_minutes(),
            p.consultation_duration as i64
        );
    }
}

#[test]
fn test_window_on_other_weekday_is_ignored() {
    let p = practitioner(30);
    let mut w = monday_window(t(9, 0), t(12, 0));
    w.day_of_week = Some(1); // Tuesday
    let slots = generate_for_date(&p, None, &[w], &[], monday(), midnight_before(monday()));
    assert!(slots.is_empty());
}

#[test]
fn test_inactive_and_malformed_windows_are_skipped() {
    let p = practitioner(30);
    let mut inactive = monday_window(t(9, 0), t(10, 0));
    inactive.is_active = false;
    let mut malformed = monday_window(t(10, 0), t(11, 0));
    malformed.specific_date = Some(monday()); // both kinds set
    let good = monday_window(t(14, 0), t(15, 0));

    let slots = generate_for_date(
        &p,
        None,
        &[inactive, malformed, good],
        &[],
        monday(),
        midnight_before(monday()),
    );
    assert_eq!(slots.len(), 2);
    assert!(slots.iter().all(|s| s.start_time >= t(14, 0)));
}

#[test]
fn test_cancelled_booking_does_not_block() {
    let p = practitioner(30);
    let windows = vec![monday_window(t(9, 0), t(10, 0))];
    let mut cancelled = booking(t(9, 0), t(9, 30));
    cancelled.status = BookingStatus::Cancelled;
    // Repositories exclude cancelled bookings from the active listing;
    // the generator sees only what it is handed.
    let active: Vec<Booking> = [cancelled]
        .into_iter()
        .filter(|b| b.holds_interval())
        .collect();

    let slots = generate_for_date(
        &p,
        None,
        &windows,
        &active,
        monday(),
        midnight_before(monday()),
    );
    assert_eq!(slots.len(), 2);
}

#[test]
fn test_horizon_is_fourteen_days_starting_today() {
    let dates: Vec<NaiveDate> = horizon_dates(monday()).collect();
    assert_eq!(dates.len(), HORIZON_DAYS as usize);
    assert_eq!(dates[0], monday());
    assert_eq!(*dates.last().unwrap(), monday() + chrono::Days::new(13));
}

#[test]
fn test_sort_and_cap_orders_and_truncates() {
    let p = practitioner(15);
    let windows = vec![monday_window(t(9, 0), t(18, 0))];
    let mut slots = generate_for_date(&p, None, &windows, &[], monday(), midnight_before(monday()));
    assert!(slots.len() > 15);

    // Shuffle-ish: reverse, then restore via sort_and_cap.
    slots.reverse();
    let capped = sort_and_cap(slots);
    assert_eq!(capped.len(), 15);
    assert!(capped.windows(2).all(|w| w[0].start_time < w[1].start_time));
    assert_eq!(capped[0].start_time, t(9, 0));
}
