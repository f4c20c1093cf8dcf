//! Concurrency guarantees of the booking commit: of N simultaneous
//! overlapping attempts exactly one wins, and disjoint attempts never
//! contend with each other.

mod support;

use uuid::Uuid;

use clinic_rust::api::BookingResult;
use clinic_rust::db::repository::{BookingRepository, WindowRepository};
use clinic_rust::services::SchedulingService;

use support::{t, ClinicFixture};

#[tokio::test]
async fn test_exactly_one_of_many_overlapping_attempts_wins() {
    let fixture = ClinicFixture::new().await;
    let service = SchedulingService::new(fixture.repository());

    let mut handles = Vec::new();
    for i in 0..20 {
        let service = service.clone();
        let mut request = fixture.booking_request(t(10, 0));
        request.patient_name = format!("Patient {}", i);
        handles.push(tokio::spawn(async move {
            service.book_slot(&request).await.unwrap()
        }));
    }

    let mut booked = 0;
    let mut rejected = 0;
    for handle in handles {
        match handle.await.unwrap() {
            BookingResult::Booked(_) => booked += 1,
            BookingResult::Rejected { .. } => rejected += 1,
        }
    }

    assert_eq!(booked, 1);
    assert_eq!(rejected, 19);

    let bookings = fixture
        .repository
        .list_active_bookings(fixture.practitioner_id, support::monday())
        .await
        .unwrap();
    assert_eq!(bookings.len(), 1);
}

#[tokio::test]
async fn test_disjoint_concurrent_attempts_all_succeed() {
    let fixture = ClinicFixture::new().await;
    let service = SchedulingService::new(fixture.repository());

    // Six non-overlapping half-hour starts across the morning window.
    let starts = [t(9, 0), t(9, 30), t(10, 0), t(10, 30), t(11, 0), t(11, 30)];
    let mut handles = Vec::new();
    for start in starts {
        let service = service.clone();
        let request = fixture.booking_request(start);
        handles.push(tokio::spawn(async move {
            service.book_slot(&request).await.unwrap()
        }));
    }

    for handle in handles {
        assert!(handle.await.unwrap().is_booked());
    }

    let bookings = fixture
        .repository
        .list_active_bookings(fixture.practitioner_id, support::monday())
        .await
        .unwrap();
    assert_eq!(bookings.len(), starts.len());
    // The committed intervals are pairwise disjoint.
    for (i, a) in bookings.iter().enumerate() {
        for b in bookings.iter().skip(i + 1) {
            assert!(!a.interval.overlaps(&b.interval));
        }
    }
}

#[tokio::test]
async fn test_concurrent_attempts_across_practitioners_do_not_contend() {
    let fixture = ClinicFixture::new().await;
    let other = fixture.add_practitioner(Uuid::from_u128(0x42), 30).await;
    fixture
        .repository
        .create_window(clinic_rust::models::AvailabilityWindow {
            window_id: clinic_rust::api::WindowId::random(),
            practitioner_id: other,
            day_of_week: Some(0),
            specific_date: None,
            interval: clinic_rust::models::TimeInterval::new(t(9, 0), t(12, 0)).unwrap(),
            is_recurring: true,
            is_active: true,
        })
        .await
        .unwrap();

    let service = SchedulingService::new(fixture.repository());

    let mut request_a = fixture.booking_request(t(10, 0));
    request_a.practitioner_id = Some(fixture.practitioner_id);
    let mut request_b = fixture.booking_request(t(10, 0));
    request_b.practitioner_id = Some(other);

    let (a, b) = tokio::join!(service.book_slot(&request_a), service.book_slot(&request_b));
    assert!(a.unwrap().is_booked());
    assert!(b.unwrap().is_booked());
}
