//! HTTP API tests driving the axum router directly with `oneshot`.

#![cfg(feature = "http-server")]

mod support;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::util::ServiceExt;

use clinic_rust::db::repository::BookingRepository;
use clinic_rust::http::{create_router, AppState};

use support::{monday, ClinicFixture};

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_health_endpoint() {
    let fixture = ClinicFixture::new().await;
    let app = create_router(AppState::new(fixture.repository()));

    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "connected");
}

#[tokio::test]
async fn test_list_slots_for_date() {
    let fixture = ClinicFixture::new().await;
    let app = create_router(AppState::new(fixture.repository()));

    let uri = format!("/v1/slots?clinic_id={}&date={}", fixture.clinic_id, monday());
    let response = app.oneshot(get(&uri)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    // The anchor Monday lies in the past relative to the server clock, so
    // the response shape matters more than the count here.
    assert!(body["slots"].is_array());
    assert_eq!(body["total"], body["slots"].as_array().unwrap().len());
}

#[tokio::test]
async fn test_book_and_cancel_roundtrip() {
    let fixture = ClinicFixture::new().await;
    let app = create_router(AppState::new(fixture.repository()));

    // Book a week out so wall-clock time never interferes.
    let future_date = (chrono::Local::now().date_naive() + chrono::Days::new(7)).to_string();
    let request = json!({
        "clinic_id": fixture.clinic_id,
        "practitioner_id": fixture.practitioner_id,
        "date": future_date,
        "start_time": "10:00",
        "patient_name": "Jean Martin",
        "patient_email": "jean@example.test",
        "reason": "Checkup"
    });

    let response = app
        .clone()
        .oneshot(post_json("/v1/bookings/book", request.clone()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["start_time"], "10:00");
    assert_eq!(body["end_time"], "10:30");
    let booking_id = body["booking_id"].as_str().unwrap().to_string();

    // A second identical attempt is a business rejection, still HTTP 200.
    let response = app
        .clone()
        .oneshot(post_json("/v1/bookings/book", request.clone()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["failure"], "slot_unavailable");

    // Cancel, then the interval is free again.
    let cancel = Request::builder()
        .method("PATCH")
        .uri(format!("/v1/bookings/{}/status", booking_id))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({"status": "cancelled"}).to_string()))
        .unwrap();
    let response = app.clone().oneshot(cancel).await.unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .oneshot(post_json("/v1/bookings/book", request))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
}

#[tokio::test]
async fn test_unknown_booking_patch_is_404() {
    let fixture = ClinicFixture::new().await;
    let app = create_router(AppState::new(fixture.repository()));

    let patch = Request::builder()
        .method("PATCH")
        .uri(format!("/v1/bookings/{}/status", uuid::Uuid::new_v4()))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({"status": "cancelled"}).to_string()))
        .unwrap();
    let response = app.oneshot(patch).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = body_json(response).await;
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_invalid_status_is_400() {
    let fixture = ClinicFixture::new().await;
    let app = create_router(AppState::new(fixture.repository()));

    let booked = fixture
        .repository
        .list_bookings_for_practitioner(fixture.practitioner_id, None)
        .await
        .unwrap();
    assert!(booked.is_empty());

    let patch = Request::builder()
        .method("PATCH")
        .uri(format!("/v1/bookings/{}/status", uuid::Uuid::new_v4()))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({"status": "tentative"}).to_string()))
        .unwrap();
    let response = app.oneshot(patch).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_overlapping_window_creation_is_400() {
    let fixture = ClinicFixture::new().await;
    let app = create_router(AppState::new(fixture.repository()));

    // Collides with the fixture's Monday 09:00-12:00 window.
    let request = json!({
        "practitioner_id": fixture.practitioner_id,
        "day_of_week": 0,
        "start_time": "11:00",
        "end_time": "13:00"
    });
    let response = app
        .clone()
        .oneshot(post_json("/v1/windows", request))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["code"], "VALIDATION_ERROR");

    // Adjacent window is accepted.
    let request = json!({
        "practitioner_id": fixture.practitioner_id,
        "day_of_week": 0,
        "start_time": "12:00",
        "end_time": "14:00"
    });
    let response = app.oneshot(post_json("/v1/windows", request)).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_list_windows_endpoint() {
    let fixture = ClinicFixture::new().await;
    let app = create_router(AppState::new(fixture.repository()));

    let uri = format!("/v1/windows?practitioner_id={}", fixture.practitioner_id);
    let response = app.oneshot(get(&uri)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let windows = body.as_array().unwrap();
    assert_eq!(windows.len(), 1);
    assert_eq!(windows[0]["day_of_week"], 0);
    assert_eq!(windows[0]["is_recurring"], true);
}

#[tokio::test]
async fn test_practitioner_search_endpoint() {
    let fixture = ClinicFixture::new().await;
    let app = create_router(AppState::new(fixture.repository()));

    let uri = format!(
        "/v1/practitioners?clinic_id={}&specialty=cardio",
        fixture.clinic_id
    );
    let response = app.oneshot(get(&uri)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["practitioners"][0]["name"], "Dr. Ada Lovelace");
}

#[tokio::test]
async fn test_create_specialty_and_list() {
    let fixture = ClinicFixture::new().await;
    let app = create_router(AppState::new(fixture.repository()));

    let response = app
        .clone()
        .oneshot(post_json(
            "/v1/specialties",
            json!({"name": "Dermatology"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app.oneshot(get("/v1/specialties")).await.unwrap();
    let body = body_json(response).await;
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["name"].as_str().unwrap())
        .collect();
    // list_specialties orders by name.
    assert_eq!(names, vec!["Cardiology", "Dermatology"]);
}
