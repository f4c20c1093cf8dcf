//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the
//! service layer or repository for business logic.

use std::str::FromStr;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use super::dto::{
    BookingOutcome, BookingRequest, BookingsQuery, CreatePractitionerRequest,
    CreateSpecialtyRequest, CreateWindowRequest, CreatedResponse, HealthResponse,
    PractitionerListResponse, PractitionerSearchQuery, SlotListResponse, SlotsQuery,
    UpdateBookingRequest, UpdateWindowRequest, WindowsQuery,
};
use super::error::AppError;
use super::state::AppState;
use crate::api::{BookingId, PractitionerId, SpecialtyId, WindowId};
use crate::db::repository::{
    BookingRepository, FullRepository, PractitionerRepository, WindowRepository,
};
use crate::models::{
    AvailabilityWindow, Booking, BookingStatus, Practitioner, Specialty, TimeInterval,
};
use crate::services::SlotQuery;

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
///
/// Health check endpoint to verify the service is running and the
/// repository is accessible.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let db_status = match state.repository.health_check().await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: "v1".to_string(),
        database: db_status,
    }))
}

// =============================================================================
// Slots and Bookings
// =============================================================================

/// GET /v1/slots
///
/// List the available slots of a clinic, filtered by practitioner,
/// specialty, and/or date.
pub async fn list_slots(
    State(state): State<AppState>,
    Query(query): Query<SlotsQuery>,
) -> HandlerResult<SlotListResponse> {
    let slot_query = SlotQuery {
        practitioner_id: query.practitioner_id,
        specialty_id: query.specialty_id,
        date: query.date,
    };
    let slots = state
        .scheduling
        .list_available_slots(query.clinic_id, &slot_query)
        .await?;
    let total = slots.len();

    Ok(Json(SlotListResponse { slots, total }))
}

/// POST /v1/bookings/book
///
/// Attempt to book a slot. Business rejections (conflict, unknown
/// practitioner) come back as 200 with `success: false`; only malformed
/// requests and infrastructure failures produce error statuses.
pub async fn book_slot(
    State(state): State<AppState>,
    Json(request): Json<BookingRequest>,
) -> HandlerResult<BookingOutcome> {
    let result = state.scheduling.book_slot(&request).await?;
    Ok(Json(BookingOutcome::from(result)))
}

/// GET /v1/bookings
///
/// List the bookings of a practitioner, optionally restricted to a date.
/// Includes cancelled bookings.
pub async fn list_bookings(
    State(state): State<AppState>,
    Query(query): Query<BookingsQuery>,
) -> HandlerResult<Vec<Booking>> {
    let bookings = state
        .repository
        .list_bookings_for_practitioner(query.practitioner_id, query.date)
        .await?;
    Ok(Json(bookings))
}

/// PATCH /v1/bookings/{booking_id}/status
///
/// Update the lifecycle status of a booking. Cancelling releases the
/// booked interval for new bookings.
pub async fn update_booking(
    State(state): State<AppState>,
    Path(booking_id): Path<Uuid>,
    Json(request): Json<UpdateBookingRequest>,
) -> Result<StatusCode, AppError> {
    let status = BookingStatus::from_str(&request.status).map_err(AppError::BadRequest)?;
    state
        .repository
        .set_booking_status(BookingId::new(booking_id), status)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Practitioners and Specialties
// =============================================================================

/// GET /v1/practitioners
///
/// Search the active practitioners of a clinic by specialty name.
pub async fn search_practitioners(
    State(state): State<AppState>,
    Query(query): Query<PractitionerSearchQuery>,
) -> HandlerResult<PractitionerListResponse> {
    let practitioners = state
        .scheduling
        .search_practitioners(query.clinic_id, query.specialty.as_deref())
        .await?;
    let total = practitioners.len();

    Ok(Json(PractitionerListResponse {
        practitioners,
        total,
    }))
}

/// POST /v1/practitioners
///
/// Register a practitioner. New practitioners start active.
pub async fn create_practitioner(
    State(state): State<AppState>,
    Json(request): Json<CreatePractitionerRequest>,
) -> Result<(StatusCode, Json<CreatedResponse>), AppError> {
    let practitioner = Practitioner {
        practitioner_id: PractitionerId::random(),
        clinic_id: request.clinic_id,
        specialty_id: request.specialty_id,
        first_name: request.first_name,
        last_name: request.last_name,
        email: request.email,
        phone: request.phone,
        consultation_duration: request.consultation_duration,
        is_active: true,
    };
    let id = practitioner.practitioner_id.value();
    state.repository.create_practitioner(practitioner).await?;

    Ok((StatusCode::CREATED, Json(CreatedResponse { id })))
}

/// GET /v1/specialties
///
/// List all specialties, ordered by name.
pub async fn list_specialties(State(state): State<AppState>) -> HandlerResult<Vec<Specialty>> {
    let specialties = state.repository.list_specialties().await?;
    Ok(Json(specialties))
}

/// POST /v1/specialties
pub async fn create_specialty(
    State(state): State<AppState>,
    Json(request): Json<CreateSpecialtyRequest>,
) -> Result<(StatusCode, Json<CreatedResponse>), AppError> {
    let specialty = Specialty {
        specialty_id: SpecialtyId::random(),
        name: request.name,
        description: request.description,
    };
    let id = specialty.specialty_id.value();
    state.repository.create_specialty(specialty).await?;

    Ok((StatusCode::CREATED, Json(CreatedResponse { id })))
}

// =============================================================================
// Availability Windows
// =============================================================================

/// POST /v1/windows
///
/// Create an availability window. The repository rejects malformed shapes
/// and overlaps with the practitioner's existing active windows.
pub async fn create_window(
    State(state): State<AppState>,
    Json(request): Json<CreateWindowRequest>,
) -> Result<(StatusCode, Json<CreatedResponse>), AppError> {
    let interval = TimeInterval::new(request.start_time, request.end_time).ok_or_else(|| {
        AppError::BadRequest("start_time must be strictly before end_time".to_string())
    })?;

    let window = AvailabilityWindow {
        window_id: WindowId::random(),
        practitioner_id: request.practitioner_id,
        day_of_week: request.day_of_week,
        specific_date: request.specific_date,
        interval,
        is_recurring: request.day_of_week.is_some(),
        is_active: true,
    };
    let id = window.window_id.value();
    state.repository.create_window(window).await?;

    Ok((StatusCode::CREATED, Json(CreatedResponse { id })))
}

/// GET /v1/windows
///
/// List the active windows of a practitioner, ordered by start time.
pub async fn list_windows(
    State(state): State<AppState>,
    Query(query): Query<WindowsQuery>,
) -> HandlerResult<Vec<AvailabilityWindow>> {
    let windows = state
        .repository
        .list_active_windows(query.practitioner_id)
        .await?;
    Ok(Json(windows))
}

/// PATCH /v1/windows/{window_id}/active
///
/// Activate or deactivate a window.
pub async fn update_window(
    State(state): State<AppState>,
    Path(window_id): Path<Uuid>,
    Json(request): Json<UpdateWindowRequest>,
) -> Result<StatusCode, AppError> {
    state
        .repository
        .set_window_active(WindowId::new(window_id), request.is_active)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
