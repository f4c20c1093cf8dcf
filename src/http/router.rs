//! Router configuration for the HTTP API.
//!
//! This module sets up all routes, middleware (CORS, compression, tracing),
//! and creates the axum router ready for serving.

use axum::{
    routing::{get, patch, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration - permissive for development, should be restricted in production
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build the API router with versioned endpoints
    let api_v1 = Router::new()
        // Slot listing and booking
        .route("/slots", get(handlers::list_slots))
        .route("/bookings/book", post(handlers::book_slot))
        .route("/bookings", get(handlers::list_bookings))
        .route(
            "/bookings/{booking_id}/status",
            patch(handlers::update_booking),
        )
        // Practitioner and specialty administration
        .route("/practitioners", get(handlers::search_practitioners))
        .route("/practitioners", post(handlers::create_practitioner))
        .route("/specialties", get(handlers::list_specialties))
        .route("/specialties", post(handlers::create_specialty))
        // Availability window administration
        .route("/windows", get(handlers::list_windows))
        .route("/windows", post(handlers::create_window))
        .route(
            "/windows/{window_id}/active",
            patch(handlers::update_window),
        );

    // Combine all routes
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/v1", api_v1)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
