//! # Clinic Rust Backend
//!
//! Appointment scheduling engine for clinic practitioners.
//!
//! This crate provides a Rust-based reservation core: given a practitioner
//! with a configured consultation duration, a set of recurring-weekly or
//! specific-date availability windows, and the already-committed bookings,
//! it computes the free bookable slots over a rolling horizon and commits
//! new bookings atomically so that no two bookings for the same practitioner
//! on the same date ever overlap. The backend exposes a REST API via Axum
//! for the administrative frontend and the conversational assistant.
//!
//! ## Features
//!
//! - **Slot Generation**: Fixed-stride free-slot computation per window
//! - **Conflict-Checked Booking**: Atomic read-check-insert on the ledger
//! - **Repository Pattern**: Swappable in-memory and Postgres backends
//! - **HTTP API**: RESTful endpoints for slots, bookings, and administration
//!
//! ## Architecture
//!
//! The crate is organized into several logical modules:
//!
//! - [`api`]: Data Transfer Objects (DTOs) and typed identifiers
//! - [`models`]: Domain value types (practitioner, window, booking, interval)
//! - [`db`]: Database operations, repository pattern, and persistence layer
//! - [`services`]: Slot generation, booking arbitration, scheduling facade
//! - [`http`]: Axum-based HTTP server and request handlers

// Allow large error types - RepositoryError contains rich context for debugging
#![allow(clippy::result_large_err)]

pub mod api;

pub mod db;
pub mod models;

pub mod services;

#[cfg(feature = "http-server")]
pub mod http;
