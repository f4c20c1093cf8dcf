//! Postgres repository implementation using Diesel.
//!
//! This module implements the repository traits against a Postgres
//! database.
//!
//! ## Features
//!
//! - Connection pooling with r2d2
//! - Automatic retry for transient failures (connection loss,
//!   serialization failures under the serializable isolation level)
//! - Automatic migration execution
//!
//! ## Configuration
//!
//! Environment variables:
//! - `DATABASE_URL` or `PG_DATABASE_URL`: Connection string (required)
//! - `PG_POOL_MAX`: Maximum pool size (default: 10)
//! - `PG_CONN_TIMEOUT_SEC`: Connection timeout in seconds (default: 30)
//! - `PG_MAX_RETRIES`: Maximum retry attempts for transient failures (default: 3)
//! - `PG_RETRY_DELAY_MS`: Initial retry delay in milliseconds (default: 100)

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sql_query;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use tokio::task;

use crate::api::{BookingId, ClinicId, PractitionerId, SpecialtyId, WindowId};
use crate::db::repository::{
    BookingCommit, BookingRepository, ErrorContext, FullRepository, PractitionerRepository,
    RepositoryError, RepositoryResult, WindowRepository,
};
use crate::models::{
    AvailabilityWindow, Booking, BookingStatus, NewBooking, Practitioner, Specialty,
};

mod models;
mod schema;

use models::*;
use schema::{availability_windows, bookings, practitioners, specialties};

type PgPool = Pool<ConnectionManager<PgConnection>>;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("src/db/repositories/postgres/migrations");

/// Configuration for connecting to Postgres.
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    /// Database connection URL
    pub database_url: String,
    /// Maximum number of connections in the pool
    pub max_pool_size: u32,
    /// Connection timeout in seconds
    pub connection_timeout_sec: u64,
    /// Maximum number of retry attempts for transient failures
    pub max_retries: u32,
    /// Initial retry delay in milliseconds (doubles with each retry)
    pub retry_delay_ms: u64,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            max_pool_size: 10,
            connection_timeout_sec: 30,
            max_retries: 3,
            retry_delay_ms: 100,
        }
    }
}

impl PostgresConfig {
    /// Create configuration from environment variables.
    pub fn from_env() -> Result<Self, String> {
        let database_url = std::env::var("DATABASE_URL")
            .or_else(|_| std::env::var("PG_DATABASE_URL"))
            .map_err(|_| "DATABASE_URL or PG_DATABASE_URL must be set".to_string())?;

        let max_pool_size = std::env::var("PG_POOL_MAX")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(10);

        let connection_timeout_sec = std::env::var("PG_CONN_TIMEOUT_SEC")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(30);

        let max_retries = std::env::var("PG_MAX_RETRIES")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(3);

        let retry_delay_ms = std::env::var("PG_RETRY_DELAY_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(100);

        Ok(Self {
            database_url,
            max_pool_size,
            connection_timeout_sec,
            max_retries,
            retry_delay_ms,
        })
    }
}

/// Postgres-backed implementation of all repository traits.
pub struct PostgresRepository {
    pool: PgPool,
    config: PostgresConfig,
}

impl PostgresRepository {
    /// Create a new repository, build the connection pool, and run pending
    /// migrations.
    pub fn new(config: PostgresConfig) -> RepositoryResult<Self> {
        let manager = ConnectionManager::<PgConnection>::new(&config.database_url);
        let pool = Pool::builder()
            .max_size(config.max_pool_size)
            .connection_timeout(Duration::from_secs(config.connection_timeout_sec))
            .build(manager)
            .map_err(|e| {
                RepositoryError::connection_with_context(
                    e.to_string(),
                    ErrorContext::new("build_pool"),
                )
            })?;

        let mut conn = pool.get()?;
        Self::run_migrations(&mut conn)?;

        Ok(Self { pool, config })
    }

    /// Run pending database migrations.
    fn run_migrations(conn: &mut PgConnection) -> RepositoryResult<()> {
        conn.run_pending_migrations(MIGRATIONS).map_err(|e| {
            RepositoryError::internal_with_context(
                format!("Migration failed: {}", e),
                ErrorContext::new("run_migrations"),
            )
        })?;

        Ok(())
    }

    /// Execute a database operation with automatic retry for transient
    /// failures.
    ///
    /// Retries up to `max_retries` times when a retryable error occurs
    /// (connection errors, timeouts, serialization failures). A booking
    /// conflict is not an error and is never retried here.
    async fn with_conn<T, F>(&self, f: F) -> RepositoryResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut PgConnection) -> RepositoryResult<T> + Send + 'static + Clone,
    {
        let pool = self.pool.clone();
        let max_retries = self.config.max_retries;
        let retry_delay_ms = self.config.retry_delay_ms;

        task::spawn_blocking(move || {
            let mut last_error = None;
            let mut retry_delay = Duration::from_millis(retry_delay_ms);

            for attempt in 0..=max_retries {
                if attempt > 0 {
                    std::thread::sleep(retry_delay);
                    retry_delay *= 2; // Exponential backoff
                }

                let mut conn = match pool.get() {
                    Ok(c) => c,
                    Err(e) => {
                        let err = RepositoryError::connection_with_context(
                            e.to_string(),
                            ErrorContext::new("get_connection")
                                .with_details(format!("attempt={}", attempt + 1))
                                .retryable(),
                        );
                        if attempt < max_retries {
                            last_error = Some(err);
                            continue;
                        }
                        return Err(err);
                    }
                };

                match f.clone()(&mut conn) {
                    Ok(result) => return Ok(result),
                    Err(e) if e.is_retryable() && attempt < max_retries => {
                        last_error = Some(e);
                        continue;
                    }
                    Err(e) => return Err(e),
                }
            }

            Err(last_error.unwrap_or_else(|| {
                RepositoryError::internal("Max retries exceeded with no error captured")
            }))
        })
        .await
        .map_err(|e| {
            RepositoryError::internal_with_context(
                format!("Task join error: {}", e),
                ErrorContext::new("spawn_blocking"),
            )
        })?
    }
}

#[async_trait]
impl PractitionerRepository for PostgresRepository {
    async fn get_practitioner(
        &self,
        practitioner_id: PractitionerId,
    ) -> RepositoryResult<Option<Practitioner>> {
        self.with_conn(move |conn| {
            practitioners::table
                .find(practitioner_id.value())
                .select(PractitionerRow::as_select())
                .first::<PractitionerRow>(conn)
                .optional()
                .map_err(RepositoryError::from)
                .map(|row| row.map(Practitioner::from))
        })
        .await
    }

    async fn list_active_practitioners(
        &self,
        clinic_id: ClinicId,
    ) -> RepositoryResult<Vec<Practitioner>> {
        self.with_conn(move |conn| {
            practitioners::table
                .filter(practitioners::clinic_id.eq(clinic_id.value()))
                .filter(practitioners::is_active.eq(true))
                .order(practitioners::practitioner_id.asc())
                .select(PractitionerRow::as_select())
                .load::<PractitionerRow>(conn)
                .map_err(RepositoryError::from)
                .map(|rows| rows.into_iter().map(Practitioner::from).collect())
        })
        .await
    }

    async fn list_practitioners_by_specialty(
        &self,
        clinic_id: ClinicId,
        specialty_id: SpecialtyId,
    ) -> RepositoryResult<Vec<Practitioner>> {
        self.with_conn(move |conn| {
            practitioners::table
                .filter(practitioners::clinic_id.eq(clinic_id.value()))
                .filter(practitioners::specialty_id.eq(specialty_id.value()))
                .filter(practitioners::is_active.eq(true))
                .order(practitioners::practitioner_id.asc())
                .select(PractitionerRow::as_select())
                .load::<PractitionerRow>(conn)
                .map_err(RepositoryError::from)
                .map(|rows| rows.into_iter().map(Practitioner::from).collect())
        })
        .await
    }

    async fn create_practitioner(&self, practitioner: Practitioner) -> RepositoryResult<()> {
        if practitioner.consultation_duration == 0 {
            return Err(RepositoryError::validation_with_context(
                "Consultation duration must be positive",
                ErrorContext::new("create_practitioner")
                    .with_entity("practitioner")
                    .with_entity_id(practitioner.practitioner_id),
            ));
        }
        self.with_conn(move |conn| {
            diesel::insert_into(practitioners::table)
                .values(NewPractitionerRow::from(practitioner.clone()))
                .execute(conn)
                .map_err(RepositoryError::from)
                .map(|_| ())
        })
        .await
    }

    async fn get_specialty(
        &self,
        specialty_id: SpecialtyId,
    ) -> RepositoryResult<Option<Specialty>> {
        self.with_conn(move |conn| {
            specialties::table
                .find(specialty_id.value())
                .select(SpecialtyRow::as_select())
                .first::<SpecialtyRow>(conn)
                .optional()
                .map_err(RepositoryError::from)
                .map(|row| row.map(Specialty::from))
        })
        .await
    }

    async fn list_specialties(&self) -> RepositoryResult<Vec<Specialty>> {
        self.with_conn(move |conn| {
            specialties::table
                .order(specialties::name.asc())
                .select(SpecialtyRow::as_select())
                .load::<SpecialtyRow>(conn)
                .map_err(RepositoryError::from)
                .map(|rows| rows.into_iter().map(Specialty::from).collect())
        })
        .await
    }

    async fn create_specialty(&self, specialty: Specialty) -> RepositoryResult<()> {
        self.with_conn(move |conn| {
            diesel::insert_into(specialties::table)
                .values(NewSpecialtyRow {
                    specialty_id: specialty.specialty_id.value(),
                    name: specialty.name.clone(),
                    description: specialty.description.clone(),
                })
                .execute(conn)
                .map_err(RepositoryError::from)
                .map(|_| ())
        })
        .await
    }
}

#[async_trait]
impl WindowRepository for PostgresRepository {
    async fn list_active_windows(
        &self,
        practitioner_id: PractitionerId,
    ) -> RepositoryResult<Vec<AvailabilityWindow>> {
        self.with_conn(move |conn| {
            let rows = availability_windows::table
                .filter(availability_windows::practitioner_id.eq(practitioner_id.value()))
                .filter(availability_windows::is_active.eq(true))
                .order(availability_windows::start_time.asc())
                .select(WindowRow::as_select())
                .load::<WindowRow>(conn)
                .map_err(RepositoryError::from)?;
            // A malformed row is skipped, not fatal: one bad window must
            // not take down every listing for the practitioner.
            let mut windows = Vec::with_capacity(rows.len());
            for row in rows {
                match row.into_domain() {
                    Ok(window) => windows.push(window),
                    Err(e) => log::warn!("Skipping malformed availability window: {}", e),
                }
            }
            Ok(windows)
        })
        .await
    }

    async fn create_window(&self, window: AvailabilityWindow) -> RepositoryResult<()> {
        if !window.is_well_formed() {
            return Err(RepositoryError::validation_with_context(
                "Window must have exactly one of day_of_week or specific_date and start < end",
                ErrorContext::new("create_window")
                    .with_entity("window")
                    .with_entity_id(window.window_id),
            ));
        }
        self.with_conn(move |conn| {
            conn.build_transaction().serializable().run(|tx| {
                // Disjointness check and insert in one transaction.
                let existing = availability_windows::table
                    .filter(
                        availability_windows::practitioner_id.eq(window.practitioner_id.value()),
                    )
                    .filter(availability_windows::is_active.eq(true))
                    .select(WindowRow::as_select())
                    .load::<WindowRow>(tx)?;
                for row in existing {
                    let other = row.into_domain()?;
                    if other.collides_with(&window) {
                        return Err(RepositoryError::validation_with_context(
                            format!(
                                "Window {} overlaps existing window {} ({})",
                                window.interval, other.window_id, other.interval
                            ),
                            ErrorContext::new("create_window")
                                .with_entity("window")
                                .with_entity_id(window.window_id),
                        ));
                    }
                }
                diesel::insert_into(availability_windows::table)
                    .values(NewWindowRow::from(window.clone()))
                    .execute(tx)?;
                Ok(())
            })
        })
        .await
    }

    async fn set_window_active(&self, window_id: WindowId, active: bool) -> RepositoryResult<()> {
        self.with_conn(move |conn| {
            let updated = diesel::update(
                availability_windows::table.find(window_id.value()),
            )
            .set(availability_windows::is_active.eq(active))
            .execute(conn)
            .map_err(RepositoryError::from)?;
            if updated == 0 {
                return Err(RepositoryError::not_found_with_context(
                    format!("Window {} not found", window_id),
                    ErrorContext::new("set_window_active").with_entity("window"),
                ));
            }
            Ok(())
        })
        .await
    }
}

#[async_trait]
impl BookingRepository for PostgresRepository {
    async fn list_active_bookings(
        &self,
        practitioner_id: PractitionerId,
        date: NaiveDate,
    ) -> RepositoryResult<Vec<Booking>> {
        self.with_conn(move |conn| {
            let rows = bookings::table
                .filter(bookings::practitioner_id.eq(practitioner_id.value()))
                .filter(bookings::date.eq(date))
                .filter(bookings::status.ne(BookingStatus::Cancelled.as_str()))
                .order(bookings::start_time.asc())
                .select(BookingRow::as_select())
                .load::<BookingRow>(conn)
                .map_err(RepositoryError::from)?;
            rows.into_iter().map(BookingRow::into_domain).collect()
        })
        .await
    }

    async fn insert_booking_if_free(&self, new: NewBooking) -> RepositoryResult<BookingCommit> {
        self.with_conn(move |conn| {
            // Serializable isolation makes the conflict re-read and the
            // insert atomic with respect to concurrently-committing
            // bookings; a serialization failure maps to a retryable error
            // and the transaction is re-run by with_conn.
            conn.build_transaction().serializable().run(|tx| {
                let existing = bookings::table
                    .filter(bookings::practitioner_id.eq(new.practitioner_id.value()))
                    .filter(bookings::date.eq(new.date))
                    .filter(bookings::status.ne(BookingStatus::Cancelled.as_str()))
                    .select(BookingRow::as_select())
                    .load::<BookingRow>(tx)?;

                for row in existing {
                    let booking = row.into_domain()?;
                    if booking.interval.overlaps(&new.interval) {
                        return Ok(BookingCommit::Conflict);
                    }
                }

                let booking_id = BookingId::random();
                diesel::insert_into(bookings::table)
                    .values(NewBookingRow {
                        booking_id: booking_id.value(),
                        practitioner_id: new.practitioner_id.value(),
                        date: new.date,
                        start_time: new.interval.start,
                        end_time: new.interval.end,
                        patient_name: new.patient_name.clone(),
                        patient_email: new.patient_email.clone(),
                        patient_phone: new.patient_phone.clone(),
                        reason: new.reason.clone(),
                        status: BookingStatus::Pending.as_str().to_string(),
                    })
                    .execute(tx)?;

                Ok(BookingCommit::Committed(Booking {
                    booking_id,
                    practitioner_id: new.practitioner_id,
                    date: new.date,
                    interval: new.interval,
                    patient_name: new.patient_name.clone(),
                    patient_email: new.patient_email.clone(),
                    patient_phone: new.patient_phone.clone(),
                    reason: new.reason.clone(),
                    status: BookingStatus::Pending,
                }))
            })
        })
        .await
    }

    async fn list_bookings_for_practitioner(
        &self,
        practitioner_id: PractitionerId,
        date: Option<NaiveDate>,
    ) -> RepositoryResult<Vec<Booking>> {
        self.with_conn(move |conn| {
            let mut query = bookings::table
                .filter(bookings::practitioner_id.eq(practitioner_id.value()))
                .into_boxed();
            if let Some(d) = date {
                query = query.filter(bookings::date.eq(d));
            }
            let rows = query
                .order((bookings::date.asc(), bookings::start_time.asc()))
                .select(BookingRow::as_select())
                .load::<BookingRow>(conn)
                .map_err(RepositoryError::from)?;
            rows.into_iter().map(BookingRow::into_domain).collect()
        })
        .await
    }

    async fn set_booking_status(
        &self,
        booking_id: BookingId,
        status: BookingStatus,
    ) -> RepositoryResult<()> {
        self.with_conn(move |conn| {
            let updated = diesel::update(bookings::table.find(booking_id.value()))
                .set(bookings::status.eq(status.as_str()))
                .execute(conn)
                .map_err(RepositoryError::from)?;
            if updated == 0 {
                return Err(RepositoryError::not_found_with_context(
                    format!("Booking {} not found", booking_id),
                    ErrorContext::new("set_booking_status").with_entity("booking"),
                ));
            }
            Ok(())
        })
        .await
    }
}

#[async_trait]
impl FullRepository for PostgresRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        self.with_conn(|conn| {
            sql_query("SELECT 1")
                .execute(conn)
                .map(|_| true)
                .map_err(RepositoryError::from)
        })
        .await
    }
}
