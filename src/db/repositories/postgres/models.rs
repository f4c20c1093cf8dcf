//! Diesel row types and conversions to the domain model.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{availability_windows, bookings, practitioners, specialties};
use crate::api::{BookingId, ClinicId, PractitionerId, SpecialtyId, WindowId};
use crate::db::repository::{RepositoryError, RepositoryResult};
use crate::models::{
    AvailabilityWindow, Booking, BookingStatus, Practitioner, Specialty, TimeInterval,
};

#[derive(Debug, Queryable, Selectable, Identifiable)]
#[diesel(table_name = specialties, primary_key(specialty_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct SpecialtyRow {
    pub specialty_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<SpecialtyRow> for Specialty {
    fn from(row: SpecialtyRow) -> Self {
        Specialty {
            specialty_id: SpecialtyId::new(row.specialty_id),
            name: row.name,
            description: row.description,
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = specialties)]
pub struct NewSpecialtyRow {
    pub specialty_id: Uuid,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Queryable, Selectable, Identifiable)]
#[diesel(table_name = practitioners, primary_key(practitioner_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct PractitionerRow {
    pub practitioner_id: Uuid,
    pub clinic_id: Uuid,
    pub specialty_id: Option<Uuid>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub consultation_duration: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<PractitionerRow> for Practitioner {
    fn from(row: PractitionerRow) -> Self {
        Practitioner {
            practitioner_id: PractitionerId::new(row.practitioner_id),
            clinic_id: ClinicId::new(row.clinic_id),
            specialty_id: row.specialty_id.map(SpecialtyId::new),
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            phone: row.phone,
            consultation_duration: row.consultation_duration.max(0) as u32,
            is_active: row.is_active,
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = practitioners)]
pub struct NewPractitionerRow {
    pub practitioner_id: Uuid,
    pub clinic_id: Uuid,
    pub specialty_id: Option<Uuid>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub consultation_duration: i32,
    pub is_active: bool,
}

impl From<Practitioner> for NewPractitionerRow {
    fn from(p: Practitioner) -> Self {
        NewPractitionerRow {
            practitioner_id: p.practitioner_id.value(),
            clinic_id: p.clinic_id.value(),
            specialty_id: p.specialty_id.map(|s| s.value()),
            first_name: p.first_name,
            last_name: p.last_name,
            email: p.email,
            phone: p.phone,
            consultation_duration: p.consultation_duration as i32,
            is_active: p.is_active,
        }
    }
}

#[derive(Debug, Queryable, Selectable, Identifiable)]
#[diesel(table_name = availability_windows, primary_key(window_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct WindowRow {
    pub window_id: Uuid,
    pub practitioner_id: Uuid,
    pub day_of_week: Option<i16>,
    pub specific_date: Option<NaiveDate>,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub is_recurring: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl WindowRow {
    pub fn into_domain(self) -> RepositoryResult<AvailabilityWindow> {
        let interval = TimeInterval::new(self.start_time, self.end_time).ok_or_else(|| {
            RepositoryError::validation(format!(
                "Window {} has inverted interval in storage",
                self.window_id
            ))
        })?;
        Ok(AvailabilityWindow {
            window_id: WindowId::new(self.window_id),
            practitioner_id: PractitionerId::new(self.practitioner_id),
            day_of_week: self.day_of_week.map(|d| d.max(0) as u8),
            specific_date: self.specific_date,
            interval,
            is_recurring: self.is_recurring,
            is_active: self.is_active,
        })
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = availability_windows)]
pub struct NewWindowRow {
    pub window_id: Uuid,
    pub practitioner_id: Uuid,
    pub day_of_week: Option<i16>,
    pub specific_date: Option<NaiveDate>,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub is_recurring: bool,
    pub is_active: bool,
}

impl From<AvailabilityWindow> for NewWindowRow {
    fn from(w: AvailabilityWindow) -> Self {
        NewWindowRow {
            window_id: w.window_id.value(),
            practitioner_id: w.practitioner_id.value(),
            day_of_week: w.day_of_week.map(|d| d as i16),
            specific_date: w.specific_date,
            start_time: w.interval.start,
            end_time: w.interval.end,
            is_recurring: w.is_recurring,
            is_active: w.is_active,
        }
    }
}

#[derive(Debug, Queryable, Selectable, Identifiable)]
#[diesel(table_name = bookings, primary_key(booking_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct BookingRow {
    pub booking_id: Uuid,
    pub practitioner_id: Uuid,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub patient_name: String,
    pub patient_email: String,
    pub patient_phone: Option<String>,
    pub reason: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl BookingRow {
    pub fn into_domain(self) -> RepositoryResult<Booking> {
        let interval = TimeInterval::new(self.start_time, self.end_time).ok_or_else(|| {
            RepositoryError::validation(format!(
                "Booking {} has inverted interval in storage",
                self.booking_id
            ))
        })?;
        let status = BookingStatus::from_str(&self.status).map_err(RepositoryError::validation)?;
        Ok(Booking {
            booking_id: BookingId::new(self.booking_id),
            practitioner_id: PractitionerId::new(self.practitioner_id),
            date: self.date,
            interval,
            patient_name: self.patient_name,
            patient_email: self.patient_email,
            patient_phone: self.patient_phone,
            reason: self.reason,
            status,
        })
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = bookings)]
pub struct NewBookingRow {
    pub booking_id: Uuid,
    pub practitioner_id: Uuid,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub patient_name: String,
    pub patient_email: String,
    pub patient_phone: Option<String>,
    pub reason: String,
    pub status: String,
}
