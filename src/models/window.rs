//! Availability windows: recurring-weekly or specific-date spans during
//! which a practitioner accepts bookings.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::interval::TimeInterval;
use crate::api::{PractitionerId, WindowId};

/// An availability window for a practitioner.
///
/// Exactly one of `day_of_week` (recurring weekly, 0 = Monday .. 6 = Sunday)
/// or `specific_date` (one-off) is set; `is_recurring` records which. The
/// span never crosses midnight. Windows are written by the administrative
/// API and read-only to the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityWindow {
    pub window_id: WindowId,
    pub practitioner_id: PractitionerId,
    pub day_of_week: Option<u8>,
    pub specific_date: Option<NaiveDate>,
    pub interval: TimeInterval,
    pub is_recurring: bool,
    pub is_active: bool,
}

impl AvailabilityWindow {
    /// Whether the window's shape is internally consistent.
    ///
    /// Repositories reject malformed windows at write time; the slot
    /// generator additionally skips any that slip through, so a bad row
    /// never aborts a listing.
    pub fn is_well_formed(&self) -> bool {
        let kind_ok = if self.is_recurring {
            matches!(self.day_of_week, Some(d) if d <= 6) && self.specific_date.is_none()
        } else {
            self.specific_date.is_some() && self.day_of_week.is_none()
        };
        kind_ok && self.interval.start < self.interval.end
    }

    /// Whether this window applies to `date`: a recurring window applies
    /// iff its weekday matches, a one-off window iff its date matches.
    pub fn applies_on(&self, date: NaiveDate) -> bool {
        if self.is_recurring {
            self.day_of_week == Some(date.weekday().num_days_from_monday() as u8)
        } else {
            self.specific_date == Some(date)
        }
    }

    /// Whether two windows can cover the same instant for one practitioner.
    ///
    /// Used to enforce window disjointness at write time. Windows of
    /// different kinds collide when the one-off date falls on the recurring
    /// weekday.
    pub fn collides_with(&self, other: &AvailabilityWindow) -> bool {
        if self.practitioner_id != other.practitioner_id {
            return false;
        }
        let same_day = match (self.is_recurring, other.is_recurring) {
            (true, true) => self.day_of_week == other.day_of_week,
            (false, false) => self.specific_date == other.specific_date,
            (true, false) => {
                other.specific_date.map(|d| d.weekday().num_days_from_monday() as u8)
                    == self.day_of_week
            }
            (false, true) => {
                self.specific_date.map(|d| d.weekday().num_days_from_monday() as u8)
                    == other.day_of_week
            }
        };
        same_day && self.interval.overlaps(&other.interval)
    }
}
