//! Half-open time intervals within a single civil day.
//!
//! All overlap testing in the engine uses half-open `[start, end)`
//! semantics: a booking ending at 10:00 does not conflict with one starting
//! at 10:00. Intervals never cross midnight; that is an invariant of
//! availability windows and bookings alike.

use chrono::{Duration, NaiveTime};
use serde::{Deserialize, Serialize};

/// A half-open interval `[start, end)` of times-of-day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeInterval {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl TimeInterval {
    /// Create an interval, returning `None` if it is not well-formed
    /// (`start >= end`).
    pub fn new(start: NaiveTime, end: NaiveTime) -> Option<Self> {
        if start < end {
            Some(Self { start, end })
        } else {
            None
        }
    }

    /// Whether two half-open intervals overlap.
    pub fn overlaps(&self, other: &TimeInterval) -> bool {
        !(self.end <= other.start || self.start >= other.end)
    }

    /// Interval length in whole minutes.
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    /// The interval of `duration` minutes starting at `start`, or `None` if
    /// it would cross midnight.
    pub fn starting_at(start: NaiveTime, duration_minutes: i64) -> Option<Self> {
        let (end, wrapped) = start.overflowing_add_signed(Duration::minutes(duration_minutes));
        if wrapped != 0 {
            return None;
        }
        Self::new(start, end)
    }
}

impl std::fmt::Display for TimeInterval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}-{}",
            self.start.format("%H:%M"),
            self.end.format("%H:%M")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::TimeInterval;
    use chrono::NaiveTime;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_new_rejects_inverted() {
        assert!(TimeInterval::new(t(10, 0), t(9, 0)).is_none());
        assert!(TimeInterval::new(t(10, 0), t(10, 0)).is_none());
        assert!(TimeInterval::new(t(9, 0), t(10, 0)).is_some());
    }

    #[test]
    fn test_adjacent_intervals_do_not_overlap() {
        let a = TimeInterval::new(t(9, 0), t(9, 30)).unwrap();
        let b = TimeInterval::new(t(9, 30), t(10, 0)).unwrap();
        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));
    }

    #[test]
    fn test_partial_overlap() {
        let a = TimeInterval::new(t(9, 0), t(10, 0)).unwrap();
        let b = TimeInterval::new(t(9, 30), t(10, 30)).unwrap();
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn test_containment_overlaps() {
        let outer = TimeInterval::new(t(9, 0), t(12, 0)).unwrap();
        let inner = TimeInterval::new(t(10, 0), t(10, 30)).unwrap();
        assert!(outer.overlaps(&inner));
        assert!(inner.overlaps(&outer));
    }

    #[test]
    fn test_identical_intervals_overlap() {
        let a = TimeInterval::new(t(9, 0), t(9, 30)).unwrap();
        assert!(a.overlaps(&a));
    }

    #[test]
    fn test_duration_minutes() {
        let a = TimeInterval::new(t(9, 0), t(12, 0)).unwrap();
        assert_eq!(a.duration_minutes(), 180);
    }

    #[test]
    fn test_starting_at() {
        let a = TimeInterval::starting_at(t(11, 30), 30).unwrap();
        assert_eq!(a.end, t(12, 0));
    }

    #[test]
    fn test_starting_at_rejects_midnight_crossing() {
        assert!(TimeInterval::starting_at(t(23, 45), 30).is_none());
        // An interval ending exactly at midnight wraps to 00:00 and is
        // rejected as well; windows may not touch the day boundary.
        assert!(TimeInterval::starting_at(t(23, 30), 30).is_none());
    }
}
