// file: src/scheduling/interval.rs
// description: half-open time intervals on a single calendar date

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// `[start, end)`. Touching intervals (one ends when the next starts) do not
/// overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeInterval {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl TimeInterval {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self { start, end }
    }

    pub fn on(date: NaiveDate, start: NaiveTime, end: NaiveTime) -> Self {
        Self {
            start: date.and_time(start),
            end: date.and_time(end),
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.start.date()
    }

    pub fn is_positive(&self) -> bool {
        self.end > self.start
    }

    pub fn overlaps(&self, other: &TimeInterval) -> bool {
        self.start < other.end && self.end > other.start
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }
}

impl fmt::Display for TimeInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}-{}",
            self.start.format("%Y-%m-%d"),
            self.start.format("%H:%M"),
            self.end.format("%H:%M")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(h1: u32, m1: u32, h2: u32, m2: u32) -> TimeInterval {
        let date = NaiveDate::from_ymd_opt(2025, 3, 4).unwrap();
        TimeInterval::on(
            date,
            NaiveTime::from_hms_opt(h1, m1, 0).unwrap(),
            NaiveTime::from_hms_opt(h2, m2, 0).unwrap(),
        )
    }

    #[test]
    fn test_overlap_is_symmetric() {
        let a = at(10, 0, 11, 0);
        let b = at(10, 30, 12, 0);
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn test_touching_intervals_do_not_overlap() {
        assert!(!at(10, 0, 11, 0).overlaps(&at(11, 0, 12, 0)));
        assert!(!at(11, 0, 12, 0).overlaps(&at(10, 0, 11, 0)));
    }

    #[test]
    fn test_containment_overlaps() {
        assert!(at(9, 0, 17, 0).overlaps(&at(12, 0, 12, 30)));
    }

    #[test]
    fn test_display() {
        assert_eq!(at(9, 5, 10, 0).to_string(), "2025-03-04 09:05-10:00");
    }
}
