// file: src/scheduling/calendar.rs
// description: per-faculty evaluation calendar with daily cap and overlap validation

use super::interval::TimeInterval;
use super::rules::SchedulingRules;
use crate::models::{Evaluation, NewEvaluation};
use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::debug;

lazy_static! {
    static ref LOAD_SUFFIX: Regex =
        Regex::new(r"\s*\(\d+/\d+\)$").expect("LOAD_SUFFIX regex is valid");
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleConflict {
    #[error("evaluations cannot be scheduled on weekends ({date} is a {weekday})")]
    Weekend { date: NaiveDate, weekday: Weekday },

    #[error("end time {end} must be after start time {start}")]
    InvalidInterval { start: NaiveTime, end: NaiveTime },

    #[error("{start}-{end} falls outside working hours {open}-{close}")]
    OutsideHours {
        start: NaiveTime,
        end: NaiveTime,
        open: NaiveTime,
        close: NaiveTime,
    },

    #[error("{time} is not on the {step}-minute grid")]
    OffGrid { time: NaiveTime, step: u32 },

    #[error("cannot add more than {limit} evaluations on {date}")]
    DailyLimitReached { date: NaiveDate, limit: usize },

    #[error("the selected time slot overlaps \"{with}\" ({interval})")]
    Overlap { with: String, interval: TimeInterval },
}

#[derive(Debug, Clone, PartialEq)]
pub struct CalendarEntry {
    pub id: Option<String>,
    pub title: String,
    pub interval: TimeInterval,
}

impl CalendarEntry {
    pub fn new(title: impl Into<String>, interval: TimeInterval) -> Self {
        Self {
            id: None,
            title: title.into(),
            interval,
        }
    }
}

impl From<&Evaluation> for CalendarEntry {
    fn from(evaluation: &Evaluation) -> Self {
        Self {
            id: Some(evaluation.evaluation_id.clone()),
            title: evaluation.title.clone(),
            interval: evaluation.interval(),
        }
    }
}

impl From<&NewEvaluation> for CalendarEntry {
    fn from(draft: &NewEvaluation) -> Self {
        Self::new(draft.title.clone(), draft.interval())
    }
}

/// The evaluations of one calendar owner.
///
/// Entries accepted through [`EvaluationCalendar::insert`] never overlap and
/// never exceed `max_per_day` on a date. Entries loaded from the backend with
/// [`EvaluationCalendar::load`] are taken as-is, since the backend is the
/// source of truth; new drafts are still checked against all of them.
#[derive(Debug, Clone)]
pub struct EvaluationCalendar {
    rules: SchedulingRules,
    entries: Vec<CalendarEntry>,
}

impl EvaluationCalendar {
    pub fn new(rules: SchedulingRules) -> Self {
        Self {
            rules,
            entries: Vec::new(),
        }
    }

    pub fn load(rules: SchedulingRules, entries: impl IntoIterator<Item = CalendarEntry>) -> Self {
        let mut entries: Vec<CalendarEntry> = entries.into_iter().collect();
        entries.sort_by_key(|entry| entry.interval.start);
        Self { rules, entries }
    }

    pub fn rules(&self) -> &SchedulingRules {
        &self.rules
    }

    pub fn entries(&self) -> &[CalendarEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries_on(&self, date: NaiveDate) -> impl Iterator<Item = &CalendarEntry> {
        self.entries
            .iter()
            .filter(move |entry| entry.interval.date() == date)
    }

    pub fn day_load(&self, date: NaiveDate) -> usize {
        self.entries_on(date).count()
    }

    /// Checks a candidate in a fixed order: weekend, interval shape, working
    /// hours, grid, daily cap, overlap. The first failure wins.
    pub fn check(&self, candidate: &CalendarEntry) -> Result<(), ScheduleConflict> {
        let interval = candidate.interval;
        let date = interval.date();

        if !self.rules.allow_weekends && SchedulingRules::is_weekend(date) {
            return Err(ScheduleConflict::Weekend {
                date,
                weekday: date.weekday(),
            });
        }

        let (start, end) = (interval.start.time(), interval.end.time());
        if !interval.is_positive() || interval.end.date() != date {
            return Err(ScheduleConflict::InvalidInterval { start, end });
        }

        if !self.rules.within_hours(start, end) {
            return Err(ScheduleConflict::OutsideHours {
                start,
                end,
                open: self.rules.day_start,
                close: self.rules.day_end,
            });
        }

        for time in [start, end] {
            if !self.rules.on_grid(time) {
                return Err(ScheduleConflict::OffGrid {
                    time,
                    step: self.rules.step_minutes,
                });
            }
        }

        if self.day_load(date) >= self.rules.max_per_day {
            return Err(ScheduleConflict::DailyLimitReached {
                date,
                limit: self.rules.max_per_day,
            });
        }

        if let Some(existing) = self
            .entries
            .iter()
            .find(|existing| existing.interval.overlaps(&interval))
        {
            return Err(ScheduleConflict::Overlap {
                with: Self::base_title(&existing.title).to_string(),
                interval: existing.interval,
            });
        }

        Ok(())
    }

    pub fn insert(&mut self, entry: CalendarEntry) -> Result<(), ScheduleConflict> {
        self.check(&entry)?;
        debug!("Calendar accepted {} at {}", entry.title, entry.interval);
        let position = self
            .entries
            .partition_point(|existing| existing.interval.start <= entry.interval.start);
        self.entries.insert(position, entry);
        Ok(())
    }

    /// `"Quiz 1 (1/2)"`: the title with the day's load, replacing any earlier suffix.
    pub fn label(&self, entry: &CalendarEntry) -> String {
        format!(
            "{} ({}/{})",
            Self::base_title(&entry.title),
            self.day_load(entry.interval.date()),
            self.rules.max_per_day
        )
    }

    pub fn base_title(title: &str) -> &str {
        match LOAD_SUFFIX.find(title) {
            Some(found) => &title[..found.start()],
            None => title,
        }
    }

    /// Entries grouped by date, in date order.
    pub fn by_day(&self) -> BTreeMap<NaiveDate, Vec<&CalendarEntry>> {
        let mut days: BTreeMap<NaiveDate, Vec<&CalendarEntry>> = BTreeMap::new();
        for entry in &self.entries {
            days.entry(entry.interval.date()).or_default().push(entry);
        }
        days
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    // 2025-03-04 is a Tuesday
    fn tuesday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 4).unwrap()
    }

    fn entry(title: &str, date: NaiveDate, start: (u32, u32), end: (u32, u32)) -> CalendarEntry {
        CalendarEntry::new(
            title,
            TimeInterval::on(
                date,
                NaiveTime::from_hms_opt(start.0, start.1, 0).unwrap(),
                NaiveTime::from_hms_opt(end.0, end.1, 0).unwrap(),
            ),
        )
    }

    fn calendar() -> EvaluationCalendar {
        let mut calendar = EvaluationCalendar::new(SchedulingRules::default());
        calendar
            .insert(entry("Quiz 1", tuesday(), (10, 0), (11, 0)))
            .unwrap();
        calendar
    }

    #[test]
    fn test_accepts_free_slot() {
        let mut calendar = calendar();
        assert!(calendar
            .insert(entry("Lab", tuesday(), (11, 0), (12, 0)))
            .is_ok());
        assert_eq!(calendar.day_load(tuesday()), 2);
    }

    #[rstest]
    #[case((9, 30), (10, 30))]
    #[case((10, 30), (11, 30))]
    #[case((10, 15), (10, 45))]
    #[case((9, 0), (12, 0))]
    fn test_rejects_overlap(#[case] start: (u32, u32), #[case] end: (u32, u32)) {
        let calendar = calendar();
        let err = calendar
            .check(&entry("Clash", tuesday(), start, end))
            .unwrap_err();
        assert!(matches!(err, ScheduleConflict::Overlap { ref with, .. } if with == "Quiz 1"));
    }

    #[test]
    fn test_daily_limit_checked_before_overlap() {
        let mut calendar = calendar();
        calendar
            .insert(entry("Mid Sem", tuesday(), (14, 0), (16, 0)))
            .unwrap();

        // overlapping and over the cap: the cap is reported
        let err = calendar
            .check(&entry("Third", tuesday(), (10, 0), (11, 0)))
            .unwrap_err();
        assert_eq!(
            err,
            ScheduleConflict::DailyLimitReached {
                date: tuesday(),
                limit: 2
            }
        );

        // other days are unaffected
        let wednesday = tuesday().succ_opt().unwrap();
        assert!(calendar
            .check(&entry("Third", wednesday, (10, 0), (11, 0)))
            .is_ok());
    }

    #[test]
    fn test_weekend_rejected_first() {
        let saturday = NaiveDate::from_ymd_opt(2025, 3, 8).unwrap();
        let err = calendar()
            .check(&entry("Sat", saturday, (11, 0), (10, 0)))
            .unwrap_err();
        assert!(matches!(err, ScheduleConflict::Weekend { weekday: Weekday::Sat, .. }));
    }

    #[test]
    fn test_weekend_allowed_when_configured() {
        let rules = SchedulingRules {
            allow_weekends: true,
            ..SchedulingRules::default()
        };
        let calendar = EvaluationCalendar::new(rules);
        let sunday = NaiveDate::from_ymd_opt(2025, 3, 9).unwrap();
        assert!(calendar.check(&entry("Sun", sunday, (9, 0), (10, 0))).is_ok());
    }

    #[rstest]
    #[case((11, 0), (11, 0))]
    #[case((12, 0), (11, 0))]
    fn test_rejects_empty_or_reversed(#[case] start: (u32, u32), #[case] end: (u32, u32)) {
        let err = calendar()
            .check(&entry("Bad", tuesday(), start, end))
            .unwrap_err();
        assert!(matches!(err, ScheduleConflict::InvalidInterval { .. }));
    }

    #[test]
    fn test_rejects_outside_hours_and_off_grid() {
        let calendar = calendar();
        assert!(matches!(
            calendar.check(&entry("Early", tuesday(), (7, 0), (8, 30))),
            Err(ScheduleConflict::OutsideHours { .. })
        ));
        assert!(matches!(
            calendar.check(&entry("Odd", tuesday(), (12, 3), (13, 0))),
            Err(ScheduleConflict::OffGrid { .. })
        ));
    }

    #[test]
    fn test_labels_reflect_day_load() {
        let mut calendar = calendar();
        calendar
            .insert(entry("Mid Sem (1/2)", tuesday(), (14, 0), (16, 0)))
            .unwrap();
        let labels: Vec<String> = calendar
            .entries()
            .iter()
            .map(|entry| calendar.label(entry))
            .collect();
        assert_eq!(labels, vec!["Quiz 1 (2/2)", "Mid Sem (2/2)"]);
    }

    #[test]
    fn test_loaded_entries_are_sorted_and_grouped() {
        let wednesday = tuesday().succ_opt().unwrap();
        let calendar = EvaluationCalendar::load(
            SchedulingRules::default(),
            vec![
                entry("B", wednesday, (9, 0), (10, 0)),
                entry("A", tuesday(), (9, 0), (10, 0)),
            ],
        );
        assert_eq!(calendar.entries()[0].title, "A");
        let days = calendar.by_day();
        assert_eq!(days.len(), 2);
        assert_eq!(days[&wednesday][0].title, "B");
    }

    #[test]
    fn test_no_overlap_invariant_holds_after_many_inserts() {
        let mut calendar = EvaluationCalendar::new(SchedulingRules::default());
        let mut date = tuesday();
        for _ in 0..5 {
            for hour in 8..17 {
                let _ = calendar.insert(entry("E", date, (hour, 0), (hour + 1, 30)));
            }
            date = date.succ_opt().unwrap();
        }

        let entries = calendar.entries();
        for (i, a) in entries.iter().enumerate() {
            for b in &entries[i + 1..] {
                assert!(!a.interval.overlaps(&b.interval));
            }
        }
        for (_, day) in calendar.by_day() {
            assert!(day.len() <= 2);
        }
    }
}
