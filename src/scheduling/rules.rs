// file: src/scheduling/rules.rs
// description: working-hours window, time grid and weekend policy for evaluations

use crate::config::SchedulingConfig;
use chrono::{Datelike, Duration, NaiveDate, NaiveTime, Timelike, Weekday};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulingRules {
    pub max_per_day: usize,
    pub day_start: NaiveTime,
    pub day_end: NaiveTime,
    pub step_minutes: u32,
    pub allow_weekends: bool,
}

impl SchedulingRules {
    pub fn is_weekend(date: NaiveDate) -> bool {
        matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
    }

    pub fn within_hours(&self, start: NaiveTime, end: NaiveTime) -> bool {
        start >= self.day_start && end <= self.day_end
    }

    pub fn on_grid(&self, time: NaiveTime) -> bool {
        time.second() == 0
            && time.nanosecond() == 0
            && time.minute() % self.step_minutes.max(1) == 0
    }

    /// Selectable start/end times, `day_start..=day_end` in grid steps.
    pub fn time_options(&self) -> Vec<NaiveTime> {
        let step = Duration::minutes(i64::from(self.step_minutes.max(1)));
        let mut options = Vec::new();
        let mut current = self.day_start;
        while current <= self.day_end {
            options.push(current);
            let (next, wrapped) = current.overflowing_add_signed(step);
            if wrapped != 0 {
                break;
            }
            current = next;
        }
        options
    }
}

impl Default for SchedulingRules {
    fn default() -> Self {
        Self {
            max_per_day: 2,
            day_start: NaiveTime::from_hms_opt(8, 0, 0).unwrap_or_default(),
            day_end: NaiveTime::from_hms_opt(17, 55, 0).unwrap_or_default(),
            step_minutes: 5,
            allow_weekends: false,
        }
    }
}

impl From<&SchedulingConfig> for SchedulingRules {
    fn from(config: &SchedulingConfig) -> Self {
        Self {
            max_per_day: config.max_per_day,
            day_start: config.day_start,
            day_end: config.day_end,
            step_minutes: config.step_minutes,
            allow_weekends: config.allow_weekends,
        }
    }
}
