// file: src/scheduling/mod.rs
// description: evaluation calendar validation
// reference: internal module structure

pub mod calendar;
pub mod interval;
pub mod rules;

pub use calendar::{CalendarEntry, EvaluationCalendar, ScheduleConflict};
pub use interval::TimeInterval;
pub use rules::SchedulingRules;
