// file: src/admin/report.rs
// description: report kinds and the flat rows they produce

use crate::error::{PortalError, Result};
use chrono::NaiveDate;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    UserActivity,
    CourseEnrollment,
    EvaluationSchedule,
    SystemUsage,
}

impl ReportKind {
    pub const ALL: [ReportKind; 4] = [
        ReportKind::UserActivity,
        ReportKind::CourseEnrollment,
        ReportKind::EvaluationSchedule,
        ReportKind::SystemUsage,
    ];

    pub fn slug(&self) -> &'static str {
        match self {
            ReportKind::UserActivity => "user-activity",
            ReportKind::CourseEnrollment => "course-enrollment",
            ReportKind::EvaluationSchedule => "evaluation-schedule",
            ReportKind::SystemUsage => "system-usage",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ReportKind::UserActivity => "User Activity Report",
            ReportKind::CourseEnrollment => "Course Enrollment Report",
            ReportKind::EvaluationSchedule => "Evaluation Schedule Report",
            ReportKind::SystemUsage => "System Usage Report",
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

impl FromStr for ReportKind {
    type Err = PortalError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        ReportKind::ALL
            .into_iter()
            .find(|kind| kind.slug().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                let known: Vec<&str> = ReportKind::ALL.iter().map(|k| k.slug()).collect();
                PortalError::validation(format!(
                    "Unknown report {:?}, expected one of: {}",
                    wanted,
                    known.join(", ")
                ))
            })
    }
}

/// Inclusive date bounds; only evaluation reports are dated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl ReportRange {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from.is_none_or(|from| date >= from) && self.to.is_none_or(|to| date <= to)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    pub label: String,
    pub detail: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub kind: ReportKind,
    pub rows: Vec<ReportRow>,
}

impl Report {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_report_kind() {
        assert_eq!(
            "Course-Enrollment".parse::<ReportKind>().unwrap(),
            ReportKind::CourseEnrollment
        );
        let err = "payroll".parse::<ReportKind>().unwrap_err();
        assert!(err.to_string().contains("user-activity"));
    }

    #[test]
    fn test_range_is_inclusive() {
        let day = |d| NaiveDate::from_ymd_opt(2025, 3, d).unwrap();
        let range = ReportRange {
            from: Some(day(3)),
            to: Some(day(5)),
        };
        assert!(range.contains(day(3)));
        assert!(range.contains(day(5)));
        assert!(!range.contains(day(6)));
        assert!(ReportRange::default().contains(day(1)));
    }
}
