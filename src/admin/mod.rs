// file: src/admin/mod.rs
// description: administration of users, courses and schedules, and reports

pub mod report;
pub mod service;

pub use report::{Report, ReportKind, ReportRange, ReportRow};
pub use service::{AdminService, FacultyMember, UserQuery};
