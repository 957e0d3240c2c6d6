// file: src/lib.rs
// description: library entry point and public api exports
// reference: rust library patterns
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/readme.md"))]

pub mod admin;
pub mod auth;
pub mod backend;
pub mod comments;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod evaluations;
pub mod models;
pub mod scheduling;
pub mod utils;

pub use admin::{AdminService, Report, ReportKind, ReportRange, UserQuery};
pub use auth::{AuthService, Registration, Session, SessionStore};
pub use backend::{MemoryStore, PortalStore, RestStore};
pub use comments::{CommentService, CommentThread, ReactionTally, ThreadView};
pub use config::{BackendConfig, Config, OfflineConfig, SchedulingConfig, SessionConfig};
pub use dashboard::{Dashboard, DashboardService};
pub use error::{PortalError, Result};
pub use evaluations::{EvaluationDraft, EvaluationService};
pub use scheduling::{EvaluationCalendar, ScheduleConflict, SchedulingRules, TimeInterval};
pub use utils::Validator;
