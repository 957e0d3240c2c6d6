// file: src/dashboard/mod.rs
// description: role-based summaries and catalog listings

pub mod service;

pub use service::{Dashboard, DashboardService};
