// file: src/evaluations/mod.rs
// description: evaluation listing and scheduling

pub mod service;

pub use service::{EvaluationDraft, EvaluationService};
