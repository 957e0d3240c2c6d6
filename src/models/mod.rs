// file: src/models/mod.rs
// description: data models mirrored from the backend tables
// reference: internal module structure

pub mod catalog;
pub mod comment;
pub mod evaluation;
pub mod profile;
pub mod reaction;
pub mod schedule;
pub mod timestamp;
pub mod user;

pub use catalog::{Cohort, Course, CourseUpdate, Department, Room, TimeSlot};
pub use comment::{Comment, NewComment};
pub use evaluation::{Evaluation, NewEvaluation};
pub use profile::{FacultyProfile, StudentProfile};
pub use reaction::{NewReaction, Reaction, ReactionKind, ReactionTarget};
pub use schedule::{NewSchedule, Schedule};
pub use user::{NewUser, Role, User};
