// file: src/comments/mod.rs
// description: comment threads, reaction tallies and their text rendering

pub mod render;
pub mod service;
pub mod tally;
pub mod thread;

pub use render::{EMPTY_THREAD, render_thread};
pub use service::{CommentService, ThreadView};
pub use tally::ReactionTally;
pub use thread::{CommentNode, CommentThread};
