// file: src/models/reaction.rs
// description: emoji reactions on evaluations and on individual comments

use crate::error::{PortalError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The closed set of reactions, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ReactionKind {
    Done,
    Worried,
    Repeat,
    ThumbsUp,
    ThumbsDown,
    Heart,
}

impl ReactionKind {
    pub const ALL: [ReactionKind; 6] = [
        ReactionKind::Done,
        ReactionKind::Worried,
        ReactionKind::Repeat,
        ReactionKind::ThumbsUp,
        ReactionKind::ThumbsDown,
        ReactionKind::Heart,
    ];

    /// Wire value stored in `reaction_type`.
    pub fn emoji(&self) -> &'static str {
        match self {
            ReactionKind::Done => "\u{2705}",
            ReactionKind::Worried => "\u{1F61F}",
            ReactionKind::Repeat => "\u{1F501}",
            ReactionKind::ThumbsUp => "\u{1F44D}",
            ReactionKind::ThumbsDown => "\u{1F44E}",
            ReactionKind::Heart => "\u{2764}\u{FE0F}",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ReactionKind::Done => "done",
            ReactionKind::Worried => "worried",
            ReactionKind::Repeat => "repeat",
            ReactionKind::ThumbsUp => "thumbs-up",
            ReactionKind::ThumbsDown => "thumbs-down",
            ReactionKind::Heart => "heart",
        }
    }

    pub fn from_emoji(value: &str) -> Option<Self> {
        // some clients drop the variation selector on the heart
        let value = value.trim_end_matches('\u{FE0F}');
        ReactionKind::ALL
            .into_iter()
            .find(|kind| kind.emoji().trim_end_matches('\u{FE0F}') == value)
    }
}

impl fmt::Display for ReactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.emoji())
    }
}

impl FromStr for ReactionKind {
    type Err = PortalError;

    /// Accepts either the emoji or its name (`thumbs-up`, `heart`, ...).
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        ReactionKind::from_emoji(s)
            .or_else(|| {
                ReactionKind::ALL
                    .into_iter()
                    .find(|kind| kind.name().eq_ignore_ascii_case(s))
            })
            .ok_or_else(|| PortalError::validation(format!("Unknown reaction: {}", s)))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reaction {
    pub reaction_id: String,
    pub evaluation_id: String,
    pub user_id: String,
    #[serde(default)]
    pub comment_id: Option<String>,
    pub reaction_type: String,
    #[serde(default, deserialize_with = "super::timestamp::deserialize_optional")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Reaction {
    pub fn kind(&self) -> Option<ReactionKind> {
        ReactionKind::from_emoji(&self.reaction_type)
    }
}

/// What a reaction is attached to. Evaluation reactions carry no comment id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ReactionTarget {
    Evaluation(String),
    Comment(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewReaction {
    pub evaluation_id: String,
    pub user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment_id: Option<String>,
    pub reaction_type: String,
}
