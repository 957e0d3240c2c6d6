// file: src/models/comment.rs
// description: evaluation comments linked into threads by parent id

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub comment_id: String,
    pub evaluation_id: String,
    pub user_id: String,
    #[serde(default)]
    pub parent_comment_id: Option<String>,
    pub text: String,
    #[serde(default)]
    pub is_edited: bool,
    #[serde(default, deserialize_with = "super::timestamp::deserialize_optional")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "super::timestamp::deserialize_optional")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewComment {
    pub evaluation_id: String,
    pub user_id: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_comment_id: Option<String>,
}
