// file: src/comments/render.rs
// description: plain-text rendering of a comment thread with reaction counts

use super::tally::ReactionTally;
use super::thread::CommentThread;
use std::collections::HashMap;

pub const EMPTY_THREAD: &str = "No comments yet. Be the first to comment!";

const INDENT: &str = "  ";

/// Renders replies two spaces deeper than their parent. Authors missing from
/// `authors` are shown by user id; comments without a tally get no counts line.
pub fn render_thread(
    thread: &CommentThread,
    tallies: &HashMap<String, ReactionTally>,
    authors: &HashMap<String, String>,
) -> String {
    if thread.is_empty() {
        return format!("{}\n", EMPTY_THREAD);
    }

    let mut out = String::new();
    for (depth, comment) in thread.walk() {
        let pad = INDENT.repeat(depth);
        let author = authors
            .get(&comment.user_id)
            .map(String::as_str)
            .unwrap_or(&comment.user_id);

        match comment.created_at {
            Some(at) => out.push_str(&format!(
                "{}{} • {}\n",
                pad,
                author,
                at.format("%Y-%m-%d %H:%M")
            )),
            None => out.push_str(&format!("{}{}\n", pad, author)),
        }

        for line in comment.text.lines() {
            out.push_str(&format!("{}{}\n", pad, line));
        }
        if comment.is_edited {
            out.push_str(&format!("{}(edited)\n", pad));
        }
        if let Some(tally) = tallies.get(&comment.comment_id) {
            out.push_str(&format!("{}{}\n", pad, tally));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Comment, ReactionKind};
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn comment(id: &str, user: &str, parent: Option<&str>, minute: u32, text: &str) -> Comment {
        Comment {
            comment_id: id.to_string(),
            evaluation_id: "e1".to_string(),
            user_id: user.to_string(),
            parent_comment_id: parent.map(str::to_string),
            text: text.to_string(),
            is_edited: false,
            created_at: Some(Utc.with_ymd_and_hms(2025, 3, 4, 9, minute, 0).unwrap()),
            updated_at: None,
        }
    }

    #[test]
    fn test_render_nested_thread() {
        let thread = CommentThread::build(vec![
            comment("c1", "u-student", None, 0, "Will the quiz cover recursion?"),
            comment("c2", "u-faculty", Some("c1"), 5, "Yes, chapters 3 and 4."),
            comment("c3", "u-student", Some("c2"), 7, "Thanks!"),
        ]);

        let mut tally = ReactionTally::default();
        tally.add(ReactionKind::ThumbsUp);
        let tallies = HashMap::from([("c2".to_string(), tally)]);
        let authors = HashMap::from([
            ("u-student".to_string(), "Alan Turing".to_string()),
            ("u-faculty".to_string(), "Grace Hopper".to_string()),
        ]);

        let expected = "\
Alan Turing • 2025-03-04 09:00
Will the quiz cover recursion?
  Grace Hopper • 2025-03-04 09:05
  Yes, chapters 3 and 4.
  ✅ 0  😟 0  🔁 0  👍 1  👎 0  ❤️ 0
    Alan Turing • 2025-03-04 09:07
    Thanks!
";
        assert_eq!(render_thread(&thread, &tallies, &authors), expected);
    }

    #[test]
    fn test_render_empty_thread() {
        let thread = CommentThread::build(Vec::new());
        assert_eq!(
            render_thread(&thread, &HashMap::new(), &HashMap::new()),
            "No comments yet. Be the first to comment!\n"
        );
    }

    #[test]
    fn test_unknown_author_and_missing_timestamp() {
        let mut lone = comment("c1", "u-gone", None, 0, "first line\nsecond line");
        lone.created_at = None;
        lone.is_edited = true;
        let thread = CommentThread::build(vec![lone]);
        assert_eq!(
            render_thread(&thread, &HashMap::new(), &HashMap::new()),
            "u-gone\nfirst line\nsecond line\n(edited)\n"
        );
    }
}
