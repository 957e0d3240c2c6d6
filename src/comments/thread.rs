// file: src/comments/thread.rs
// description: builds a reply tree from the flat, parent-linked comment list

use crate::models::Comment;
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq)]
pub struct CommentNode {
    pub comment: Comment,
    pub replies: Vec<CommentNode>,
}

/// Comments of one evaluation as a forest.
///
/// Roots are comments without a parent, or whose parent is not in the list.
/// Siblings are ordered by `created_at`, then id. A comment caught in a
/// parent cycle is promoted to a root, so every input comment appears
/// exactly once.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommentThread {
    roots: Vec<CommentNode>,
}

fn sort_key(comment: &Comment) -> (bool, Option<DateTime<Utc>>, &str) {
    (
        comment.created_at.is_none(),
        comment.created_at,
        comment.comment_id.as_str(),
    )
}

impl CommentThread {
    pub fn build(comments: Vec<Comment>) -> Self {
        let mut seen = HashSet::new();
        let mut ordered: Vec<Comment> = Vec::with_capacity(comments.len());
        for comment in comments {
            if seen.insert(comment.comment_id.clone()) {
                ordered.push(comment);
            } else {
                warn!("Dropping duplicate comment {}", comment.comment_id);
            }
        }
        ordered.sort_by(|a, b| sort_key(a).cmp(&sort_key(b)));

        let order: Vec<String> = ordered.iter().map(|c| c.comment_id.clone()).collect();
        let mut root_ids = Vec::new();
        let mut children: HashMap<String, Vec<String>> = HashMap::new();
        for comment in &ordered {
            match &comment.parent_comment_id {
                Some(parent) if parent != &comment.comment_id && seen.contains(parent) => {
                    children
                        .entry(parent.clone())
                        .or_default()
                        .push(comment.comment_id.clone());
                }
                _ => root_ids.push(comment.comment_id.clone()),
            }
        }

        let mut pending: HashMap<String, Comment> = ordered
            .into_iter()
            .map(|comment| (comment.comment_id.clone(), comment))
            .collect();

        let mut roots: Vec<CommentNode> = root_ids
            .iter()
            .filter_map(|id| Self::take(id, &mut pending, &children))
            .collect();

        // whatever is left only hangs off a cycle
        let mut promoted = false;
        for id in &order {
            if pending.contains_key(id) {
                debug!("Promoting comment {} out of a reply cycle", id);
                if let Some(node) = Self::take(id, &mut pending, &children) {
                    roots.push(node);
                    promoted = true;
                }
            }
        }
        if promoted {
            roots.sort_by(|a, b| sort_key(&a.comment).cmp(&sort_key(&b.comment)));
        }

        Self { roots }
    }

    fn take(
        id: &str,
        pending: &mut HashMap<String, Comment>,
        children: &HashMap<String, Vec<String>>,
    ) -> Option<CommentNode> {
        let comment = pending.remove(id)?;
        let replies = children
            .get(id)
            .map(|ids| {
                ids.iter()
                    .filter_map(|child| Self::take(child, pending, children))
                    .collect()
            })
            .unwrap_or_default();
        Some(CommentNode { comment, replies })
    }

    pub fn roots(&self) -> &[CommentNode] {
        &self.roots
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    pub fn len(&self) -> usize {
        self.walk().len()
    }

    pub fn contains(&self, comment_id: &str) -> bool {
        self.walk()
            .iter()
            .any(|(_, comment)| comment.comment_id == comment_id)
    }

    /// Depth-first, parents before replies, with each comment's depth.
    pub fn walk(&self) -> Vec<(usize, &Comment)> {
        fn visit<'a>(node: &'a CommentNode, depth: usize, out: &mut Vec<(usize, &'a Comment)>) {
            out.push((depth, &node.comment));
            for reply in &node.replies {
                visit(reply, depth + 1, out);
            }
        }

        let mut out = Vec::new();
        for root in &self.roots {
            visit(root, 0, &mut out);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn comment(id: &str, parent: Option<&str>, minute: u32) -> Comment {
        Comment {
            comment_id: id.to_string(),
            evaluation_id: "e1".to_string(),
            user_id: "u1".to_string(),
            parent_comment_id: parent.map(str::to_string),
            text: format!("comment {}", id),
            is_edited: false,
            created_at: Some(Utc.with_ymd_and_hms(2025, 3, 4, 9, minute, 0).unwrap()),
            updated_at: None,
        }
    }

    fn shape(thread: &CommentThread) -> Vec<(usize, String)> {
        thread
            .walk()
            .into_iter()
            .map(|(depth, c)| (depth, c.comment_id.clone()))
            .collect()
    }

    #[test]
    fn test_replies_nest_in_time_order() {
        let thread = CommentThread::build(vec![
            comment("c3", Some("c1"), 5),
            comment("c1", None, 0),
            comment("c2", Some("c1"), 3),
            comment("c4", Some("c2"), 6),
            comment("c5", None, 1),
        ]);
        assert_eq!(
            shape(&thread),
            vec![
                (0, "c1".to_string()),
                (1, "c2".to_string()),
                (2, "c4".to_string()),
                (1, "c3".to_string()),
                (0, "c5".to_string()),
            ]
        );
    }

    #[test]
    fn test_orphans_become_roots() {
        let thread = CommentThread::build(vec![
            comment("c1", None, 0),
            comment("c2", Some("deleted"), 1),
        ]);
        assert_eq!(thread.roots().len(), 2);
        assert_eq!(thread.len(), 2);
    }

    #[test]
    fn test_cycles_keep_every_comment_once() {
        let thread = CommentThread::build(vec![
            comment("a", Some("b"), 0),
            comment("b", Some("a"), 1),
            comment("self", Some("self"), 2),
            comment("root", None, 3),
        ]);
        let ids: Vec<String> = shape(&thread).into_iter().map(|(_, id)| id).collect();
        assert_eq!(ids.len(), 4);
        for id in ["a", "b", "self", "root"] {
            assert!(thread.contains(id), "missing {}", id);
        }
    }

    #[test]
    fn test_ties_break_on_id() {
        let thread = CommentThread::build(vec![comment("b", None, 0), comment("a", None, 0)]);
        assert_eq!(thread.roots()[0].comment.comment_id, "a");
    }

    #[test]
    fn test_empty_thread() {
        let thread = CommentThread::build(Vec::new());
        assert!(thread.is_empty());
        assert_eq!(thread.len(), 0);
    }
}
