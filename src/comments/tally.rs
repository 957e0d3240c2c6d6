// file: src/comments/tally.rs
// description: reaction counts per kind, zeros included, in display order

use crate::models::{Reaction, ReactionKind};
use std::fmt;
use tracing::debug;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReactionTally {
    counts: [usize; 6],
}

impl ReactionTally {
    /// Reactions with an unrecognised `reaction_type` are skipped.
    pub fn from_reactions<'a>(reactions: impl IntoIterator<Item = &'a Reaction>) -> Self {
        let mut tally = Self::default();
        for reaction in reactions {
            match reaction.kind() {
                Some(kind) => tally.add(kind),
                None => debug!("Skipping unknown reaction type {:?}", reaction.reaction_type),
            }
        }
        tally
    }

    pub fn add(&mut self, kind: ReactionKind) {
        self.counts[Self::slot(kind)] += 1;
    }

    pub fn count(&self, kind: ReactionKind) -> usize {
        self.counts[Self::slot(kind)]
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ReactionKind, usize)> + '_ {
        ReactionKind::ALL.into_iter().zip(self.counts.iter().copied())
    }

    fn slot(kind: ReactionKind) -> usize {
        ReactionKind::ALL
            .iter()
            .position(|candidate| *candidate == kind)
            .unwrap_or_default()
    }
}

impl fmt::Display for ReactionTally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (kind, count)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str("  ")?;
            }
            write!(f, "{} {}", kind.emoji(), count)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reaction(kind: &str) -> Reaction {
        Reaction {
            reaction_id: "r".to_string(),
            evaluation_id: "e1".to_string(),
            user_id: "u1".to_string(),
            comment_id: None,
            reaction_type: kind.to_string(),
            created_at: None,
        }
    }

    #[test]
    fn test_tally_counts_every_kind() {
        let reactions = vec![reaction("👍"), reaction("👍"), reaction("❤"), reaction("🎉")];
        let tally = ReactionTally::from_reactions(&reactions);
        assert_eq!(tally.count(ReactionKind::ThumbsUp), 2);
        assert_eq!(tally.count(ReactionKind::Heart), 1);
        assert_eq!(tally.count(ReactionKind::Done), 0);
        assert_eq!(tally.total(), 3);
        assert_eq!(tally.iter().count(), 6);
    }

    #[test]
    fn test_tally_display() {
        let mut tally = ReactionTally::default();
        tally.add(ReactionKind::Done);
        assert_eq!(tally.to_string(), "✅ 1  😟 0  🔁 0  👍 0  👎 0  ❤️ 0");
    }
}
