// file: src/comments/service.rs
// description: loads comment threads with reaction tallies, posts comments and reactions

use super::render::render_thread;
use super::tally::ReactionTally;
use super::thread::CommentThread;
use crate::auth::Session;
use crate::backend::PortalStore;
use crate::error::{PortalError, Result};
use crate::models::{Comment, NewComment, NewReaction, ReactionKind, ReactionTarget};
use crate::utils::Validator;
use futures::stream::{self, StreamExt};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tracing::{debug, info, warn};

const MAX_CONCURRENT_REQUESTS: usize = 8;

/// Everything needed to show one evaluation's discussion.
#[derive(Debug, Clone)]
pub struct ThreadView {
    pub evaluation_id: String,
    pub evaluation_tally: ReactionTally,
    pub thread: CommentThread,
    pub tallies: HashMap<String, ReactionTally>,
    pub authors: HashMap<String, String>,
}

impl ThreadView {
    pub fn render(&self) -> String {
        render_thread(&self.thread, &self.tallies, &self.authors)
    }
}

pub struct CommentService {
    store: Arc<dyn PortalStore>,
}

impl CommentService {
    pub fn new(store: Arc<dyn PortalStore>) -> Self {
        Self { store }
    }

    pub async fn tally(&self, target: &ReactionTarget) -> Result<ReactionTally> {
        let reactions = self.store.list_reactions(target).await?;
        Ok(ReactionTally::from_reactions(&reactions))
    }

    /// Refetches the whole comment list; per-comment tallies and author names
    /// are loaded concurrently.
    pub async fn thread(&self, evaluation_id: &str) -> Result<ThreadView> {
        let comments = self.store.list_comments(evaluation_id).await?;
        let evaluation_tally = self
            .tally(&ReactionTarget::Evaluation(evaluation_id.to_string()))
            .await?;

        let comment_ids: Vec<String> = comments.iter().map(|c| c.comment_id.clone()).collect();
        let user_ids: BTreeSet<String> = comments.iter().map(|c| c.user_id.clone()).collect();
        let thread = CommentThread::build(comments);

        let tallies = stream::iter(comment_ids.into_iter().map(|comment_id| async move {
            let tally = self
                .tally(&ReactionTarget::Comment(comment_id.clone()))
                .await;
            tally.map(|tally| (comment_id, tally))
        }))
        .buffer_unordered(MAX_CONCURRENT_REQUESTS)
        .collect::<Vec<_>>()
        .await
        .into_iter()
        .collect::<Result<HashMap<_, _>>>()?;

        let authors = stream::iter(user_ids.into_iter().map(|user_id| {
            let store = Arc::clone(&self.store);
            async move {
                match store.find_user_by_id(&user_id).await {
                    Ok(Some(user)) => Some((user_id, user.display_name().to_string())),
                    Ok(None) => None,
                    Err(e) => {
                        warn!("Could not resolve author {}: {}", user_id, e);
                        None
                    }
                }
            }
        }))
        .buffer_unordered(MAX_CONCURRENT_REQUESTS)
        .filter_map(|author| async move { author })
        .collect::<HashMap<_, _>>()
        .await;

        debug!(
            "Loaded {} comments for evaluation {}",
            thread.len(),
            evaluation_id
        );

        Ok(ThreadView {
            evaluation_id: evaluation_id.to_string(),
            evaluation_tally,
            thread,
            tallies,
            authors,
        })
    }

    async fn ensure_comment(&self, evaluation_id: &str, comment_id: &str) -> Result<()> {
        let comments = self.store.list_comments(evaluation_id).await?;
        if !comments.iter().any(|c| c.comment_id == comment_id) {
            return Err(PortalError::not_found(format!(
                "comment {} on evaluation {}",
                comment_id, evaluation_id
            )));
        }
        Ok(())
    }

    pub async fn post(
        &self,
        session: &Session,
        evaluation_id: &str,
        text: &str,
        parent_comment_id: Option<&str>,
    ) -> Result<Comment> {
        let text = text.trim();
        Validator::validate_not_blank("Comment text", text)?;

        if let Some(parent) = parent_comment_id {
            self.ensure_comment(evaluation_id, parent).await?;
        }

        let comment = self
            .store
            .insert_comment(&NewComment {
                evaluation_id: evaluation_id.to_string(),
                user_id: session.user_id.clone(),
                text: text.to_string(),
                parent_comment_id: parent_comment_id.map(str::to_string),
            })
            .await?;

        info!(
            "{} commented on evaluation {}",
            session.email, evaluation_id
        );
        Ok(comment)
    }

    /// Records a reaction on the evaluation, or on one of its comments, and
    /// returns the refreshed tally for that target.
    pub async fn react(
        &self,
        session: &Session,
        evaluation_id: &str,
        comment_id: Option<&str>,
        kind: ReactionKind,
    ) -> Result<ReactionTally> {
        let target = match comment_id {
            Some(comment_id) => {
                self.ensure_comment(evaluation_id, comment_id).await?;
                ReactionTarget::Comment(comment_id.to_string())
            }
            None => ReactionTarget::Evaluation(evaluation_id.to_string()),
        };

        self.store
            .insert_reaction(&NewReaction {
                evaluation_id: evaluation_id.to_string(),
                user_id: session.user_id.clone(),
                comment_id: comment_id.map(str::to_string),
                reaction_type: kind.emoji().to_string(),
            })
            .await?;

        debug!("{} reacted {} on {:?}", session.email, kind.name(), target);
        self.tally(&target).await
    }
}
