//! Single-article workflow engine.
//!
//! Applies exactly one transition to exactly one article. The engine holds
//! no per-article state; serialization of competing writers happens in the
//! store's conditional update.

use crate::article::{Article, NewArticle, StatusUpdate};
use crate::command::ReviewCommand;
use crate::config::WorkflowConfig;
use crate::error::{ErrorKind, NewsroomError, Result};
use crate::event::{Notifier, WorkflowEvent};
use crate::store::{ArticleStore, StatusSnapshot, UpdateOutcome};
use crate::transition::{self, Resolution};
use crate::types::{ArticleStatus, ReviewAction, Role};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

// ---------------------------------------------------------------------------
// Actor
// ---------------------------------------------------------------------------

/// An already-authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: String,
    pub role: Role,
}

impl Actor {
    pub fn new(id: impl Into<String>, role: Role) -> Self {
        Self {
            id: id.into(),
            role,
        }
    }
}

// ---------------------------------------------------------------------------
// WorkflowEngine
// ---------------------------------------------------------------------------

pub struct WorkflowEngine {
    store: Arc<dyn ArticleStore>,
    notifier: Arc<dyn Notifier>,
    min_feedback_chars: usize,
}

impl WorkflowEngine {
    pub fn new(store: Arc<dyn ArticleStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            store,
            notifier,
            min_feedback_chars: WorkflowConfig::default().min_feedback_chars,
        }
    }

    pub fn from_config(
        store: Arc<dyn ArticleStore>,
        notifier: Arc<dyn Notifier>,
        cfg: &WorkflowConfig,
    ) -> Self {
        Self::new(store, notifier).with_min_feedback_chars(cfg.min_feedback_chars)
    }

    pub fn with_min_feedback_chars(mut self, min: usize) -> Self {
        self.min_feedback_chars = min;
        self
    }

    pub fn store(&self) -> &Arc<dyn ArticleStore> {
        &self.store
    }

    /// Build a typed command, validating feedback against this engine's
    /// minimum length.
    pub fn command(
        &self,
        action: ReviewAction,
        feedback: Option<&str>,
        restore_to: Option<ArticleStatus>,
    ) -> Result<ReviewCommand> {
        ReviewCommand::parse(action, feedback, restore_to, self.min_feedback_chars)
    }

    /// Untyped entry point used by the HTTP and CLI layers.
    ///
    /// Checks run in this order: the `(status, action)` row exists, feedback
    /// is present and long enough, the role is admitted, the actor is the
    /// author for author-only rows. An undefined pair is therefore an invalid
    /// transition whatever feedback came with it.
    pub fn apply_action(
        &self,
        article_id: &str,
        action: ReviewAction,
        actor: &Actor,
        feedback: Option<&str>,
        restore_to: Option<ArticleStatus>,
    ) -> Result<Article> {
        let snapshot = self.snapshot(article_id)?;
        transition::rule(snapshot.status, action).inspect_err(|e| {
            tracing::debug!(article = %article_id, %action, actor = %actor.id, "rejected: {e}");
        })?;
        let command = self.command(action, feedback, restore_to).inspect_err(|e| {
            tracing::debug!(article = %article_id, %action, actor = %actor.id, "rejected: {e}");
        })?;
        let resolution = self.authorize(article_id, &snapshot, action, actor)?;
        self.commit(article_id, &command, actor, &snapshot, &resolution)
    }

    /// Apply a typed command. The command already carries valid feedback, so
    /// only the table, role and author checks remain before the conditional
    /// write. Nothing is written unless every check passes.
    pub fn apply(&self, article_id: &str, command: &ReviewCommand, actor: &Actor) -> Result<Article> {
        let snapshot = self.snapshot(article_id)?;
        let resolution = self.authorize(article_id, &snapshot, command.action(), actor)?;
        self.commit(article_id, command, actor, &snapshot, &resolution)
    }

    fn snapshot(&self, article_id: &str) -> Result<StatusSnapshot> {
        self.store
            .status(article_id)
            .map_err(|e| store_error(article_id, e))
    }

    fn authorize(
        &self,
        article_id: &str,
        snapshot: &StatusSnapshot,
        action: ReviewAction,
        actor: &Actor,
    ) -> Result<Resolution> {
        let resolution = transition::resolve(snapshot.status, action, actor.role).inspect_err(|e| {
            tracing::debug!(article = %article_id, %action, actor = %actor.id, "rejected: {e}");
        })?;

        if resolution.requires_author && !snapshot.is_authored_by(&actor.id) {
            tracing::debug!(article = %article_id, %action, actor = %actor.id, "rejected: not the author");
            return Err(NewsroomError::NotAuthor {
                id: article_id.to_string(),
                action,
            });
        }
        Ok(resolution)
    }

    fn commit(
        &self,
        article_id: &str,
        command: &ReviewCommand,
        actor: &Actor,
        snapshot: &StatusSnapshot,
        resolution: &Resolution,
    ) -> Result<Article> {
        let action = command.action();
        let to = resolution.next_status(command)?;
        let update = StatusUpdate {
            action,
            from: snapshot.status,
            to,
            actor_id: actor.id.clone(),
            reviewer_id: resolution.sets_reviewer.then(|| actor.id.clone()),
            section_head_id: resolution.sets_section_head.then(|| actor.id.clone()),
            feedback: command.feedback().map(|f| f.as_str().to_string()),
            at: Utc::now(),
        };

        match self
            .store
            .conditional_update(article_id, &update)
            .map_err(|e| store_error(article_id, e))?
        {
            UpdateOutcome::Updated(article) => {
                tracing::info!(
                    article = %article_id,
                    %action,
                    from = %update.from,
                    to = %update.to,
                    actor = %actor.id,
                    "transition applied"
                );
                self.notifier.notify(&WorkflowEvent {
                    article_id: article_id.to_string(),
                    action,
                    from: update.from,
                    to: update.to,
                    actor_id: actor.id.clone(),
                    actor_role: actor.role,
                    feedback: update.feedback,
                    at: update.at,
                });
                Ok(article)
            }
            UpdateOutcome::Conflict { actual } => {
                tracing::debug!(
                    article = %article_id,
                    %action,
                    expected = %update.from,
                    %actual,
                    "lost check-and-set race"
                );
                Err(NewsroomError::Conflict {
                    id: article_id.to_string(),
                    expected: update.from,
                    actual,
                })
            }
        }
    }

    /// Create a draft authored by `actor`.
    pub fn create_draft(&self, new: NewArticle, actor: &Actor) -> Result<Article> {
        let article = Article::draft(new, actor.id.clone())?;
        self.store
            .insert(&article)
            .map_err(|e| store_error(&article.id, e))?;
        tracing::info!(article = %article.id, author = %actor.id, "draft created");
        Ok(article)
    }

    /// Actions `actor` may take on the article right now.
    pub fn available_actions(&self, article_id: &str, actor: &Actor) -> Result<Vec<ReviewAction>> {
        let snapshot = self.snapshot(article_id)?;
        Ok(transition::available_actions(
            snapshot.status,
            actor.role,
            snapshot.is_authored_by(&actor.id),
        ))
    }
}

/// Store failures that are not domain outcomes collapse into `Persistence`.
fn store_error(article_id: &str, err: NewsroomError) -> NewsroomError {
    if err.kind() == ErrorKind::Persistence {
        tracing::warn!(article = %article_id, "store failure: {err}");
        match err {
            NewsroomError::Persistence(_) => err,
            other => NewsroomError::Persistence(other.to_string()),
        }
    } else {
        err
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
