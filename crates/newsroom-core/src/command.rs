//! Typed review commands.
//!
//! A command is an action together with the payload that action needs, so a
//! revision request cannot be built without feedback and a restore cannot be
//! built without a target.

use crate::error::{NewsroomError, Result};
use crate::types::{ArticleStatus, ReviewAction};
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Feedback
// ---------------------------------------------------------------------------

/// Reviewer comment, kept exactly as written. Length is measured in
/// characters after trimming surrounding whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Feedback(String);

impl Feedback {
    pub fn new(text: &str, min_chars: usize) -> Result<Self> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(NewsroomError::Validation {
                field: "feedback",
                reason: "is required for this action".to_string(),
            });
        }
        let len = trimmed.chars().count();
        if len < min_chars {
            return Err(NewsroomError::Validation {
                field: "feedback",
                reason: format!("must be at least {min_chars} characters (got {len})"),
            });
        }
        Ok(Self(text.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Feedback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// RestoreTarget
// ---------------------------------------------------------------------------

/// Where an archived article lands when restored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RestoreTarget {
    #[default]
    Draft,
    InReview,
}

impl RestoreTarget {
    pub fn status(self) -> ArticleStatus {
        match self {
            RestoreTarget::Draft => ArticleStatus::Draft,
            RestoreTarget::InReview => ArticleStatus::InReview,
        }
    }
}

impl TryFrom<ArticleStatus> for RestoreTarget {
    type Error = NewsroomError;

    fn try_from(status: ArticleStatus) -> Result<Self> {
        match status {
            ArticleStatus::Draft => Ok(RestoreTarget::Draft),
            ArticleStatus::InReview => Ok(RestoreTarget::InReview),
            other => Err(NewsroomError::Validation {
                field: "restore_to",
                reason: format!("must be 'draft' or 'in-review', not '{other}'"),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// ReviewCommand
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewCommand {
    Submit,
    ApproveToEic,
    RequestRevision { feedback: Feedback },
    ReturnToSection { feedback: Feedback },
    Publish,
    Resubmit,
    Archive,
    Restore { target: RestoreTarget },
}

impl ReviewCommand {
    /// Build a command from loosely-typed request fields.
    ///
    /// Feedback supplied for an action that does not carry it is dropped, as
    /// is a restore target for anything but `restore`.
    pub fn parse(
        action: ReviewAction,
        feedback: Option<&str>,
        restore_to: Option<ArticleStatus>,
        min_feedback_chars: usize,
    ) -> Result<Self> {
        let required_feedback = || Feedback::new(feedback.unwrap_or(""), min_feedback_chars);
        Ok(match action {
            ReviewAction::Submit => ReviewCommand::Submit,
            ReviewAction::ApproveToEic => ReviewCommand::ApproveToEic,
            ReviewAction::RequestRevision => ReviewCommand::RequestRevision {
                feedback: required_feedback()?,
            },
            ReviewAction::ReturnToSection => ReviewCommand::ReturnToSection {
                feedback: required_feedback()?,
            },
            ReviewAction::Publish => ReviewCommand::Publish,
            ReviewAction::Resubmit => ReviewCommand::Resubmit,
            ReviewAction::Archive => ReviewCommand::Archive,
            ReviewAction::Restore => ReviewCommand::Restore {
                target: match restore_to {
                    Some(status) => RestoreTarget::try_from(status)?,
                    None => RestoreTarget::default(),
                },
            },
        })
    }

    pub fn action(&self) -> ReviewAction {
        match self {
            ReviewCommand::Submit => ReviewAction::Submit,
            ReviewCommand::ApproveToEic => ReviewAction::ApproveToEic,
            ReviewCommand::RequestRevision { .. } => ReviewAction::RequestRevision,
            ReviewCommand::ReturnToSection { .. } => ReviewAction::ReturnToSection,
            ReviewCommand::Publish => ReviewAction::Publish,
            ReviewCommand::Resubmit => ReviewAction::Resubmit,
            ReviewCommand::Archive => ReviewAction::Archive,
            ReviewCommand::Restore { .. } => ReviewAction::Restore,
        }
    }

    pub fn feedback(&self) -> Option<&Feedback> {
        match self {
            ReviewCommand::RequestRevision { feedback }
            | ReviewCommand::ReturnToSection { feedback } => Some(feedback),
            _ => None,
        }
    }

    pub fn restore_target(&self) -> Option<RestoreTarget> {
        match self {
            ReviewCommand::Restore { target } => Some(*target),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
