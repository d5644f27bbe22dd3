use serde::Serialize;
use thiserror::Error;

use crate::types::{ArticleStatus, ReviewAction, Role};

#[derive(Debug, Error)]
pub enum NewsroomError {
    #[error("not initialized: run 'newsroom init'")]
    NotInitialized,

    #[error("article not found: {0}")]
    ArticleNotFound(String),

    #[error("article already exists: {0}")]
    ArticleExists(String),

    #[error("invalid article id '{0}': must be lowercase alphanumeric with hyphens")]
    InvalidId(String),

    #[error("invalid status: {0}")]
    InvalidStatus(String),

    #[error("invalid action: {0}")]
    InvalidAction(String),

    #[error("invalid role: {0}")]
    InvalidRole(String),

    #[error("invalid queue type: {0}")]
    InvalidQueue(String),

    #[error("invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    #[error("'{action}' is not defined for an article in status '{status}'")]
    InvalidTransition {
        status: ArticleStatus,
        action: ReviewAction,
    },

    #[error("role '{role}' may not {action} an article in status '{status}'")]
    Permission {
        role: Role,
        action: ReviewAction,
        status: ArticleStatus,
    },

    #[error("only the author may {action} article '{id}'")]
    NotAuthor { id: String, action: ReviewAction },

    #[error("article '{id}' changed concurrently: expected '{expected}', found '{actual}'")]
    Conflict {
        id: String,
        expected: ArticleStatus,
        actual: ArticleStatus,
    },

    #[error("store error: {0}")]
    Persistence(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, NewsroomError>;

// ---------------------------------------------------------------------------
// ErrorKind
// ---------------------------------------------------------------------------

/// Coarse classification used by callers to decide how to present a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    Permission,
    InvalidTransition,
    Conflict,
    NotFound,
    Persistence,
    NotInitialized,
}

impl NewsroomError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            NewsroomError::NotInitialized => ErrorKind::NotInitialized,
            NewsroomError::ArticleNotFound(_) => ErrorKind::NotFound,
            NewsroomError::ArticleExists(_) => ErrorKind::Conflict,
            NewsroomError::InvalidId(_)
            | NewsroomError::InvalidStatus(_)
            | NewsroomError::InvalidAction(_)
            | NewsroomError::InvalidRole(_)
            | NewsroomError::InvalidQueue(_)
            | NewsroomError::Validation { .. } => ErrorKind::Validation,
            NewsroomError::InvalidTransition { .. } => ErrorKind::InvalidTransition,
            NewsroomError::Permission { .. } | NewsroomError::NotAuthor { .. } => {
                ErrorKind::Permission
            }
            NewsroomError::Conflict { .. } => ErrorKind::Conflict,
            NewsroomError::Persistence(_)
            | NewsroomError::Io(_)
            | NewsroomError::Yaml(_)
            | NewsroomError::Json(_) => ErrorKind::Persistence,
        }
    }
}
