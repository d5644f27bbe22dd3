//! Lifecycle of one user-initiated review operation.
//!
//! A front end holds exactly one `OperationState` per operation instead of a
//! set of independent "confirming"/"loading"/"error" flags. Every move is a
//! checked transition; an operation already in flight cannot be requested
//! again until it settles.

use crate::error::{ErrorKind, NewsroomError};
use crate::types::ReviewAction;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "ids", rename_all = "snake_case")]
pub enum OperationTarget {
    Article(String),
    Batch(Vec<String>),
}

impl OperationTarget {
    pub fn len(&self) -> usize {
        match self {
            OperationTarget::Article(_) => 1,
            OperationTarget::Batch(ids) => ids.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperationFailure {
    pub message: String,
    pub kind: Option<ErrorKind>,
}

impl From<&NewsroomError> for OperationFailure {
    fn from(err: &NewsroomError) -> Self {
        Self {
            message: err.to_string(),
            kind: Some(err.kind()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum OperationState<R> {
    Idle,
    Confirming {
        action: ReviewAction,
        target: OperationTarget,
    },
    InFlight {
        action: ReviewAction,
        target: OperationTarget,
    },
    Succeeded {
        result: R,
    },
    Failed {
        error: OperationFailure,
    },
}

impl<R> Default for OperationState<R> {
    fn default() -> Self {
        OperationState::Idle
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("cannot {event} while {state}")]
pub struct OperationError {
    pub state: &'static str,
    pub event: &'static str,
}

impl<R> OperationState<R> {
    pub fn name(&self) -> &'static str {
        match self {
            OperationState::Idle => "idle",
            OperationState::Confirming { .. } => "confirming",
            OperationState::InFlight { .. } => "in flight",
            OperationState::Succeeded { .. } => "succeeded",
            OperationState::Failed { .. } => "failed",
        }
    }

    pub fn is_in_flight(&self) -> bool {
        matches!(self, OperationState::InFlight { .. })
    }

    fn reject<T>(&self, event: &'static str) -> Result<T, OperationError> {
        Err(OperationError {
            state: self.name(),
            event,
        })
    }

    /// Ask for confirmation. Allowed from any settled state.
    pub fn request(self, action: ReviewAction, target: OperationTarget) -> Result<Self, OperationError> {
        match self {
            OperationState::Confirming { .. } | OperationState::InFlight { .. } => self.reject("request"),
            _ => Ok(OperationState::Confirming { action, target }),
        }
    }

    pub fn confirm(self) -> Result<Self, OperationError> {
        match self {
            OperationState::Confirming { action, target } => {
                Ok(OperationState::InFlight { action, target })
            }
            other => other.reject("confirm"),
        }
    }

    /// Back out of a confirmation prompt.
    pub fn dismiss(self) -> Result<Self, OperationError> {
        match self {
            OperationState::Confirming { .. } => Ok(OperationState::Idle),
            other => other.reject("dismiss"),
        }
    }

    pub fn succeed(self, result: R) -> Result<Self, OperationError> {
        match self {
            OperationState::InFlight { .. } => Ok(OperationState::Succeeded { result }),
            other => other.reject("succeed"),
        }
    }

    pub fn fail(self, error: OperationFailure) -> Result<Self, OperationError> {
        match self {
            OperationState::InFlight { .. } => Ok(OperationState::Failed { error }),
            other => other.reject("fail"),
        }
    }

    /// Clear a settled result.
    pub fn reset(self) -> Result<Self, OperationError> {
        match self {
            OperationState::InFlight { .. } => self.reject("reset"),
            _ => Ok(OperationState::Idle),
        }
    }

    /// Run `f` for an in-flight operation and settle on its outcome.
    pub fn run<F>(self, f: F) -> Result<Self, OperationError>
    where
        F: FnOnce(ReviewAction, &OperationTarget) -> crate::error::Result<R>,
    {
        let outcome = match &self {
            OperationState::InFlight { action, target } => f(*action, target),
            other => return other.reject("run"),
        };
        match outcome {
            Ok(result) => self.succeed(result),
            Err(e) => self.fail(OperationFailure::from(&e)),
        }
    }
}
