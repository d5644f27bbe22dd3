use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::NewsroomError;

// ---------------------------------------------------------------------------
// ArticleStatus
// ---------------------------------------------------------------------------

/// Lifecycle state of an article. The set is closed: a status string that
/// does not parse into one of these variants is rejected at the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArticleStatus {
    Draft,
    InReview,
    NeedsRevision,
    Approved,
    Published,
    Archived,
}

impl ArticleStatus {
    pub fn all() -> &'static [ArticleStatus] {
        &[
            ArticleStatus::Draft,
            ArticleStatus::InReview,
            ArticleStatus::NeedsRevision,
            ArticleStatus::Approved,
            ArticleStatus::Published,
            ArticleStatus::Archived,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ArticleStatus::Draft => "draft",
            ArticleStatus::InReview => "in-review",
            ArticleStatus::NeedsRevision => "needs-revision",
            ArticleStatus::Approved => "approved",
            ArticleStatus::Published => "published",
            ArticleStatus::Archived => "archived",
        }
    }
}

impl fmt::Display for ArticleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ArticleStatus {
    type Err = NewsroomError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "draft" => Ok(ArticleStatus::Draft),
            "in-review" => Ok(ArticleStatus::InReview),
            "needs-revision" => Ok(ArticleStatus::NeedsRevision),
            "approved" => Ok(ArticleStatus::Approved),
            "published" => Ok(ArticleStatus::Published),
            "archived" => Ok(ArticleStatus::Archived),
            _ => Err(NewsroomError::InvalidStatus(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Role
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    Staff,
    SectionHead,
    EditorInChief,
    Administrator,
    SystemAdmin,
}

impl Role {
    pub fn all() -> &'static [Role] {
        &[
            Role::Staff,
            Role::SectionHead,
            Role::EditorInChief,
            Role::Administrator,
            Role::SystemAdmin,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Staff => "staff",
            Role::SectionHead => "section-head",
            Role::EditorInChief => "editor-in-chief",
            Role::Administrator => "administrator",
            Role::SystemAdmin => "system-admin",
        }
    }

    pub fn is_admin(self) -> bool {
        matches!(self, Role::Administrator | Role::SystemAdmin)
    }

    /// True if this role meets a requirement for `required`.
    ///
    /// Administrators hold every privilege of the editor-in-chief, so a row
    /// that names `EditorInChief` also admits both admin roles.
    pub fn satisfies(self, required: Role) -> bool {
        if self == required {
            return true;
        }
        match required {
            Role::EditorInChief | Role::Administrator => self.is_admin(),
            _ => false,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = NewsroomError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "staff" => Ok(Role::Staff),
            "section-head" => Ok(Role::SectionHead),
            "editor-in-chief" | "eic" => Ok(Role::EditorInChief),
            "administrator" | "admin" => Ok(Role::Administrator),
            "system-admin" => Ok(Role::SystemAdmin),
            _ => Err(NewsroomError::InvalidRole(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// ReviewAction
// ---------------------------------------------------------------------------

/// The request vocabulary. Distinct from [`ArticleStatus`]: the action is the
/// API surface, the status is what gets persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReviewAction {
    Submit,
    ApproveToEic,
    RequestRevision,
    ReturnToSection,
    Publish,
    Resubmit,
    Archive,
    Restore,
}

impl ReviewAction {
    pub fn all() -> &'static [ReviewAction] {
        &[
            ReviewAction::Submit,
            ReviewAction::ApproveToEic,
            ReviewAction::RequestRevision,
            ReviewAction::ReturnToSection,
            ReviewAction::Publish,
            ReviewAction::Resubmit,
            ReviewAction::Archive,
            ReviewAction::Restore,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ReviewAction::Submit => "submit",
            ReviewAction::ApproveToEic => "approve-to-eic",
            ReviewAction::RequestRevision => "request-revision",
            ReviewAction::ReturnToSection => "return-to-section",
            ReviewAction::Publish => "publish",
            ReviewAction::Resubmit => "resubmit",
            ReviewAction::Archive => "archive",
            ReviewAction::Restore => "restore",
        }
    }

    /// Past-tense label for user-facing summaries ("3 articles published").
    pub fn past_tense(self) -> &'static str {
        match self {
            ReviewAction::Submit => "submitted",
            ReviewAction::ApproveToEic => "approved",
            ReviewAction::RequestRevision => "sent back for revision",
            ReviewAction::ReturnToSection => "returned to section",
            ReviewAction::Publish => "published",
            ReviewAction::Resubmit => "resubmitted",
            ReviewAction::Archive => "archived",
            ReviewAction::Restore => "restored",
        }
    }
}

impl fmt::Display for ReviewAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ReviewAction {
    type Err = NewsroomError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "submit" => Ok(ReviewAction::Submit),
            "approve-to-eic" | "approve" => Ok(ReviewAction::ApproveToEic),
            "request-revision" => Ok(ReviewAction::RequestRevision),
            "return-to-section" => Ok(ReviewAction::ReturnToSection),
            "publish" => Ok(ReviewAction::Publish),
            "resubmit" => Ok(ReviewAction::Resubmit),
            "archive" => Ok(ReviewAction::Archive),
            "restore" => Ok(ReviewAction::Restore),
            _ => Err(NewsroomError::InvalidAction(s.to_string())),
        }
    }
}

/// Accept `IN_REVIEW`, `in_review` and `in-review` alike.
fn normalize(s: &str) -> String {
    s.trim().to_ascii_lowercase().replace('_', "-")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
