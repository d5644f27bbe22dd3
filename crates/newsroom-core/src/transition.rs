//! The editorial transition table.
//!
//! Every legal status change is a row here. Lookups are by
//! `(current status, action)`; the role check runs only once a row matches,
//! so an action that is undefined for a status is always reported as an
//! invalid transition regardless of who asked.

use crate::command::ReviewCommand;
use crate::error::{NewsroomError, Result};
use crate::types::{ArticleStatus, ReviewAction, Role};
use serde::Serialize;

// ---------------------------------------------------------------------------
// Rule data
// ---------------------------------------------------------------------------

/// Who may fire a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Allowed {
    /// Any actor whose role satisfies one of these.
    Roles(&'static [Role]),
    /// Only the article's author, whatever their role.
    Author,
}

impl Allowed {
    fn admits_role(self, role: Role) -> bool {
        match self {
            Allowed::Roles(roles) => roles.iter().any(|&r| role.satisfies(r)),
            Allowed::Author => true,
        }
    }
}

/// Resulting status of a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Next {
    Fixed(ArticleStatus),
    /// The caller picks one of these (see `RestoreTarget`).
    CallerSelected(&'static [ArticleStatus]),
}

#[derive(Debug, Clone, Copy)]
pub struct TransitionRule {
    pub from: ArticleStatus,
    pub action: ReviewAction,
    pub allowed: Allowed,
    pub next: Next,
    pub requires_feedback: bool,
    pub sets_reviewer: bool,
    pub sets_section_head: bool,
}

use ArticleStatus::*;

const ANY_NEWSROOM_ROLE: &[Role] = &[Role::Staff, Role::SectionHead, Role::EditorInChief];
const SECTION_HEAD: &[Role] = &[Role::SectionHead];
const EIC: &[Role] = &[Role::EditorInChief];
const EIC_OR_ADMIN: &[Role] = &[Role::EditorInChief, Role::Administrator];
const RESTORE_TARGETS: &[ArticleStatus] = &[Draft, InReview];

pub static TRANSITIONS: &[TransitionRule] = &[
    TransitionRule {
        from: Draft,
        action: ReviewAction::Submit,
        allowed: Allowed::Roles(ANY_NEWSROOM_ROLE),
        next: Next::Fixed(InReview),
        requires_feedback: false,
        sets_reviewer: false,
        sets_section_head: false,
    },
    TransitionRule {
        from: InReview,
        action: ReviewAction::ApproveToEic,
        allowed: Allowed::Roles(SECTION_HEAD),
        next: Next::Fixed(Approved),
        requires_feedback: false,
        sets_reviewer: true,
        sets_section_head: true,
    },
    TransitionRule {
        from: InReview,
        action: ReviewAction::RequestRevision,
        allowed: Allowed::Roles(SECTION_HEAD),
        next: Next::Fixed(NeedsRevision),
        requires_feedback: true,
        sets_reviewer: false,
        sets_section_head: true,
    },
    TransitionRule {
        from: Approved,
        action: ReviewAction::Publish,
        allowed: Allowed::Roles(EIC_OR_ADMIN),
        next: Next::Fixed(Published),
        requires_feedback: false,
        sets_reviewer: false,
        sets_section_head: false,
    },
    TransitionRule {
        from: Approved,
        action: ReviewAction::ReturnToSection,
        allowed: Allowed::Roles(EIC),
        next: Next::Fixed(InReview),
        requires_feedback: true,
        sets_reviewer: false,
        sets_section_head: false,
    },
    TransitionRule {
        from: NeedsRevision,
        action: ReviewAction::Resubmit,
        allowed: Allowed::Author,
        next: Next::Fixed(InReview),
        requires_feedback: false,
        sets_reviewer: false,
        sets_section_head: false,
    },
    TransitionRule {
        from: Published,
        action: ReviewAction::Archive,
        allowed: Allowed::Roles(EIC_OR_ADMIN),
        next: Next::Fixed(Archived),
        requires_feedback: false,
        sets_reviewer: false,
        sets_section_head: false,
    },
    TransitionRule {
        from: Archived,
        action: ReviewAction::Restore,
        allowed: Allowed::Roles(EIC_OR_ADMIN),
        next: Next::CallerSelected(RESTORE_TARGETS),
        requires_feedback: false,
        sets_reviewer: false,
        sets_section_head: false,
    },
];

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// Answer to "is this transition legal, and what does it produce?"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Resolution {
    #[serde(skip)]
    pub next: Next,
    pub requires_feedback: bool,
    pub sets_reviewer: bool,
    pub sets_section_head: bool,
    pub requires_author: bool,
}

impl Resolution {
    /// Concrete next status for a command. Commands are built per action, so
    /// a caller-selected row always receives a restore target.
    pub fn next_status(&self, command: &ReviewCommand) -> Result<ArticleStatus> {
        match self.next {
            Next::Fixed(status) => Ok(status),
            Next::CallerSelected(choices) => {
                let Some(target) = command.restore_target() else {
                    return Err(NewsroomError::Validation {
                        field: "restore_to",
                        reason: "a target status is required".to_string(),
                    });
                };
                let status = target.status();
                if choices.contains(&status) {
                    Ok(status)
                } else {
                    Err(NewsroomError::Validation {
                        field: "restore_to",
                        reason: format!("'{status}' is not a valid target"),
                    })
                }
            }
        }
    }
}

/// The row for `(status, action)`, if any.
pub fn find(status: ArticleStatus, action: ReviewAction) -> Option<&'static TransitionRule> {
    TRANSITIONS
        .iter()
        .find(|r| r.from == status && r.action == action)
}

/// Like `find`, but an undefined pair is an `InvalidTransition` error.
pub fn rule(status: ArticleStatus, action: ReviewAction) -> Result<&'static TransitionRule> {
    find(status, action).ok_or(NewsroomError::InvalidTransition { status, action })
}

/// Resolve a transition for a role.
///
/// Author-only rows resolve for every role with `requires_author` set; the
/// workflow engine compares the actor against the stored author.
pub fn resolve(status: ArticleStatus, action: ReviewAction, role: Role) -> Result<Resolution> {
    let rule = rule(status, action)?;

    if !rule.allowed.admits_role(role) {
        return Err(NewsroomError::Permission {
            role,
            action,
            status,
        });
    }

    Ok(Resolution {
        next: rule.next,
        requires_feedback: rule.requires_feedback,
        sets_reviewer: rule.sets_reviewer,
        sets_section_head: rule.sets_section_head,
        requires_author: matches!(rule.allowed, Allowed::Author),
    })
}

/// The one predicate call sites use instead of comparing status strings.
pub fn can_transition(status: ArticleStatus, action: ReviewAction, role: Role) -> bool {
    resolve(status, action, role).is_ok()
}

/// Actions `role` may take on an article in `status`. `is_author` decides
/// author-only rows.
pub fn available_actions(status: ArticleStatus, role: Role, is_author: bool) -> Vec<ReviewAction> {
    TRANSITIONS
        .iter()
        .filter(|r| r.from == status)
        .filter(|r| match r.allowed {
            Allowed::Author => is_author,
            allowed => allowed.admits_role(role),
        })
        .map(|r| r.action)
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_row_per_action() {
        for &action in ReviewAction::all() {
            let rows = TRANSITIONS.iter().filter(|r| r.action == action).count();
            assert_eq!(rows, 1, "action {action} should have exactly one row");
        }
    }

    #[test]
    fn undefined_pairs_are_invalid_for_every_role() {
        for &status in ArticleStatus::all() {
            for &action in ReviewAction::all() {
                if find(status, action).is_some() {
                    continue;
                }
                for &role in Role::all() {
                    let err = resolve(status, action, role).unwrap_err();
                    assert!(
                        matches!(err, NewsroomError::InvalidTransition { .. }),
                        "{status}/{action}/{role} should be invalid"
                    );
                }
            }
        }
    }

    #[test]
    fn submit_roles() {
        for role in [
            Role::Staff,
            Role::SectionHead,
            Role::EditorInChief,
            Role::Administrator,
        ] {
            assert!(can_transition(Draft, ReviewAction::Submit, role));
        }
    }

    #[test]
    fn approve_is_section_head_only() {
        assert!(can_transition(InReview, ReviewAction::ApproveToEic, Role::SectionHead));
        for role in [Role::Staff, Role::EditorInChief, Role::Administrator] {
            let err = resolve(InReview, ReviewAction::ApproveToEic, role).unwrap_err();
            assert!(matches!(err, NewsroomError::Permission { .. }));
        }
    }

    #[test]
    fn approve_sets_reviewer() {
        let r = resolve(InReview, ReviewAction::ApproveToEic, Role::SectionHead).unwrap();
        assert!(r.sets_reviewer);
        assert!(r.sets_section_head);
        assert!(!r.requires_feedback);
    }

    #[test]
    fn revision_requires_feedback_without_reviewer() {
        let r = resolve(InReview, ReviewAction::RequestRevision, Role::SectionHead).unwrap();
        assert!(r.requires_feedback);
        assert!(!r.sets_reviewer);
    }

    #[test]
    fn publish_admits_admins_not_staff() {
        assert!(can_transition(Approved, ReviewAction::Publish, Role::EditorInChief));
        assert!(can_transition(Approved, ReviewAction::Publish, Role::Administrator));
        assert!(can_transition(Approved, ReviewAction::Publish, Role::SystemAdmin));
        assert!(!can_transition(Approved, ReviewAction::Publish, Role::SectionHead));
        assert!(!can_transition(Approved, ReviewAction::Publish, Role::Staff));
    }

    #[test]
    fn return_to_section_admits_admins_as_eic() {
        assert!(can_transition(Approved, ReviewAction::ReturnToSection, Role::EditorInChief));
        assert!(can_transition(Approved, ReviewAction::ReturnToSection, Role::Administrator));
        assert!(!can_transition(Approved, ReviewAction::ReturnToSection, Role::SectionHead));
    }

    #[test]
    fn resubmit_is_author_gated() {
        let r = resolve(NeedsRevision, ReviewAction::Resubmit, Role::Staff).unwrap();
        assert!(r.requires_author);
        assert_eq!(
            available_actions(NeedsRevision, Role::Staff, true),
            vec![ReviewAction::Resubmit]
        );
        assert!(available_actions(NeedsRevision, Role::EditorInChief, false).is_empty());
    }

    #[test]
    fn restore_targets() {
        let r = resolve(Archived, ReviewAction::Restore, Role::EditorInChief).unwrap();
        let to_review = ReviewCommand::Restore {
            target: crate::command::RestoreTarget::InReview,
        };
        assert_eq!(r.next_status(&to_review).unwrap(), InReview);
        let to_draft = ReviewCommand::Restore {
            target: crate::command::RestoreTarget::Draft,
        };
        assert_eq!(r.next_status(&to_draft).unwrap(), Draft);
    }

    #[test]
    fn available_actions_for_section_head_in_review() {
        assert_eq!(
            available_actions(InReview, Role::SectionHead, false),
            vec![ReviewAction::ApproveToEic, ReviewAction::RequestRevision]
        );
        assert!(available_actions(InReview, Role::Staff, true).is_empty());
    }

    #[test]
    fn published_is_not_terminal_but_archive_only() {
        assert_eq!(
            available_actions(Published, Role::EditorInChief, true),
            vec![ReviewAction::Archive]
        );
        let err = rule(Published, ReviewAction::Publish).unwrap_err();
        assert!(matches!(err, NewsroomError::InvalidTransition { .. }));
    }
}
