use crate::error::{NewsroomError, Result};
use crate::paths;
use crate::types::{ArticleStatus, ReviewAction};
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// StatusTransition
// ---------------------------------------------------------------------------

/// One applied workflow edge, kept on the article for audit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusTransition {
    pub action: ReviewAction,
    pub from: ArticleStatus,
    pub to: ArticleStatus,
    pub actor_id: String,
    pub at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// StatusUpdate
// ---------------------------------------------------------------------------

/// Everything a single transition writes. Built by the workflow engine and
/// handed to `ArticleStore::conditional_update`, which applies it only if the
/// stored status still equals `from`.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusUpdate {
    pub action: ReviewAction,
    pub from: ArticleStatus,
    pub to: ArticleStatus,
    pub actor_id: String,
    pub reviewer_id: Option<String>,
    pub section_head_id: Option<String>,
    pub feedback: Option<String>,
    pub at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Article
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    pub id: String,
    pub title: String,
    pub status: ArticleStatus,
    pub author_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewer_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section_head_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub history: Vec<StatusTransition>,
}

/// Fields a caller supplies when creating a draft.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewArticle {
    #[serde(default)]
    pub id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub author_name: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub content: String,
}

impl Article {
    /// Build a new `DRAFT` owned by `author_id`. A missing id is replaced by
    /// a fresh UUID.
    pub fn draft(new: NewArticle, author_id: impl Into<String>) -> Result<Self> {
        let id = match new.id {
            Some(id) => id,
            None => uuid::Uuid::new_v4().to_string(),
        };
        paths::validate_id(&id)?;

        let title = new.title.trim().to_string();
        if title.is_empty() {
            return Err(NewsroomError::Validation {
                field: "title",
                reason: "must not be empty".to_string(),
            });
        }

        let author_id = author_id.into();
        if author_id.trim().is_empty() {
            return Err(NewsroomError::Validation {
                field: "author",
                reason: "must not be empty".to_string(),
            });
        }

        let now = Utc::now();
        Ok(Self {
            id,
            title,
            status: ArticleStatus::Draft,
            author_id,
            author_name: new.author_name,
            reviewer_id: None,
            section_head_id: None,
            feedback: None,
            category: new.category,
            tags: new.tags,
            content: new.content,
            created_at: now,
            updated_at: now,
            submitted_at: None,
            history: Vec::new(),
        })
    }

    /// Apply a transition's side effects. The caller has already checked that
    /// `self.status == update.from`.
    pub fn apply(&mut self, update: &StatusUpdate) {
        self.status = update.to;
        if let Some(reviewer) = &update.reviewer_id {
            self.reviewer_id = Some(reviewer.clone());
        }
        if let Some(head) = &update.section_head_id {
            self.section_head_id = Some(head.clone());
        }
        if let Some(feedback) = &update.feedback {
            self.feedback = Some(feedback.clone());
        }
        if update.to == ArticleStatus::InReview {
            self.submitted_at = Some(update.at);
        }
        self.updated_at = update.at;
        self.history.push(StatusTransition {
            action: update.action,
            from: update.from,
            to: update.to,
            actor_id: update.actor_id.clone(),
            at: update.at,
        });
    }

    pub fn author_display(&self) -> &str {
        self.author_name.as_deref().unwrap_or(&self.author_id)
    }

    pub fn word_count(&self) -> usize {
        word_count(&self.content)
    }

    pub fn read_time_minutes(&self, words_per_minute: usize) -> usize {
        read_time_minutes(self.word_count(), words_per_minute)
    }
}

// ---------------------------------------------------------------------------
// Content metrics
// ---------------------------------------------------------------------------

static TAG_RE: OnceLock<Regex> = OnceLock::new();

fn tag_re() -> &'static Regex {
    TAG_RE.get_or_init(|| Regex::new(r"<[^>]*>").expect("markup tag pattern"))
}

/// Count words in rich-text content, ignoring markup.
pub fn word_count(content: &str) -> usize {
    let text = tag_re().replace_all(content, " ");
    text.replace("&nbsp;", " ").split_whitespace().count()
}

/// Whole minutes, rounded up, never below one.
pub fn read_time_minutes(words: usize, words_per_minute: usize) -> usize {
    let wpm = words_per_minute.max(1);
    words.div_ceil(wpm).max(1)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn new_article(title: &str) -> NewArticle {
        NewArticle {
            id: Some("council-budget".to_string()),
            title: title.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn draft_defaults() {
        let a = Article::draft(new_article("Council passes budget"), "u-ana").unwrap();
        assert_eq!(a.status, ArticleStatus::Draft);
        assert_eq!(a.author_id, "u-ana");
        assert!(a.reviewer_id.is_none());
        assert!(a.history.is_empty());
        assert!(a.submitted_at.is_none());
    }

    #[test]
    fn draft_generates_id() {
        let a = Article::draft(
            NewArticle {
                title: "Untitled".into(),
                ..Default::default()
            },
            "u-ana",
        )
        .unwrap();
        assert!(paths::validate_id(&a.id).is_ok());
    }

    #[test]
    fn draft_rejects_blank_title() {
        let err = Article::draft(new_article("   "), "u-ana").unwrap_err();
        assert!(matches!(err, NewsroomError::Validation { field: "title", .. }));
    }

    #[test]
    fn draft_rejects_bad_id() {
        let mut n = new_article("Budget");
        n.id = Some("Not An Id".into());
        assert!(matches!(
            Article::draft(n, "u-ana"),
            Err(NewsroomError::InvalidId(_))
        ));
    }

    #[test]
    fn apply_records_history_and_submission() {
        let mut a = Article::draft(new_article("Budget"), "u-ana").unwrap();
        let at = Utc::now();
        a.apply(&StatusUpdate {
            action: ReviewAction::Submit,
            from: ArticleStatus::Draft,
            to: ArticleStatus::InReview,
            actor_id: "u-ana".into(),
            reviewer_id: None,
            section_head_id: None,
            feedback: None,
            at,
        });
        assert_eq!(a.status, ArticleStatus::InReview);
        assert_eq!(a.submitted_at, Some(at));
        assert_eq!(a.history.len(), 1);
        assert_eq!(a.history[0].from, ArticleStatus::Draft);
    }

    #[test]
    fn apply_without_feedback_keeps_previous_feedback() {
        let mut a = Article::draft(new_article("Budget"), "u-ana").unwrap();
        a.status = ArticleStatus::NeedsRevision;
        a.feedback = Some("Cite the treasurer's memo".into());
        a.apply(&StatusUpdate {
            action: ReviewAction::Resubmit,
            from: ArticleStatus::NeedsRevision,
            to: ArticleStatus::InReview,
            actor_id: "u-ana".into(),
            reviewer_id: None,
            section_head_id: None,
            feedback: None,
            at: Utc::now(),
        });
        assert_eq!(a.feedback.as_deref(), Some("Cite the treasurer's memo"));
    }

    #[test]
    fn word_count_ignores_markup() {
        assert_eq!(word_count("<p>The council <b>voted</b> today.</p>"), 4);
        assert_eq!(word_count("one&nbsp;two"), 2);
        assert_eq!(word_count(""), 0);
    }

    #[test]
    fn read_time_rounds_up() {
        assert_eq!(read_time_minutes(0, 200), 1);
        assert_eq!(read_time_minutes(200, 200), 1);
        assert_eq!(read_time_minutes(201, 200), 2);
        assert_eq!(read_time_minutes(50, 0), 50);
    }

    #[test]
    fn author_display_falls_back_to_id() {
        let mut a = Article::draft(new_article("Budget"), "u-ana").unwrap();
        assert_eq!(a.author_display(), "u-ana");
        a.author_name = Some("Ana Reyes".into());
        assert_eq!(a.author_display(), "Ana Reyes");
    }

    #[test]
    fn yaml_roundtrip_omits_empty_optionals() {
        let a = Article::draft(new_article("Budget"), "u-ana").unwrap();
        let yaml = serde_yaml::to_string(&a).unwrap();
        assert!(!yaml.contains("reviewer_id"));
        assert!(yaml.contains("status: draft"));
        let back: Article = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back.id, "council-budget");
    }
}
