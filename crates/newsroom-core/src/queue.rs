//! Review queue aggregator: the read side that tells each role what is
//! waiting on them. Pure projection, no writes.

use crate::article::Article;
use crate::error::{NewsroomError, Result};
use crate::store::{ArticleStore, StoreQuery};
use crate::types::ArticleStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

// ---------------------------------------------------------------------------
// QueueType
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QueueType {
    SectionHead,
    Eic,
}

impl QueueType {
    pub fn statuses(self) -> &'static [ArticleStatus] {
        match self {
            QueueType::SectionHead => &[ArticleStatus::InReview, ArticleStatus::NeedsRevision],
            QueueType::Eic => &[ArticleStatus::Approved, ArticleStatus::NeedsRevision],
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            QueueType::SectionHead => "section-head",
            QueueType::Eic => "eic",
        }
    }
}

impl fmt::Display for QueueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for QueueType {
    type Err = NewsroomError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "section-head" => Ok(QueueType::SectionHead),
            "eic" | "admin" | "editor-in-chief" => Ok(QueueType::Eic),
            _ => Err(NewsroomError::InvalidQueue(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Sorting
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortField {
    #[default]
    Submitted,
    Title,
    Author,
    Updated,
}

impl std::str::FromStr for SortField {
    type Err = NewsroomError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "submitted" | "submitted-at" | "submitted_at" | "date" => Ok(SortField::Submitted),
            "title" => Ok(SortField::Title),
            "author" => Ok(SortField::Author),
            "updated" | "updated-at" | "updated_at" => Ok(SortField::Updated),
            _ => Err(NewsroomError::Validation {
                field: "sort_by",
                reason: format!("unknown sort field '{s}'"),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn apply(self, ord: Ordering) -> Ordering {
        match self {
            SortOrder::Asc => ord,
            SortOrder::Desc => ord.reverse(),
        }
    }
}

impl std::str::FromStr for SortOrder {
    type Err = NewsroomError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortOrder::Asc),
            "desc" | "descending" => Ok(SortOrder::Desc),
            _ => Err(NewsroomError::Validation {
                field: "sort_order",
                reason: format!("expected 'asc' or 'desc', got '{s}'"),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Params / summary
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
pub struct QueueParams {
    #[serde(default)]
    pub status: Option<ArticleStatus>,
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub sort_by: SortField,
    #[serde(default)]
    pub sort_order: SortOrder,
    #[serde(default)]
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ArticleSummary {
    pub id: String,
    pub title: String,
    pub status: ArticleStatus,
    pub author_id: String,
    pub author_name: String,
    pub category: Option<String>,
    pub tags: Vec<String>,
    pub word_count: usize,
    pub read_time_minutes: usize,
    pub feedback: Option<String>,
    pub reviewer_id: Option<String>,
    pub submitted_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

impl ArticleSummary {
    pub fn from_article(article: &Article, words_per_minute: usize) -> Self {
        let words = article.word_count();
        Self {
            id: article.id.clone(),
            title: article.title.clone(),
            status: article.status,
            author_id: article.author_id.clone(),
            author_name: article.author_display().to_string(),
            category: article.category.clone(),
            tags: article.tags.clone(),
            word_count: words,
            read_time_minutes: crate::article::read_time_minutes(words, words_per_minute),
            feedback: article.feedback.clone(),
            reviewer_id: article.reviewer_id.clone(),
            submitted_at: article.submitted_at,
            updated_at: article.updated_at,
        }
    }
}

// ---------------------------------------------------------------------------
// ReviewQueue
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct ReviewQueue {
    store: Arc<dyn ArticleStore>,
    words_per_minute: usize,
}

impl ReviewQueue {
    pub fn new(store: Arc<dyn ArticleStore>, words_per_minute: usize) -> Self {
        Self {
            store,
            words_per_minute,
        }
    }

    /// Translate queue parameters into a store query. A status filter only
    /// narrows the queue; a status outside it matches nothing.
    pub fn store_query(queue: QueueType, params: &QueueParams) -> StoreQuery {
        let statuses = match params.status {
            Some(status) if queue.statuses().contains(&status) => vec![status],
            Some(_) => Vec::new(),
            None => queue.statuses().to_vec(),
        };
        StoreQuery {
            statuses,
            search: params
                .search
                .as_ref()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            category: params
                .category
                .as_ref()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty() && s != "all"),
            sort_by: params.sort_by,
            sort_order: params.sort_order,
            limit: params.limit,
        }
    }

    pub fn query(&self, queue: QueueType, params: &QueueParams) -> Result<Vec<ArticleSummary>> {
        let query = Self::store_query(queue, params);
        if query.statuses.is_empty() {
            return Ok(Vec::new());
        }
        let rows = self.store.query(&query)?;
        tracing::debug!(queue = %queue, rows = rows.len(), "review queue read");
        Ok(rows
            .iter()
            .map(|a| ArticleSummary::from_article(a, self.words_per_minute))
            .collect())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
