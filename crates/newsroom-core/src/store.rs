//! Article store contract and the two reference stores.
//!
//! The workflow engine never writes a status blindly: every write goes
//! through [`ArticleStore::conditional_update`], which must compare the
//! stored status against `StatusUpdate::from` and write atomically with
//! that comparison.

use crate::article::{Article, StatusUpdate};
use crate::error::{NewsroomError, Result};
use crate::paths;
use crate::queue::{SortField, SortOrder};
use crate::types::ArticleStatus;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

// ---------------------------------------------------------------------------
// Contract types
// ---------------------------------------------------------------------------

/// Minimal projection the engine needs before resolving a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusSnapshot {
    pub status: ArticleStatus,
    pub author_id: String,
}

impl StatusSnapshot {
    pub fn is_authored_by(&self, actor_id: &str) -> bool {
        self.author_id == actor_id
    }
}

#[derive(Debug, Clone)]
pub enum UpdateOutcome {
    Updated(Article),
    /// The stored status no longer matched the expected one.
    Conflict { actual: ArticleStatus },
}

/// Read-side filter executed by the store.
#[derive(Debug, Clone, Default)]
pub struct StoreQuery {
    /// Empty means "any status".
    pub statuses: Vec<ArticleStatus>,
    pub search: Option<String>,
    pub category: Option<String>,
    pub sort_by: SortField,
    pub sort_order: SortOrder,
    pub limit: Option<usize>,
}

impl StoreQuery {
    pub fn matches(&self, article: &Article) -> bool {
        if !self.statuses.is_empty() && !self.statuses.contains(&article.status) {
            return false;
        }
        if let Some(category) = &self.category {
            let same = article
                .category
                .as_deref()
                .map(|c| c.eq_ignore_ascii_case(category))
                .unwrap_or(false);
            if !same {
                return false;
            }
        }
        if let Some(needle) = &self.search {
            let needle = needle.to_lowercase();
            let hit = article.title.to_lowercase().contains(&needle)
                || article.author_display().to_lowercase().contains(&needle)
                || article
                    .category
                    .as_deref()
                    .map(|c| c.to_lowercase().contains(&needle))
                    .unwrap_or(false)
                || article
                    .tags
                    .iter()
                    .any(|t| t.to_lowercase().contains(&needle));
            if !hit {
                return false;
            }
        }
        true
    }

    /// Filter, order and truncate `articles`.
    pub fn apply(&self, articles: Vec<Article>) -> Vec<Article> {
        let mut out: Vec<Article> = articles.into_iter().filter(|a| self.matches(a)).collect();
        out.sort_by(|a, b| self.compare(a, b));
        if let Some(limit) = self.limit {
            out.truncate(limit);
        }
        out
    }

    fn compare(&self, a: &Article, b: &Article) -> Ordering {
        let ord = match self.sort_by {
            SortField::Submitted => match (a.submitted_at, b.submitted_at) {
                (Some(x), Some(y)) => self.sort_order.apply(x.cmp(&y)),
                // Never-submitted articles go last in either direction.
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            },
            SortField::Title => self
                .sort_order
                .apply(a.title.to_lowercase().cmp(&b.title.to_lowercase())),
            SortField::Author => self.sort_order.apply(
                a.author_display()
                    .to_lowercase()
                    .cmp(&b.author_display().to_lowercase()),
            ),
            SortField::Updated => self.sort_order.apply(a.updated_at.cmp(&b.updated_at)),
        };
        ord.then_with(|| a.id.cmp(&b.id))
    }
}

// ---------------------------------------------------------------------------
// ArticleStore
// ---------------------------------------------------------------------------

pub trait ArticleStore: Send + Sync {
    fn get(&self, id: &str) -> Result<Article>;

    fn list(&self) -> Result<Vec<Article>>;

    /// Insert a new article. Fails with `ArticleExists` on a duplicate id.
    fn insert(&self, article: &Article) -> Result<()>;

    /// Apply `update` iff the stored status equals `update.from`.
    /// Unknown ids are `ArticleNotFound` errors.
    fn conditional_update(&self, id: &str, update: &StatusUpdate) -> Result<UpdateOutcome>;

    fn status(&self, id: &str) -> Result<StatusSnapshot> {
        let article = self.get(id)?;
        Ok(StatusSnapshot {
            status: article.status,
            author_id: article.author_id,
        })
    }

    fn query(&self, query: &StoreQuery) -> Result<Vec<Article>> {
        Ok(query.apply(self.list()?))
    }
}

// ---------------------------------------------------------------------------
// FileStore
// ---------------------------------------------------------------------------

/// YAML manifests under `.newsroom/articles/<id>/manifest.yaml`.
///
/// The check-and-set holds an exclusive `fd-lock` on the article's lock file
/// while it re-reads, compares and writes, so it is safe across threads and
/// across processes sharing the directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn load(&self, id: &str) -> Result<Article> {
        paths::validate_id(id)?;
        let manifest = paths::article_manifest(&self.root, id);
        if !manifest.exists() {
            return Err(NewsroomError::ArticleNotFound(id.to_string()));
        }
        let data = std::fs::read_to_string(&manifest)?;
        let article: Article = serde_yaml::from_str(&data)?;
        Ok(article)
    }

    fn save(&self, article: &Article) -> Result<()> {
        let manifest = paths::article_manifest(&self.root, &article.id);
        let data = serde_yaml::to_string(article)?;
        crate::io::atomic_write(&manifest, data.as_bytes())
    }

    fn open_lock(&self, id: &str) -> Result<fd_lock::RwLock<std::fs::File>> {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(paths::article_lock(&self.root, id))?;
        Ok(fd_lock::RwLock::new(file))
    }
}

impl ArticleStore for FileStore {
    fn get(&self, id: &str) -> Result<Article> {
        self.load(id)
    }

    fn list(&self) -> Result<Vec<Article>> {
        let dir = paths::articles_dir(&self.root);
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut articles = Vec::new();
        for entry in std::fs::read_dir(&dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            let id = entry.file_name().to_string_lossy().into_owned();
            match self.load(&id) {
                Ok(a) => articles.push(a),
                Err(NewsroomError::ArticleNotFound(_)) | Err(NewsroomError::InvalidId(_)) => {}
                Err(e) => return Err(e),
            }
        }
        articles.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(articles)
    }

    fn insert(&self, article: &Article) -> Result<()> {
        paths::validate_id(&article.id)?;
        crate::io::ensure_dir(&paths::articles_dir(&self.root))?;
        let dir = paths::article_dir(&self.root, &article.id);
        match std::fs::create_dir(&dir) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                return Err(NewsroomError::ArticleExists(article.id.clone()));
            }
            Err(e) => return Err(e.into()),
        }
        self.save(article)
    }

    fn conditional_update(&self, id: &str, update: &StatusUpdate) -> Result<UpdateOutcome> {
        paths::validate_id(id)?;
        if !paths::article_manifest(&self.root, id).exists() {
            return Err(NewsroomError::ArticleNotFound(id.to_string()));
        }

        let mut lock = self.open_lock(id)?;
        let _guard = lock.write()?;

        let mut article = self.load(id)?;
        if article.status != update.from {
            return Ok(UpdateOutcome::Conflict {
                actual: article.status,
            });
        }
        article.apply(update);
        self.save(&article)?;
        Ok(UpdateOutcome::Updated(article))
    }
}

// ---------------------------------------------------------------------------
// MemoryStore
// ---------------------------------------------------------------------------

/// Process-local store. The compare and the write happen under one mutex.
#[derive(Debug, Default)]
pub struct MemoryStore {
    articles: Mutex<BTreeMap<String, Article>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_articles(articles: impl IntoIterator<Item = Article>) -> Self {
        let map = articles.into_iter().map(|a| (a.id.clone(), a)).collect();
        Self {
            articles: Mutex::new(map),
        }
    }

    fn guard(&self) -> Result<std::sync::MutexGuard<'_, BTreeMap<String, Article>>> {
        self.articles
            .lock()
            .map_err(|_| NewsroomError::Persistence("memory store lock poisoned".to_string()))
    }
}

impl ArticleStore for MemoryStore {
    fn get(&self, id: &str) -> Result<Article> {
        self.guard()?
            .get(id)
            .cloned()
            .ok_or_else(|| NewsroomError::ArticleNotFound(id.to_string()))
    }

    fn list(&self) -> Result<Vec<Article>> {
        let mut articles: Vec<Article> = self.guard()?.values().cloned().collect();
        articles.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(articles)
    }

    fn insert(&self, article: &Article) -> Result<()> {
        paths::validate_id(&article.id)?;
        let mut map = self.guard()?;
        if map.contains_key(&article.id) {
            return Err(NewsroomError::ArticleExists(article.id.clone()));
        }
        map.insert(article.id.clone(), article.clone());
        Ok(())
    }

    fn conditional_update(&self, id: &str, update: &StatusUpdate) -> Result<UpdateOutcome> {
        let mut map = self.guard()?;
        let article = map
            .get_mut(id)
            .ok_or_else(|| NewsroomError::ArticleNotFound(id.to_string()))?;
        if article.status != update.from {
            return Ok(UpdateOutcome::Conflict {
                actual: article.status,
            });
        }
        article.apply(update);
        Ok(UpdateOutcome::Updated(article.clone()))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
