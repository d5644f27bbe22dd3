use crate::error::{NewsroomError, Result};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const NEWSROOM_DIR: &str = ".newsroom";
pub const ARTICLES_DIR: &str = ".newsroom/articles";

pub const CONFIG_FILE: &str = ".newsroom/config.yaml";

pub const MANIFEST_FILE: &str = "manifest.yaml";
pub const LOCK_FILE: &str = ".lock";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn newsroom_dir(root: &Path) -> PathBuf {
    root.join(NEWSROOM_DIR)
}

pub fn articles_dir(root: &Path) -> PathBuf {
    root.join(ARTICLES_DIR)
}

pub fn article_dir(root: &Path, id: &str) -> PathBuf {
    articles_dir(root).join(id)
}

pub fn article_manifest(root: &Path, id: &str) -> PathBuf {
    article_dir(root, id).join(MANIFEST_FILE)
}

/// Per-article lock file guarding the check-and-set in `FileStore`.
pub fn article_lock(root: &Path, id: &str) -> PathBuf {
    article_dir(root, id).join(LOCK_FILE)
}

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

// ---------------------------------------------------------------------------
// Id validation
// ---------------------------------------------------------------------------

static ID_RE: OnceLock<Regex> = OnceLock::new();

fn id_re() -> &'static Regex {
    ID_RE.get_or_init(|| {
        Regex::new(r"^[a-z0-9][a-z0-9\-]*[a-z0-9]$|^[a-z0-9]$").expect("article id pattern")
    })
}

/// Article ids double as directory names, so they are restricted to
/// lowercase alphanumerics and inner hyphens. Hyphenated UUIDs qualify.
pub fn validate_id(id: &str) -> Result<()> {
    if id.is_empty() || id.len() > 64 || !id_re().is_match(id) {
        return Err(NewsroomError::InvalidId(id.to_string()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
