pub mod article;
pub mod bulk;
pub mod config;
pub mod init;
pub mod queue;
pub mod review;
pub mod serve;

use anyhow::Context;
use newsroom_core::config::Config;
use newsroom_core::event::TracingNotifier;
use newsroom_core::store::FileStore;
use newsroom_core::types::{ArticleStatus, Role};
use newsroom_core::workflow::{Actor, WorkflowEngine};
use std::io::{BufRead, Write};
use std::path::Path;
use std::sync::Arc;

/// Identity flags as given on the command line or via the environment.
pub struct Who {
    pub actor: Option<String>,
    pub role: Option<String>,
}

impl Who {
    pub fn require(&self) -> anyhow::Result<Actor> {
        let id = self
            .actor
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .context("--actor (or NEWSROOM_ACTOR) is required for this command")?;
        let role: Role = self
            .role
            .as_deref()
            .context("--role (or NEWSROOM_ROLE) is required for this command")?
            .parse()?;
        Ok(Actor::new(id, role))
    }
}

/// Load config and wire an engine over the file store.
pub fn open_engine(root: &Path) -> anyhow::Result<(Config, Arc<WorkflowEngine>)> {
    let config = Config::load(root).context("failed to load config")?;
    let store = Arc::new(FileStore::new(root));
    let engine = WorkflowEngine::from_config(store, Arc::new(TracingNotifier), &config.workflow);
    Ok((config, Arc::new(engine)))
}

pub fn parse_restore_to(value: Option<&str>) -> anyhow::Result<Option<ArticleStatus>> {
    Ok(value.map(str::parse::<ArticleStatus>).transpose()?)
}

/// Ask on stdin unless `yes` was given. Anything but y/yes declines.
pub fn confirm(prompt: &str, yes: bool) -> anyhow::Result<bool> {
    if yes {
        return Ok(true);
    }
    eprint!("{prompt} [y/N] ");
    std::io::stderr().flush()?;
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}
