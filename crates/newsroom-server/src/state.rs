use newsroom_core::bulk::BulkCoordinator;
use newsroom_core::config::Config;
use newsroom_core::event::{BroadcastNotifier, FanoutNotifier, TracingNotifier};
use newsroom_core::queue::ReviewQueue;
use newsroom_core::store::{ArticleStore, FileStore};
use newsroom_core::workflow::WorkflowEngine;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Shared server state, wired once at startup.
#[derive(Clone)]
pub struct AppState {
    pub root: PathBuf,
    pub config: Arc<Config>,
    pub engine: Arc<WorkflowEngine>,
    pub bulk: Arc<BulkCoordinator>,
    pub queue: ReviewQueue,
    pub events: BroadcastNotifier,
}

impl AppState {
    /// Load `.newsroom/config.yaml` under `root` and serve articles from the
    /// file store.
    pub fn new(root: PathBuf) -> newsroom_core::Result<Self> {
        let config = Config::load(&root)?;
        let store = Arc::new(FileStore::new(root.clone()));
        Ok(Self::with_store(root, config, store))
    }

    pub fn with_store(root: PathBuf, config: Config, store: Arc<dyn ArticleStore>) -> Self {
        let events = BroadcastNotifier::new(256);
        let notifier = FanoutNotifier::new()
            .with(TracingNotifier)
            .with(events.clone());
        let engine = Arc::new(WorkflowEngine::from_config(
            Arc::clone(&store),
            Arc::new(notifier),
            &config.workflow,
        ));
        let bulk = Arc::new(BulkCoordinator::from_config(
            Arc::clone(&engine),
            &config.workflow,
        ));
        let queue = ReviewQueue::new(store, config.workflow.words_per_minute);
        Self {
            root,
            config: Arc::new(config),
            engine,
            bulk,
            queue,
            events,
        }
    }

    pub fn single_timeout(&self) -> Duration {
        self.config.workflow.single_timeout()
    }

    pub fn store(&self) -> Arc<dyn ArticleStore> {
        Arc::clone(self.engine.store())
    }
}
