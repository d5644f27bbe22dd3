//! Bulk review actions.
//!
//! One command is applied to many articles, each through the single-article
//! engine. Items are independent: a rejected item never blocks or rolls back
//! another. The caller's timeout bounds how long we wait, not how long the
//! work runs.

use crate::command::ReviewCommand;
use crate::config::WorkflowConfig;
use crate::error::{ErrorKind, NewsroomError, Result};
use crate::types::{ArticleStatus, ReviewAction};
use crate::workflow::{Actor, WorkflowEngine};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;

// ---------------------------------------------------------------------------
// Request / result types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct BulkRequest {
    pub ids: Vec<String>,
    pub action: ReviewAction,
    #[serde(default)]
    pub feedback: Option<String>,
    #[serde(default)]
    pub restore_to: Option<ArticleStatus>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BulkItem {
    pub id: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ArticleStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<ErrorKind>,
}

impl BulkItem {
    fn applied(id: String, status: ArticleStatus) -> Self {
        Self {
            id,
            success: true,
            status: Some(status),
            error: None,
            kind: None,
        }
    }

    fn rejected(id: String, err: &NewsroomError) -> Self {
        Self {
            id,
            success: false,
            status: None,
            error: Some(err.to_string()),
            kind: Some(err.kind()),
        }
    }

    fn failed(id: String, message: impl Into<String>) -> Self {
        Self {
            id,
            success: false,
            status: None,
            error: Some(message.into()),
            kind: None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BulkActionResult {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
    pub items: Vec<BulkItem>,
}

impl BulkActionResult {
    fn from_items(items: Vec<BulkItem>) -> Self {
        let successful = items.iter().filter(|i| i.success).count();
        Self {
            total: items.len(),
            successful,
            failed: items.len() - successful,
            items,
        }
    }
}

pub enum BulkOutcome {
    Completed(BulkActionResult),
    Pending(PendingBatch),
}

/// A batch that outlived the caller's wait budget. It keeps running whether
/// or not this handle is kept.
pub struct PendingBatch {
    pub total: usize,
    pub message: String,
    handle: JoinHandle<BulkActionResult>,
    cancelled: Arc<AtomicBool>,
}

impl PendingBatch {
    /// Wait for the batch to finish.
    pub async fn wait(self) -> Result<BulkActionResult> {
        self.handle
            .await
            .map_err(|e| NewsroomError::Persistence(format!("bulk task failed: {e}")))
    }

    /// Stop dispatching items that have not started. Running items finish.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }
}

// ---------------------------------------------------------------------------
// BulkCoordinator
// ---------------------------------------------------------------------------

pub struct BulkCoordinator {
    engine: Arc<WorkflowEngine>,
    max_parallel: usize,
    default_timeout: Duration,
}

impl BulkCoordinator {
    pub fn new(engine: Arc<WorkflowEngine>, max_parallel: usize, default_timeout: Duration) -> Self {
        Self {
            engine,
            max_parallel: max_parallel.max(1),
            default_timeout,
        }
    }

    pub fn from_config(engine: Arc<WorkflowEngine>, cfg: &WorkflowConfig) -> Self {
        Self::new(engine, cfg.bulk_max_parallel, cfg.bulk_timeout())
    }

    /// Apply `request` to every id, waiting up to the request's timeout (or
    /// the configured default).
    pub async fn apply(&self, request: BulkRequest, actor: Actor) -> Result<BulkOutcome> {
        let budget = request
            .timeout_secs
            .map(Duration::from_secs)
            .unwrap_or(self.default_timeout);
        self.apply_with_timeout(request, actor, budget).await
    }

    pub async fn apply_with_timeout(
        &self,
        request: BulkRequest,
        actor: Actor,
        budget: Duration,
    ) -> Result<BulkOutcome> {
        let command = self.engine.command(
            request.action,
            request.feedback.as_deref(),
            request.restore_to,
        )?;
        if request.ids.is_empty() {
            return Err(NewsroomError::Validation {
                field: "ids",
                reason: "at least one article id is required".to_string(),
            });
        }

        let total = request.ids.len();
        let action = command.action();
        tracing::info!(%action, total, actor = %actor.id, "bulk action dispatched");

        let cancelled = Arc::new(AtomicBool::new(false));
        let mut handle = tokio::spawn(run_batch(
            Arc::clone(&self.engine),
            command,
            actor,
            request.ids,
            self.max_parallel,
            Arc::clone(&cancelled),
        ));

        match tokio::time::timeout(budget, &mut handle).await {
            Ok(Ok(result)) => {
                tracing::info!(
                    %action,
                    total,
                    successful = result.successful,
                    failed = result.failed,
                    "bulk action complete"
                );
                Ok(BulkOutcome::Completed(result))
            }
            Ok(Err(e)) => Err(NewsroomError::Persistence(format!("bulk task failed: {e}"))),
            Err(_) => {
                tracing::info!(%action, total, ?budget, "bulk action still processing after wait budget");
                Ok(BulkOutcome::Pending(PendingBatch {
                    total,
                    message: format!(
                        "{action} is still processing for {total} article(s); refresh the queue to see results"
                    ),
                    handle,
                    cancelled,
                }))
            }
        }
    }
}

async fn run_batch(
    engine: Arc<WorkflowEngine>,
    command: ReviewCommand,
    actor: Actor,
    ids: Vec<String>,
    max_parallel: usize,
    cancelled: Arc<AtomicBool>,
) -> BulkActionResult {
    let semaphore = Arc::new(Semaphore::new(max_parallel));
    let command = Arc::new(command);
    let actor = Arc::new(actor);
    let mut handles = Vec::with_capacity(ids.len());

    for id in ids.iter().cloned() {
        let sem = Arc::clone(&semaphore);
        let engine = Arc::clone(&engine);
        let command = Arc::clone(&command);
        let actor = Arc::clone(&actor);
        let cancelled = Arc::clone(&cancelled);
        handles.push(tokio::spawn(async move {
            let _permit = match sem.acquire_owned().await {
                Ok(p) => p,
                Err(_) => return BulkItem::failed(id, "semaphore closed"),
            };
            if cancelled.load(Ordering::SeqCst) {
                return BulkItem::failed(id, "cancelled");
            }
            let item_id = id.clone();
            match tokio::task::spawn_blocking(move || engine.apply(&item_id, &command, &actor)).await {
                Ok(Ok(article)) => BulkItem::applied(id, article.status),
                Ok(Err(e)) => BulkItem::rejected(id, &e),
                Err(e) => BulkItem::failed(id, format!("task join error: {e}")),
            }
        }));
    }

    let mut items = Vec::with_capacity(handles.len());
    for (id, handle) in ids.into_iter().zip(handles) {
        match handle.await {
            Ok(item) => items.push(item),
            Err(e) => items.push(BulkItem::failed(id, format!("task join error: {e}"))),
        }
    }
    BulkActionResult::from_items(items)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
