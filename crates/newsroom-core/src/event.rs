use crate::types::{ArticleStatus, ReviewAction, Role};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

// ---------------------------------------------------------------------------
// WorkflowEvent
// ---------------------------------------------------------------------------

/// Emitted once per applied transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowEvent {
    pub article_id: String,
    pub action: ReviewAction,
    pub from: ArticleStatus,
    pub to: ArticleStatus,
    pub actor_id: String,
    pub actor_role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
    pub at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Notifier
// ---------------------------------------------------------------------------

/// Downstream consumer of workflow events. Delivery is fire-and-forget: a
/// notifier must not fail the transition that produced the event.
pub trait Notifier: Send + Sync {
    fn notify(&self, event: &WorkflowEvent);
}

/// Logs each event through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, event: &WorkflowEvent) {
        tracing::info!(
            article = %event.article_id,
            action = %event.action,
            from = %event.from,
            to = %event.to,
            actor = %event.actor_id,
            "workflow event"
        );
    }
}

/// Fans events out to in-process subscribers (the server's SSE stream).
#[derive(Debug, Clone)]
pub struct BroadcastNotifier {
    tx: broadcast::Sender<WorkflowEvent>,
}

impl BroadcastNotifier {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<WorkflowEvent> {
        self.tx.subscribe()
    }
}

impl Notifier for BroadcastNotifier {
    fn notify(&self, event: &WorkflowEvent) {
        // No subscribers is not an error.
        let _ = self.tx.send(event.clone());
    }
}

/// Delivers to several notifiers in order.
#[derive(Default)]
pub struct FanoutNotifier {
    targets: Vec<Box<dyn Notifier>>,
}

impl FanoutNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, notifier: impl Notifier + 'static) -> Self {
        self.targets.push(Box::new(notifier));
        self
    }
}

impl Notifier for FanoutNotifier {
    fn notify(&self, event: &WorkflowEvent) {
        for target in &self.targets {
            target.notify(event);
        }
    }
}
