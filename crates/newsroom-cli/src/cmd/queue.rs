use newsroom_core::queue::{QueueParams, QueueType, ReviewQueue, SortField, SortOrder};
use newsroom_core::types::ArticleStatus;
use std::path::Path;

use crate::cmd::open_engine;
use crate::output::{or_dash, print_json, print_table, truncate};

pub struct QueueArgs {
    pub status: Option<String>,
    pub search: Option<String>,
    pub category: Option<String>,
    pub sort_by: Option<String>,
    pub order: Option<String>,
    pub limit: Option<usize>,
}

impl QueueArgs {
    fn into_params(self) -> anyhow::Result<QueueParams> {
        Ok(QueueParams {
            status: self
                .status
                .as_deref()
                .map(str::parse::<ArticleStatus>)
                .transpose()?,
            search: self.search,
            category: self.category,
            sort_by: self
                .sort_by
                .as_deref()
                .map(str::parse::<SortField>)
                .transpose()?
                .unwrap_or_default(),
            sort_order: self
                .order
                .as_deref()
                .map(str::parse::<SortOrder>)
                .transpose()?
                .unwrap_or_default(),
            limit: self.limit,
        })
    }
}

pub fn run(root: &Path, queue: &str, args: QueueArgs, json: bool) -> anyhow::Result<()> {
    let queue_type: QueueType = queue.parse()?;
    let params = args.into_params()?;
    let (config, engine) = open_engine(root)?;
    let review_queue = ReviewQueue::new(engine.store().clone(), config.workflow.words_per_minute);
    let rows = review_queue.query(queue_type, &params)?;

    if json {
        return print_json(&serde_json::json!({
            "queue": queue_type,
            "count": rows.len(),
            "articles": rows,
        }));
    }

    if rows.is_empty() {
        println!("Nothing waiting in the {queue_type} queue.");
        return Ok(());
    }
    let table = rows
        .iter()
        .map(|r| {
            vec![
                r.id.clone(),
                truncate(&r.title, 40),
                r.status.to_string(),
                r.author_name.clone(),
                format!("{}w / {}m", r.word_count, r.read_time_minutes),
                r.submitted_at
                    .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                    .unwrap_or_else(|| or_dash(None)),
            ]
        })
        .collect();
    print_table(
        &["ID", "TITLE", "STATUS", "AUTHOR", "LENGTH", "SUBMITTED"],
        table,
    );
    Ok(())
}
