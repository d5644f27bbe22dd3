use axum::extract::{Path, Query, State};
use axum::Json;
use newsroom_core::queue::{QueueParams, QueueType, SortField, SortOrder};
use newsroom_core::types::ArticleStatus;
use serde::Deserialize;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Deserialize, Default)]
pub struct QueueQuery {
    status: Option<String>,
    search: Option<String>,
    category: Option<String>,
    sort_by: Option<String>,
    sort_order: Option<String>,
    limit: Option<usize>,
}

impl QueueQuery {
    fn into_params(self) -> newsroom_core::Result<QueueParams> {
        let status = match self.status.as_deref().map(str::trim) {
            None | Some("") | Some("all") => None,
            Some(s) => Some(s.parse::<ArticleStatus>()?),
        };
        Ok(QueueParams {
            status,
            search: self.search,
            category: self.category,
            sort_by: self
                .sort_by
                .as_deref()
                .map(str::parse::<SortField>)
                .transpose()?
                .unwrap_or_default(),
            sort_order: self
                .sort_order
                .as_deref()
                .map(str::parse::<SortOrder>)
                .transpose()?
                .unwrap_or_default(),
            limit: self.limit,
        })
    }
}

/// GET /api/review-queue/{queue}: articles waiting on a role.
pub async fn review_queue(
    State(app): State<AppState>,
    Path(queue): Path<String>,
    Query(query): Query<QueueQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let queue_type: QueueType = queue.parse()?;
    let params = query.into_params()?;
    let review_queue = app.queue.clone();
    let rows = tokio::task::spawn_blocking(move || review_queue.query(queue_type, &params))
        .await
        .map_err(AppError::join)??;

    Ok(Json(serde_json::json!({
        "queue": queue_type,
        "count": rows.len(),
        "articles": rows,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_status_means_no_filter() {
        let params = QueueQuery {
            status: Some("all".into()),
            ..Default::default()
        }
        .into_params()
        .unwrap();
        assert!(params.status.is_none());
    }

    #[test]
    fn parses_wire_values() {
        let params = QueueQuery {
            status: Some("NEEDS_REVISION".into()),
            sort_by: Some("title".into()),
            sort_order: Some("asc".into()),
            ..Default::default()
        }
        .into_params()
        .unwrap();
        assert_eq!(params.status, Some(ArticleStatus::NeedsRevision));
        assert_eq!(params.sort_by, SortField::Title);
        assert_eq!(params.sort_order, SortOrder::Asc);
    }

    #[test]
    fn bad_sort_order_is_rejected() {
        let err = QueueQuery {
            sort_order: Some("sideways".into()),
            ..Default::default()
        }
        .into_params()
        .unwrap_err();
        assert_eq!(err.kind(), newsroom_core::ErrorKind::Validation);
    }
}
