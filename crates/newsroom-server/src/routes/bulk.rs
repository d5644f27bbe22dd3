use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use newsroom_core::bulk::{BulkOutcome, BulkRequest};
use newsroom_core::types::{ArticleStatus, ReviewAction};
use serde::Deserialize;

use crate::actor::RequestActor;
use crate::error::AppError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct BulkActionBody {
    ids: Vec<String>,
    action: String,
    #[serde(default)]
    feedback: Option<String>,
    #[serde(default)]
    restore_to: Option<String>,
    #[serde(default)]
    timeout_secs: Option<u64>,
}

/// POST /api/articles/bulk-action: apply one action to many articles.
///
/// 200 with per-item results when the batch finishes inside the wait budget,
/// 202 with a pending notice otherwise. A pending batch keeps running.
pub async fn bulk_action(
    State(app): State<AppState>,
    RequestActor(actor): RequestActor,
    Json(body): Json<BulkActionBody>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    let action: ReviewAction = body.action.parse()?;
    let restore_to = body
        .restore_to
        .as_deref()
        .map(str::parse::<ArticleStatus>)
        .transpose()?;

    let request = BulkRequest {
        ids: body.ids,
        action,
        feedback: body.feedback,
        restore_to,
        timeout_secs: body.timeout_secs,
    };

    match app.bulk.apply(request, actor).await? {
        BulkOutcome::Completed(result) => Ok((StatusCode::OK, Json(serde_json::to_value(&result)?))),
        BulkOutcome::Pending(pending) => Ok((
            StatusCode::ACCEPTED,
            Json(serde_json::json!({
                "status": "pending",
                "total": pending.total,
                "message": pending.message,
            })),
        )),
    }
}
