use axum::extract::{Path, State};
use axum::Json;
use newsroom_core::types::{ArticleStatus, ReviewAction};
use serde::Deserialize;

use crate::actor::RequestActor;
use crate::error::AppError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ReviewActionBody {
    action: String,
    #[serde(default)]
    feedback: Option<String>,
    #[serde(default)]
    restore_to: Option<String>,
}

/// POST /api/articles/{id}/review-action: apply one transition.
///
/// Waits at most `single_timeout_secs`; on expiry the transition keeps
/// running and the caller gets 504.
pub async fn review_action(
    State(app): State<AppState>,
    RequestActor(actor): RequestActor,
    Path(id): Path<String>,
    Json(body): Json<ReviewActionBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let action: ReviewAction = body.action.parse()?;
    let restore_to = body
        .restore_to
        .as_deref()
        .map(str::parse::<ArticleStatus>)
        .transpose()?;

    let engine = app.engine.clone();
    let article_id = id.clone();
    let mut handle = tokio::task::spawn_blocking(move || {
        engine.apply_action(
            &article_id,
            action,
            &actor,
            body.feedback.as_deref(),
            restore_to,
        )
    });

    let article = match tokio::time::timeout(app.single_timeout(), &mut handle).await {
        Ok(joined) => joined.map_err(AppError::join)??,
        Err(_) => {
            tracing::warn!(article = %id, %action, "review action still processing after wait budget");
            return Err(AppError::still_processing(format!(
                "{action} on '{id}' is still processing; refresh to see the result"
            )));
        }
    };

    Ok(Json(serde_json::json!({
        "id": article.id,
        "action": action,
        "status": article.status,
        "message": format!("article {}", action.past_tense()),
        "article": article,
    })))
}
