use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use newsroom_core::article::NewArticle;
use newsroom_core::queue::ArticleSummary;
use newsroom_core::transition;

use crate::actor::RequestActor;
use crate::error::AppError;
use crate::state::AppState;

/// GET /api/articles: summaries of every article.
pub async fn list_articles(
    State(app): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let store = app.store();
    let wpm = app.config.workflow.words_per_minute;
    let result = tokio::task::spawn_blocking(move || {
        let articles = store.list()?;
        let list: Vec<ArticleSummary> = articles
            .iter()
            .map(|a| ArticleSummary::from_article(a, wpm))
            .collect();
        Ok::<_, newsroom_core::NewsroomError>(serde_json::json!(list))
    })
    .await
    .map_err(AppError::join)??;

    Ok(Json(result))
}

/// POST /api/articles: create a draft authored by the caller.
pub async fn create_article(
    State(app): State<AppState>,
    RequestActor(actor): RequestActor,
    Json(body): Json<NewArticle>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    let engine = app.engine.clone();
    let article = tokio::task::spawn_blocking(move || engine.create_draft(body, &actor))
        .await
        .map_err(AppError::join)??;

    Ok((StatusCode::CREATED, Json(serde_json::to_value(&article)?)))
}

/// GET /api/articles/{id}: full article including history.
pub async fn get_article(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let store = app.store();
    let article = tokio::task::spawn_blocking(move || store.get(&id))
        .await
        .map_err(AppError::join)??;

    Ok(Json(serde_json::to_value(&article)?))
}

/// GET /api/articles/{id}/actions: what the caller may do next.
pub async fn get_actions(
    State(app): State<AppState>,
    RequestActor(actor): RequestActor,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let store = app.store();
    let result = tokio::task::spawn_blocking(move || {
        let snapshot = store.status(&id)?;
        let actions = transition::available_actions(
            snapshot.status,
            actor.role,
            snapshot.is_authored_by(&actor.id),
        );
        Ok::<_, newsroom_core::NewsroomError>(serde_json::json!({
            "id": id,
            "status": snapshot.status,
            "actions": actions,
        }))
    })
    .await
    .map_err(AppError::join)??;

    Ok(Json(result))
}
