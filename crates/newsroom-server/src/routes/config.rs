use axum::extract::State;
use axum::Json;

use crate::error::AppError;
use crate::state::AppState;

/// GET /api/config: the configuration this server was started with.
pub async fn get_config(State(app): State<AppState>) -> Result<Json<serde_json::Value>, AppError> {
    let mut json = serde_json::to_value(&*app.config)?;
    json["warnings"] = serde_json::to_value(app.config.validate())?;
    Ok(Json(json))
}
