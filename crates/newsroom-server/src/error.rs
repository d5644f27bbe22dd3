use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use newsroom_core::{ErrorKind, NewsroomError};

// ---------------------------------------------------------------------------
// Timeout sentinel
// ---------------------------------------------------------------------------

/// The request stopped waiting; the transition itself may still land.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
struct StillProcessing(String);

// ---------------------------------------------------------------------------
// AppError: unified error type for HTTP responses
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

impl AppError {
    /// 504 for a wait budget that expired before the work finished.
    pub fn still_processing(msg: impl Into<String>) -> Self {
        Self(StillProcessing(msg.into()).into())
    }

    pub fn join(err: tokio::task::JoinError) -> Self {
        Self(anyhow::anyhow!("task join error: {err}"))
    }
}

pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Validation | ErrorKind::NotInitialized => StatusCode::BAD_REQUEST,
        ErrorKind::Permission => StatusCode::FORBIDDEN,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Conflict => StatusCode::CONFLICT,
        ErrorKind::InvalidTransition => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorKind::Persistence => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let Some(p) = self.0.downcast_ref::<StillProcessing>() {
            let body = serde_json::json!({ "error": p.0.clone(), "kind": "timeout" });
            return (StatusCode::GATEWAY_TIMEOUT, axum::Json(body)).into_response();
        }

        let (status, kind) = match self.0.downcast_ref::<NewsroomError>() {
            Some(e) => (status_for(e.kind()), serde_json::to_value(e.kind()).ok()),
            None => (StatusCode::INTERNAL_SERVER_ERROR, None),
        };
        if status.is_server_error() {
            tracing::error!("request failed: {:#}", self.0);
        }

        let body = serde_json::json!({
            "error": self.0.to_string(),
            "kind": kind.unwrap_or_else(|| "internal".into()),
        });
        (status, axum::Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
