use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use newsroom_core::types::Role;
use newsroom_core::workflow::Actor;
use newsroom_core::NewsroomError;

use crate::error::AppError;

pub const ACTOR_ID_HEADER: &str = "x-actor-id";
pub const ACTOR_ROLE_HEADER: &str = "x-actor-role";

/// Caller identity from `x-actor-id` / `x-actor-role`. Authentication happens
/// upstream; this only parses what the gateway forwarded.
#[derive(Debug, Clone)]
pub struct RequestActor(pub Actor);

fn header<'a>(parts: &'a Parts, name: &'static str) -> Result<&'a str, NewsroomError> {
    parts
        .headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| NewsroomError::Validation {
            field: name,
            reason: "header is required".to_string(),
        })
}

impl<S: Send + Sync> FromRequestParts<S> for RequestActor {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let id = header(parts, ACTOR_ID_HEADER)?;
        let role: Role = header(parts, ACTOR_ROLE_HEADER)?.parse()?;
        Ok(RequestActor(Actor::new(id, role)))
    }
}
