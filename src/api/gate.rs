//! Request gates for the protected route groups.
//!
//! The session gate resolves the caller from the `x-user-id` header and only
//! lets the request through when a session artifact is on record; the artifact
//! is stashed in request extensions so handlers never duplicate the lookup.

use axum::{
    Json,
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::sync::Arc;
use tracing::warn;

use super::AppState;
use crate::session::SessionStore;

pub const USER_ID_HEADER: &str = "x-user-id";

fn caller(request: &Request) -> Option<String> {
    request
        .headers()
        .get(USER_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

fn reject(status: StatusCode, detail: &str) -> Response {
    (status, Json(json!({ "detail": detail }))).into_response()
}

pub async fn require_session(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(user) = caller(&request) else {
        return reject(StatusCode::BAD_REQUEST, "Missing x-user-id header");
    };

    let Some(artifact) = state.sessions.get(&user).await else {
        warn!("No session on record for {user}");
        return reject(StatusCode::UNAUTHORIZED, "Not authenticated");
    };

    request.extensions_mut().insert(artifact);

    next.run(request).await
}

pub async fn require_admin(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let Some(user) = caller(&request) else {
        return reject(StatusCode::BAD_REQUEST, "Missing x-user-id header");
    };

    if !state.privileges.is_admin(&user) {
        warn!("Admin route refused for {user}");
        return reject(StatusCode::FORBIDDEN, "Admin privileges required");
    }

    next.run(request).await
}
