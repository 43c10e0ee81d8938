use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use serde_json::json;
use std::sync::Arc;
use tracing::info;

use crate::api::AppState;

#[utoipa::path(
    get,
    path = "/admin/privileges",
    responses(
        (status = 200, description = "Current admin roster"),
        (status = 400, description = "Missing x-user-id header"),
        (status = 403, description = "Caller is not an admin")
    ),
    tag = "admin"
)]
pub async fn list(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(json!({ "admins": state.privileges.list() }))
}

#[utoipa::path(
    put,
    path = "/admin/privileges/{user}",
    responses(
        (status = 200, description = "User granted admin privileges"),
        (status = 403, description = "Caller is not an admin")
    ),
    tag = "admin"
)]
pub async fn grant(
    State(state): State<Arc<AppState>>,
    Path(user): Path<String>,
) -> impl IntoResponse {
    let granted = state.privileges.grant(&user);
    if granted {
        info!("Granted admin privileges to {user}");
    }

    Json(json!({ "user": user, "granted": granted }))
}

#[utoipa::path(
    delete,
    path = "/admin/privileges/{user}",
    responses(
        (status = 200, description = "User stripped of admin privileges"),
        (status = 403, description = "Caller is not an admin")
    ),
    tag = "admin"
)]
pub async fn revoke(
    State(state): State<Arc<AppState>>,
    Path(user): Path<String>,
) -> impl IntoResponse {
    let revoked = state.privileges.revoke(&user);
    if revoked {
        info!("Revoked admin privileges from {user}");
    }

    Json(json!({ "user": user, "revoked": revoked }))
}
