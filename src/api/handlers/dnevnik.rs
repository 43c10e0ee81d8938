//! Diary endpoints, all behind the session gate.
//!
//! The gate injects the caller's [`SessionArtifact`] into request extensions,
//! so these handlers only forward it to the diary client and map "no data"
//! to `404`.

use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::sync::Arc;

use crate::{api::AppState, session::SessionArtifact};

fn data_response(data: Option<serde_json::Value>) -> Response {
    match data {
        Some(value) => (StatusCode::OK, Json(value)).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "detail": "Data not found" })),
        )
            .into_response(),
    }
}

#[utoipa::path(
    post,
    path = "/dnevnik/get_person_data",
    responses(
        (status = 200, description = "Profile data for the stored session"),
        (status = 400, description = "Missing x-user-id header"),
        (status = 401, description = "No session on record"),
        (status = 404, description = "Data not found")
    ),
    tag = "dnevnik"
)]
pub async fn person_data(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionArtifact>,
) -> Response {
    data_response(state.dnevnik.person_data(&session).await)
}

#[utoipa::path(
    post,
    path = "/dnevnik/get_summary_marks",
    responses(
        (status = 200, description = "Summary marks for today"),
        (status = 404, description = "Data not found")
    ),
    tag = "dnevnik"
)]
pub async fn summary_marks(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionArtifact>,
) -> Response {
    data_response(state.dnevnik.summary_marks(&session).await)
}

#[utoipa::path(
    post,
    path = "/dnevnik/get_diary",
    responses(
        (status = 200, description = "Diary entries for today"),
        (status = 404, description = "Data not found")
    ),
    tag = "dnevnik"
)]
pub async fn diary(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionArtifact>,
) -> Response {
    data_response(state.dnevnik.diary(&session).await)
}

#[utoipa::path(
    post,
    path = "/dnevnik/get_week_schedule",
    responses(
        (status = 200, description = "Schedule for the current week"),
        (status = 404, description = "Data not found")
    ),
    tag = "dnevnik"
)]
pub async fn week_schedule(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionArtifact>,
) -> Response {
    data_response(state.dnevnik.week_schedule(&session).await)
}

#[utoipa::path(
    post,
    path = "/dnevnik/get_school_info",
    responses(
        (status = 200, description = "School details"),
        (status = 404, description = "Data not found")
    ),
    tag = "dnevnik"
)]
pub async fn school_info(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionArtifact>,
) -> Response {
    data_response(state.dnevnik.school_info(&session).await)
}

#[utoipa::path(
    post,
    path = "/dnevnik/get_homework_from_range",
    responses(
        (status = 200, description = "Homework for the default range"),
        (status = 404, description = "Data not found")
    ),
    tag = "dnevnik"
)]
pub async fn homework_from_range(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionArtifact>,
) -> Response {
    data_response(state.dnevnik.homework_from_range(&session).await)
}

#[utoipa::path(
    post,
    path = "/dnevnik/get_missed_lessons",
    responses(
        (status = 200, description = "Missed lessons"),
        (status = 404, description = "Data not found")
    ),
    tag = "dnevnik"
)]
pub async fn missed_lessons(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionArtifact>,
) -> Response {
    data_response(state.dnevnik.missed_lessons(&session).await)
}
