use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use secrecy::SecretString;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::error;
use utoipa::ToSchema;

use crate::{api::AppState, auth::AuthFlow, session::SessionStore};

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub login: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SmsLoginRequest {
    pub login: Option<String>,
    pub sms_code: Option<String>,
}

fn error_response(status: StatusCode, detail: String) -> Response {
    (status, Json(json!({ "detail": detail }))).into_response()
}

#[utoipa::path(
    post,
    path = "/login/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Credentials accepted, SMS code pending", body = bool),
        (status = 400, description = "Login or password missing"),
        (status = 404, description = "Credentials rejected"),
        (status = 500, description = "Login flow failed")
    ),
    tag = "login"
)]
pub async fn login(State(state): State<Arc<AppState>>, Json(body): Json<LoginRequest>) -> Response {
    let (Some(login), Some(password)) = (body.login, body.password) else {
        return error_response(
            StatusCode::BAD_REQUEST,
            "Login and password are required".to_string(),
        );
    };

    if login.is_empty() || password.is_empty() {
        return error_response(
            StatusCode::BAD_REQUEST,
            "Login and password are required".to_string(),
        );
    }

    match state.flows.login(&login, SecretString::from(password)).await {
        Ok(true) => (StatusCode::OK, Json(json!(true))).into_response(),
        Ok(false) => error_response(
            StatusCode::NOT_FOUND,
            "Invalid credentials or user not found".to_string(),
        ),
        Err(err) => {
            error!("Login flow failed for {login}: {err}");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Authentication failed: {err}"),
            )
        }
    }
}

#[utoipa::path(
    post,
    path = "/login/sms_login",
    request_body = SmsLoginRequest,
    responses(
        (status = 200, description = "Session established, cookie returned"),
        (status = 400, description = "Login or SMS code missing"),
        (status = 404, description = "SMS code rejected or session expired"),
        (status = 500, description = "Verification flow failed")
    ),
    tag = "login"
)]
pub async fn sms_login(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SmsLoginRequest>,
) -> Response {
    let (Some(login), Some(sms_code)) = (body.login, body.sms_code) else {
        return error_response(
            StatusCode::BAD_REQUEST,
            "Login and SMS code are required".to_string(),
        );
    };

    if login.is_empty() || sms_code.is_empty() {
        return error_response(
            StatusCode::BAD_REQUEST,
            "Login and SMS code are required".to_string(),
        );
    }

    match state.flows.sms_login(&login, &sms_code).await {
        Ok(Some(artifact)) => {
            state.sessions.put(&login, artifact.clone()).await;
            (StatusCode::OK, Json(artifact.to_map())).into_response()
        }
        Ok(None) => error_response(
            StatusCode::NOT_FOUND,
            "Invalid SMS code or session expired".to_string(),
        ),
        Err(err) => {
            error!("SMS login flow failed for {login}: {err}");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("SMS authentication failed: {err}"),
            )
        }
    }
}
