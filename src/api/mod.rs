use anyhow::Result;
use axum::{
    Json, Router,
    body::Body,
    extract::MatchedPath,
    http::{HeaderName, HeaderValue, Request},
    middleware,
    response::IntoResponse,
    routing::{get, post, put},
};
use std::sync::Arc;
use tokio::{net::TcpListener, signal};
use tower::ServiceBuilder;
use tower_http::{
    request_id::PropagateRequestIdLayer, set_header::SetRequestHeaderLayer, trace::TraceLayer,
};
use tracing::{info, info_span, Span};
use ulid::Ulid;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::AuthFlow,
    dnevnik::DnevnikClient,
    jar::RetentionTimer,
    session::{Privileges, SessionStore},
};

pub mod gate;
pub mod handlers;
mod openapi;

/// Shared service wiring for every handler.
pub struct AppState {
    pub flows: Arc<dyn AuthFlow>,
    pub sessions: Arc<dyn SessionStore>,
    pub privileges: Privileges,
    pub dnevnik: DnevnikClient,
}

/// Build the application router.
///
/// The `/dnevnik` routes sit behind the session gate and the `/admin` routes
/// behind the admin gate; everything else is open.
#[must_use]
pub fn router(state: Arc<AppState>) -> Router {
    let dnevnik = Router::new()
        .route("/dnevnik/get_person_data", post(handlers::dnevnik::person_data))
        .route(
            "/dnevnik/get_summary_marks",
            post(handlers::dnevnik::summary_marks),
        )
        .route("/dnevnik/get_diary", post(handlers::dnevnik::diary))
        .route(
            "/dnevnik/get_week_schedule",
            post(handlers::dnevnik::week_schedule),
        )
        .route("/dnevnik/get_school_info", post(handlers::dnevnik::school_info))
        .route(
            "/dnevnik/get_homework_from_range",
            post(handlers::dnevnik::homework_from_range),
        )
        .route(
            "/dnevnik/get_missed_lessons",
            post(handlers::dnevnik::missed_lessons),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            gate::require_session,
        ));

    let admin = Router::new()
        .route("/admin/privileges", get(handlers::admin::list))
        .route(
            "/admin/privileges/:user",
            put(handlers::admin::grant).delete(handlers::admin::revoke),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            gate::require_admin,
        ));

    Router::new()
        .route("/", get(root))
        .route("/health", get(handlers::health::health))
        .route("/login/login", post(handlers::login::login))
        .route("/login/sms_login", post(handlers::login::sms_login))
        .merge(dnevnik)
        .merge(admin)
        .merge(
            SwaggerUi::new("/docs").url("/api-docs/openapi.json", openapi::ApiDoc::openapi()),
        )
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestHeaderLayer::if_not_present(
                    HeaderName::from_static("x-request-id"),
                    |_req: &_| HeaderValue::from_str(Ulid::new().to_string().as_str()).ok(),
                ))
                .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
                    "x-request-id",
                )))
                .layer(TraceLayer::new_for_http().make_span_with(make_span)),
        )
        .with_state(state)
}

/// Start the server
/// # Errors
/// Return error if failed to start the server
pub async fn new(port: u16, state: Arc<AppState>, retention: RetentionTimer) -> Result<()> {
    let app = router(state);

    let listener = TcpListener::bind(format!("::0:{port}")).await?;

    info!("Listening on [::]:{}", port);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            // Cancel pending cookie deletions so shutdown does not race file IO.
            retention.shutdown();
            info!("Gracefully shutdown");
        })
        .await?;

    Ok(())
}

async fn root() -> impl IntoResponse {
    Json(serde_json::json!({ "name": env!("CARGO_PKG_NAME") }))
}

fn make_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|val| val.to_str().ok())
        .unwrap_or("none");
    let matched_path = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| request.uri().path(), MatchedPath::as_str);

    info_span!(
        "http.request",
        http.method = %request.method(),
        http.route = matched_path,
        request_id
    )
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", error);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(error) => tracing::error!("Failed to install SIGTERM handler: {}", error),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
