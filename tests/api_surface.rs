//! End-to-end exercises of the HTTP surface with a stubbed login flow.
//!
//! The browser-driving flow is replaced by a canned implementation so these
//! tests cover routing, validation, the session gate and the admin gate
//! without launching Chrome.

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header::CONTENT_TYPE, Request, StatusCode},
};
use http_body_util::BodyExt;
use secrecy::SecretString;
use serde_json::{json, Value};
use std::{sync::Arc, time::Duration};
use tower::util::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use dnevnik_gate::{
    api::{self, AppState},
    auth::{AuthFlow, FlowError},
    dnevnik::DnevnikClient,
    session::{MemorySessionStore, Privileges, SessionArtifact, SessionStore},
};

#[derive(Clone)]
enum StubOutcome {
    Accepted,
    Rejected,
    Broken,
}

struct StubFlows {
    outcome: StubOutcome,
}

#[async_trait]
impl AuthFlow for StubFlows {
    async fn login(&self, _login: &str, _password: SecretString) -> Result<bool, FlowError> {
        match self.outcome {
            StubOutcome::Accepted => Ok(true),
            StubOutcome::Rejected => Ok(false),
            StubOutcome::Broken => Err(FlowError::Automation("element not found".to_string())),
        }
    }

    async fn sms_login(
        &self,
        _login: &str,
        _sms_code: &str,
    ) -> Result<Option<SessionArtifact>, FlowError> {
        match self.outcome {
            StubOutcome::Accepted => Ok(Some(SessionArtifact::new("sessionid", "opaque-value"))),
            StubOutcome::Rejected => Ok(None),
            StubOutcome::Broken => Err(FlowError::Timeout),
        }
    }
}

fn app_state(outcome: StubOutcome, diary_url: &str, admins: Vec<String>) -> Arc<AppState> {
    Arc::new(AppState {
        flows: Arc::new(StubFlows { outcome }),
        sessions: Arc::new(MemorySessionStore::default()),
        privileges: Privileges::with_admins(admins),
        dnevnik: DnevnikClient::new(diary_url, Duration::from_secs(5)).unwrap(),
    })
}

fn json_post(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_login_requires_credentials() {
    let app = api::router(app_state(StubOutcome::Accepted, "http://127.0.0.1:1", vec![]));

    let response = app
        .oneshot(json_post("/login/login", json!({ "login": "ivanov" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["detail"], "Login and password are required");
}

#[tokio::test]
async fn test_login_rejects_empty_password() {
    let app = api::router(app_state(StubOutcome::Accepted, "http://127.0.0.1:1", vec![]));

    let response = app
        .oneshot(json_post(
            "/login/login",
            json!({ "login": "ivanov", "password": "" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_accepted() {
    let app = api::router(app_state(StubOutcome::Accepted, "http://127.0.0.1:1", vec![]));

    let response = app
        .oneshot(json_post(
            "/login/login",
            json!({ "login": "ivanov", "password": "secret" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!(true));
}

#[tokio::test]
async fn test_login_rejected_maps_to_not_found() {
    let app = api::router(app_state(StubOutcome::Rejected, "http://127.0.0.1:1", vec![]));

    let response = app
        .oneshot(json_post(
            "/login/login",
            json!({ "login": "ivanov", "password": "wrong" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["detail"], "Invalid credentials or user not found");
}

#[tokio::test]
async fn test_login_flow_error_maps_to_server_error() {
    let app = api::router(app_state(StubOutcome::Broken, "http://127.0.0.1:1", vec![]));

    let response = app
        .oneshot(json_post(
            "/login/login",
            json!({ "login": "ivanov", "password": "secret" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert!(body["detail"]
        .as_str()
        .unwrap()
        .starts_with("Authentication failed"));
}

#[tokio::test]
async fn test_sms_login_requires_code() {
    let app = api::router(app_state(StubOutcome::Accepted, "http://127.0.0.1:1", vec![]));

    let response = app
        .oneshot(json_post("/login/sms_login", json!({ "login": "ivanov" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["detail"], "Login and SMS code are required");
}

#[tokio::test]
async fn test_sms_login_returns_session_cookie() {
    let app = api::router(app_state(StubOutcome::Accepted, "http://127.0.0.1:1", vec![]));

    let response = app
        .oneshot(json_post(
            "/login/sms_login",
            json!({ "login": "ivanov", "sms_code": "123456" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body, json!({ "sessionid": "opaque-value" }));
}

#[tokio::test]
async fn test_sms_login_rejected_maps_to_not_found() {
    let app = api::router(app_state(StubOutcome::Rejected, "http://127.0.0.1:1", vec![]));

    let response = app
        .oneshot(json_post(
            "/login/sms_login",
            json!({ "login": "ivanov", "sms_code": "000000" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["detail"], "Invalid SMS code or session expired");
}

#[tokio::test]
async fn test_diary_route_requires_user_header() {
    let app = api::router(app_state(StubOutcome::Accepted, "http://127.0.0.1:1", vec![]));

    let response = app
        .oneshot(json_post("/dnevnik/get_diary", json!({})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["detail"], "Missing x-user-id header");
}

#[tokio::test]
async fn test_diary_route_requires_stored_session() {
    let app = api::router(app_state(StubOutcome::Accepted, "http://127.0.0.1:1", vec![]));

    let request = Request::builder()
        .method("POST")
        .uri("/dnevnik/get_diary")
        .header(CONTENT_TYPE, "application/json")
        .header("x-user-id", "ivanov")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["detail"], "Not authenticated");
}

#[tokio::test]
async fn test_sms_login_then_diary_round_trip() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/ProfileService/GetPersonData"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "firstName": "Иван" })))
        .mount(&server)
        .await;

    let state = app_state(StubOutcome::Accepted, &server.uri(), vec![]);
    let app = api::router(state);

    let response = app
        .clone()
        .oneshot(json_post(
            "/login/sms_login",
            json!({ "login": "ivanov", "sms_code": "123456" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let request = Request::builder()
        .method("POST")
        .uri("/dnevnik/get_person_data")
        .header("x-user-id", "ivanov")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["firstName"], "Иван");
}

#[tokio::test]
async fn test_diary_upstream_rejection_maps_to_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/SchoolService/getSchoolInfo"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let state = app_state(StubOutcome::Accepted, &server.uri(), vec![]);
    state
        .sessions
        .put("ivanov", SessionArtifact::new("sessionid", "stale"))
        .await;
    let app = api::router(state);

    let request = Request::builder()
        .method("POST")
        .uri("/dnevnik/get_school_info")
        .header("x-user-id", "ivanov")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["detail"], "Data not found");
}

#[tokio::test]
async fn test_admin_route_refuses_non_admin() {
    let app = api::router(app_state(
        StubOutcome::Accepted,
        "http://127.0.0.1:1",
        vec!["root".to_string()],
    ));

    let request = Request::builder()
        .method("GET")
        .uri("/admin/privileges")
        .header("x-user-id", "ivanov")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = body_json(response).await;
    assert_eq!(body["detail"], "Admin privileges required");
}

#[tokio::test]
async fn test_admin_grant_and_list() {
    let app = api::router(app_state(
        StubOutcome::Accepted,
        "http://127.0.0.1:1",
        vec!["root".to_string()],
    ));

    let request = Request::builder()
        .method("PUT")
        .uri("/admin/privileges/ivanov")
        .header("x-user-id", "root")
        .body(Body::empty())
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["granted"], true);

    let request = Request::builder()
        .method("GET")
        .uri("/admin/privileges")
        .header("x-user-id", "root")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["admins"], json!(["ivanov", "root"]));
}

#[tokio::test]
async fn test_health_is_open() {
    let app = api::router(app_state(StubOutcome::Accepted, "http://127.0.0.1:1", vec![]));

    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("X-App"));
}
