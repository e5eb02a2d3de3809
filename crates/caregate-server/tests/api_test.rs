//! End-to-end tests for the `/api/auth` surface, driving the router
//! over the embedded in-memory database.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use caregate_auth::{AuthConfig, AuthService};
use caregate_db::repository::SurrealAccountRepository;
use caregate_server::routes;
use caregate_server::state::AppState;
use serde_json::{Value, json};
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;
use tower::ServiceExt;

fn test_config() -> AuthConfig {
    AuthConfig {
        jwt_secret: "test-signing-secret-not-for-production".into(),
        token_lifetime_secs: 7_200,
        jwt_issuer: "caregate-test".into(),
        pepper: None,
    }
}

async fn setup_app() -> Router {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    caregate_db::run_migrations(&db).await.unwrap();

    let accounts = SurrealAccountRepository::new(db);
    let state = AppState::new(AuthService::new(accounts, test_config()));
    routes::build_router(state)
}

/// POST a JSON body, optionally with a bearer token. Returns the
/// status and the parsed body (Null for empty responses).
async fn post_json(
    app: &Router,
    uri: &str,
    body: Value,
    token: Option<&str>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(t) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {t}"));
    }
    let request = builder
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn get(app: &Router, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(t) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {t}"));
    }
    let request = builder.body(Body::empty()).unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn register(app: &Router, username: &str, password: &str, role: &str) -> (StatusCode, Value) {
    post_json(
        app,
        "/api/auth/register",
        json!({
            "username": username,
            "password": password,
            "role": role,
            "firstName": "Ada",
            "lastName": "Lovelace",
        }),
        None,
    )
    .await
}

async fn login_token(app: &Router, username: &str, password: &str) -> String {
    let (status, body) = post_json(
        app,
        "/api/auth/login",
        json!({ "username": username, "password": password }),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn register_login_me_flow() {
    let app = setup_app().await;

    let (status, body) = register(&app, "alice", "pw123!", "patient").await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["username"], "alice");
    assert_eq!(body["roles"], json!(["patient"]));

    let token = login_token(&app, "alice", "pw123!").await;

    let (status, me) = get(&app, "/api/auth/me", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["username"], "alice");
    assert_eq!(me["roles"], json!(["patient"]));
    assert!(me["accountId"].is_string());
}

#[tokio::test]
async fn login_failures_are_uniform() {
    let app = setup_app().await;
    register(&app, "bob", "secret-pw", "physician").await;

    let (s1, b1) = post_json(
        &app,
        "/api/auth/login",
        json!({ "username": "bob", "password": "wrong" }),
        None,
    )
    .await;
    let (s2, b2) = post_json(
        &app,
        "/api/auth/login",
        json!({ "username": "nobody", "password": "whatever" }),
        None,
    )
    .await;

    assert_eq!(s1, StatusCode::UNAUTHORIZED);
    assert_eq!(s2, StatusCode::UNAUTHORIZED);
    assert_eq!(b1["message"], b2["message"], "no username enumeration");
}

#[tokio::test]
async fn protected_routes_require_a_valid_token() {
    let app = setup_app().await;

    let (status, _) = get(&app, "/api/auth/me", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = get(&app, "/api/auth/me", Some("not-a-jwt")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    register(&app, "carol", "secret-pw", "patient").await;
    let token = login_token(&app, "carol", "secret-pw").await;
    let mut tampered = token.clone();
    let last = tampered.pop().unwrap();
    tampered.push(if last == 'A' { 'B' } else { 'A' });

    let (status, _) = get(&app, "/api/auth/me", Some(&tampered)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn role_gate_distinguishes_401_from_403() {
    let app = setup_app().await;

    register(&app, "pat", "secret-pw", "patient").await;
    register(&app, "adm", "secret-pw", "admin").await;

    // No token at all: authentication failure.
    let (status, _) = get(&app, "/api/auth/roles", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Authenticated but wrong role: authorization failure.
    let patient_token = login_token(&app, "pat", "secret-pw").await;
    let (status, body) = get(&app, "/api/auth/roles", Some(&patient_token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "forbidden");

    // Admin sees the fixed enumeration.
    let admin_token = login_token(&app, "adm", "secret-pw").await;
    let (status, body) = get(&app, "/api/auth/roles", Some(&admin_token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!(["patient", "physician", "admin"]));
}

#[tokio::test]
async fn duplicate_registration_conflicts() {
    let app = setup_app().await;

    let (status, _) = register(&app, "dora", "secret-pw", "patient").await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = register(&app, "dora", "other-pw", "admin").await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "conflict");
}

#[tokio::test]
async fn invalid_role_is_a_validation_error() {
    let app = setup_app().await;

    let (status, body) = register(&app, "erin", "secret-pw", "nurse").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn security_question_for_unknown_user_is_404() {
    let app = setup_app().await;

    let (status, body) = get(&app, "/api/auth/security-question/unknown_user", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn security_qa_enrollment_and_reset_flow() {
    let app = setup_app().await;

    register(&app, "frank", "old-pw", "patient").await;
    let token = login_token(&app, "frank", "old-pw").await;

    // Enrollment is gated on the caller's own identity.
    let (status, _) = post_json(
        &app,
        "/api/auth/security-qa",
        json!({ "question": "First pet's name?", "answer": "rex" }),
        Some(&token),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = get(&app, "/api/auth/security-question/frank", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["securityQuestion"], "First pet's name?");

    // Wrong answer: authentication failure, password untouched.
    let (status, _) = post_json(
        &app,
        "/api/auth/reset-password",
        json!({ "username": "frank", "answer": "fido", "newPassword": "new-pw" }),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    login_token(&app, "frank", "old-pw").await;

    // Correct answer swaps the password.
    let (status, _) = post_json(
        &app,
        "/api/auth/reset-password",
        json!({ "username": "frank", "answer": "rex", "newPassword": "new-pw" }),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    login_token(&app, "frank", "new-pw").await;
    let (status, _) = post_json(
        &app,
        "/api/auth/login",
        json!({ "username": "frank", "password": "old-pw" }),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn change_password_flow() {
    let app = setup_app().await;

    register(&app, "grace", "old-pw", "admin").await;
    let token = login_token(&app, "grace", "old-pw").await;

    let (status, _) = post_json(
        &app,
        "/api/auth/change-password",
        json!({ "oldPassword": "old-pw", "newPassword": "new-pw" }),
        Some(&token),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    login_token(&app, "grace", "new-pw").await;
    let (status, _) = post_json(
        &app,
        "/api/auth/login",
        json!({ "username": "grace", "password": "old-pw" }),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Wrong old password is rejected without effect.
    let token = login_token(&app, "grace", "new-pw").await;
    let (status, _) = post_json(
        &app,
        "/api/auth/change-password",
        json!({ "oldPassword": "bogus", "newPassword": "other-pw" }),
        Some(&token),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    login_token(&app, "grace", "new-pw").await;
}
