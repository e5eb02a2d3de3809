//! `/api/auth` route handlers and router assembly.
//!
//! Wire field names follow the SPA's camelCase convention.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::middleware;
use axum::routing::{get, post};
use axum::{Json, Router};
use caregate_auth::service::{LoginInput, RegisterInput};
use caregate_auth::Principal;
use caregate_core::models::role::Role;
use serde::{Deserialize, Serialize};
use surrealdb::Connection;
use uuid::Uuid;

use crate::error::ApiResult;
use crate::extract::{self, CurrentUser};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub role: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub security_question: Option<String>,
    #[serde(default)]
    pub security_answer: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub id: Uuid,
    pub username: String,
    pub roles: Vec<Role>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub expires_in: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

#[derive(Debug, Deserialize)]
pub struct SecurityQaRequest {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityQuestionResponse {
    pub security_question: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub username: String,
    pub answer: String,
    pub new_password: String,
}

async fn register<C: Connection>(
    State(state): State<AppState<C>>,
    Json(body): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<RegisterResponse>)> {
    let out = state
        .auth
        .register(RegisterInput {
            username: body.username,
            password: body.password,
            role: body.role,
            first_name: body.first_name,
            last_name: body.last_name,
            security_question: body.security_question,
            security_answer: body.security_answer,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            id: out.account_id,
            username: out.username,
            roles: out.roles,
        }),
    ))
}

async fn login<C: Connection>(
    State(state): State<AppState<C>>,
    Json(body): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let out = state
        .auth
        .login(LoginInput {
            username: body.username,
            password: body.password,
        })
        .await?;

    Ok(Json(LoginResponse {
        token: out.token,
        expires_in: out.expires_in,
    }))
}

async fn me(CurrentUser(principal): CurrentUser) -> Json<Principal> {
    Json(principal)
}

async fn change_password<C: Connection>(
    State(state): State<AppState<C>>,
    CurrentUser(principal): CurrentUser,
    Json(body): Json<ChangePasswordRequest>,
) -> ApiResult<StatusCode> {
    state
        .auth
        .change_password(principal.account_id, body.old_password, body.new_password)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn set_security_qa<C: Connection>(
    State(state): State<AppState<C>>,
    CurrentUser(principal): CurrentUser,
    Json(body): Json<SecurityQaRequest>,
) -> ApiResult<StatusCode> {
    state
        .auth
        .set_security_qa(&principal.username, body.question, body.answer)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn security_question<C: Connection>(
    State(state): State<AppState<C>>,
    Path(username): Path<String>,
) -> ApiResult<Json<SecurityQuestionResponse>> {
    let question = state.auth.security_question(&username).await?;
    Ok(Json(SecurityQuestionResponse {
        security_question: question,
    }))
}

async fn reset_password<C: Connection>(
    State(state): State<AppState<C>>,
    Json(body): Json<ResetPasswordRequest>,
) -> ApiResult<StatusCode> {
    state
        .auth
        .reset_password(&body.username, body.answer, body.new_password)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// The fixed role enumeration. Restricted to administrators, matching
/// the role-management surface of the platform.
async fn list_roles() -> Json<Vec<Role>> {
    Json(Role::ALL.to_vec())
}

/// Assemble the `/api/auth` router over the given state.
pub fn build_router<C: Connection>(state: AppState<C>) -> Router {
    let public: Router<AppState<C>> = Router::new()
        .route("/register", post(register::<C>))
        .route("/login", post(login::<C>))
        .route("/security-question/{username}", get(security_question::<C>))
        .route("/reset-password", post(reset_password::<C>));

    let authenticated: Router<AppState<C>> = Router::new()
        .route("/me", get(me))
        .route("/change-password", post(change_password::<C>))
        .route("/security-qa", post(set_security_qa::<C>))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            extract::authenticate::<C>,
        ));

    // Outer layer runs first: authenticate, then the role gate.
    let admin: Router<AppState<C>> = Router::new()
        .route("/roles", get(list_roles))
        .route_layer(middleware::from_fn(extract::require_roles(&[Role::Admin])))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            extract::authenticate::<C>,
        ));

    Router::new()
        .nest("/api/auth", public.merge(authenticated).merge(admin))
        .with_state(state)
}
