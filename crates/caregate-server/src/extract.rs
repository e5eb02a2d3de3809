//! Bearer-token authentication and role-gate middleware.
//!
//! Every protected route passes through [`authenticate`] first; routes
//! restricted to specific roles additionally pass through
//! [`require_roles`]. The order is fixed: a request that fails
//! authentication is answered 401 before any role check runs.

use std::pin::Pin;

use axum::extract::{FromRequestParts, Request, State};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use caregate_auth::Principal;
use caregate_core::error::CoreError;
use caregate_core::models::role::Role;
use surrealdb::Connection;

use crate::error::ApiError;
use crate::state::AppState;

/// Authentication middleware: verify the bearer token and stash the
/// resulting [`Principal`] in the request extensions.
pub async fn authenticate<C: Connection>(
    State(state): State<AppState<C>>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = match bearer_token(&request) {
        Some(t) => t,
        None => {
            return ApiError::from(CoreError::AuthenticationFailed {
                reason: "missing or malformed bearer token".into(),
            })
            .into_response();
        }
    };

    match state.auth.authenticate(&token) {
        Ok(principal) => {
            request.extensions_mut().insert(principal);
            next.run(request).await
        }
        Err(err) => ApiError::from(err).into_response(),
    }
}

fn bearer_token(request: &Request) -> Option<String> {
    request
        .headers()
        .get(AUTHORIZATION)?
        .to_str()
        .ok()
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(String::from)
}

/// Role-gate middleware: reject with 403 unless the authenticated
/// principal holds at least one of `required`.
pub fn require_roles(
    required: &'static [Role],
) -> impl Fn(Request, Next) -> Pin<Box<dyn Future<Output = Response> + Send>> + Clone {
    move |request: Request, next: Next| {
        Box::pin(async move {
            let principal = request.extensions().get::<Principal>().cloned();
            match principal {
                Some(p) if p.has_any_role(required) => next.run(request).await,
                Some(_) => ApiError::from(CoreError::AuthorizationDenied {
                    reason: "forbidden".into(),
                })
                .into_response(),
                None => ApiError::from(CoreError::AuthenticationFailed {
                    reason: "not authenticated".into(),
                })
                .into_response(),
            }
        })
    }
}

/// Extractor for the authenticated principal.
///
/// Use this in handler functions running behind [`authenticate`]:
///
/// ```ignore
/// async fn handler(CurrentUser(principal): CurrentUser) -> impl IntoResponse {
///     // principal.account_id, principal.roles, ...
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Principal);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .cloned()
            .map(CurrentUser)
            .ok_or_else(|| {
                ApiError::from(CoreError::AuthenticationFailed {
                    reason: "not authenticated".into(),
                })
            })
    }
}
