//! Session-token issuance and verification.
//!
//! Tokens are compact HS256 JWTs signed with the symmetric secret from
//! [`AuthConfig`]. They are self-contained: verification is pure and
//! performs no datastore lookup, and there is no server-side
//! revocation — a token stays valid until its expiry.

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use caregate_core::models::role::Role;

use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::principal::Principal;

/// JWT claims embedded in every session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject — account ID (UUID string).
    pub sub: String,
    /// Username snapshot at issuance.
    pub username: String,
    /// Role-set snapshot, lowercase role names.
    pub roles: Vec<Role>,
    /// Issuer.
    pub iss: String,
    /// Issued-at (Unix timestamp).
    pub iat: i64,
    /// Expiration (Unix timestamp).
    pub exp: i64,
}

/// Issue a signed HS256 session token for an account.
pub fn issue_token(
    account_id: Uuid,
    username: &str,
    roles: &[Role],
    config: &AuthConfig,
) -> Result<String, AuthError> {
    let now = Utc::now().timestamp();
    let claims = TokenClaims {
        sub: account_id.to_string(),
        username: username.to_owned(),
        roles: roles.to_vec(),
        iss: config.jwt_issuer.clone(),
        iat: now,
        exp: now + config.token_lifetime_secs as i64,
    };

    let key = EncodingKey::from_secret(config.jwt_secret.as_bytes());
    let header = Header::new(Algorithm::HS256);
    jsonwebtoken::encode(&header, &claims, &key)
        .map_err(|e| AuthError::Crypto(format!("JWT encode: {e}")))
}

/// Decode and verify a session token (signature, expiry, issuer).
pub fn decode_token(token: &str, config: &AuthConfig) -> Result<TokenClaims, AuthError> {
    let key = DecodingKey::from_secret(config.jwt_secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[&config.jwt_issuer]);
    validation.set_required_spec_claims(&["exp", "iat", "iss"]);

    jsonwebtoken::decode::<TokenClaims>(token, &key, &validation)
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            _ => AuthError::TokenInvalid(e.to_string()),
        })
}

/// Verify a session token and produce the [`Principal`] it asserts.
///
/// This is the entry point for request-level authentication middleware.
/// It is purely stateless — no database lookup is performed — and it
/// must run before any role check.
pub fn authenticate(token: &str, config: &AuthConfig) -> Result<Principal, AuthError> {
    let claims = decode_token(token, config)?;
    let account_id = Uuid::parse_str(&claims.sub)
        .map_err(|e| AuthError::TokenInvalid(format!("bad subject: {e}")))?;

    Ok(Principal {
        account_id,
        username: claims.username,
        roles: claims.roles,
    })
}
