//! Authentication error types.

use caregate_core::error::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown username, inactive account, or credential mismatch.
    /// Deliberately carries no detail so callers cannot distinguish
    /// the cases.
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("token has expired")]
    TokenExpired,

    #[error("invalid token: {0}")]
    TokenInvalid(String),

    #[error("cryptography error: {0}")]
    Crypto(String),
}

impl From<AuthError> for CoreError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials
            | AuthError::TokenExpired
            | AuthError::TokenInvalid(_) => CoreError::AuthenticationFailed {
                reason: err.to_string(),
            },
            AuthError::Crypto(msg) => CoreError::Service(msg),
        }
    }
}
