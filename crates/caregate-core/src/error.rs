//! Error types for the CareGate system.
//!
//! Every failure anywhere in the stack is classified into exactly one
//! of these variants before it reaches a caller.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Authentication failed: {reason}")]
    AuthenticationFailed { reason: String },

    #[error("Authorization denied: {reason}")]
    AuthorizationDenied { reason: String },

    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Entity already exists: {entity}")]
    AlreadyExists { entity: String },

    /// Infrastructure failure (datastore unavailable, task pool error).
    /// Callers may retry with backoff; CareGate itself never retries.
    #[error("Service error: {0}")]
    Service(String),
}

pub type CoreResult<T> = Result<T, CoreError>;
