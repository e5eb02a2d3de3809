//! CareGate Auth — password hashing, session-token issuance and
//! verification, and role-based authorization.

pub mod config;
pub mod error;
pub mod password;
pub mod principal;
pub mod service;
pub mod token;

pub use config::AuthConfig;
pub use error::AuthError;
pub use principal::Principal;
pub use service::{AuthService, LoginInput, LoginOutput, RegisterInput, RegisterOutput};
pub use token::TokenClaims;
