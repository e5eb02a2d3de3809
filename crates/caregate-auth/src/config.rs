//! Authentication configuration.

/// Configuration for the authentication service.
///
/// Constructed explicitly (from the environment in the server binary,
/// with fixed values in tests) — never read from ambient global state.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Symmetric secret for JWT signing and verification (HS256).
    /// Required in production; never logged.
    pub jwt_secret: String,
    /// Session token lifetime in seconds (default: 7200 = 2 hours).
    pub token_lifetime_secs: u64,
    /// JWT issuer (`iss` claim).
    pub jwt_issuer: String,
    /// Optional pepper prepended to passwords and security answers
    /// before Argon2id hashing.
    pub pepper: Option<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            token_lifetime_secs: 7_200,
            jwt_issuer: "caregate".into(),
            pepper: None,
        }
    }
}
