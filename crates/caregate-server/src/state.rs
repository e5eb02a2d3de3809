//! Shared application state.

use std::sync::Arc;

use caregate_auth::AuthService;
use caregate_db::repository::SurrealAccountRepository;
use surrealdb::Connection;

/// Axum application state: the auth service over the configured
/// storage engine. Generic over the engine so integration tests run
/// against the embedded in-memory database.
pub struct AppState<C: Connection> {
    pub auth: Arc<AuthService<SurrealAccountRepository<C>>>,
}

impl<C: Connection> Clone for AppState<C> {
    fn clone(&self) -> Self {
        Self {
            auth: Arc::clone(&self.auth),
        }
    }
}

impl<C: Connection> AppState<C> {
    pub fn new(auth: AuthService<SurrealAccountRepository<C>>) -> Self {
        Self {
            auth: Arc::new(auth),
        }
    }
}
