//! Account domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::role::Role;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: Uuid,
    /// Unique, case-sensitive identifier.
    pub username: String,
    /// Argon2id PHC-format hash. Raw passwords never reach storage.
    pub password_hash: String,
    /// Always non-empty.
    pub roles: Vec<Role>,
    pub active: bool,
    pub security_question: Option<String>,
    /// Argon2id hash of the recovery answer, set together with the
    /// question.
    pub security_answer_hash: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for the transactional account + profile-placeholder insert.
#[derive(Debug, Clone)]
pub struct CreateAccount {
    pub username: String,
    pub password_hash: String,
    pub roles: Vec<Role>,
    pub security_question: Option<String>,
    pub security_answer_hash: Option<String>,
    /// Seed values for the role-scoped profile placeholder created in
    /// the same transaction as the account row.
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateAccount {
    pub password_hash: Option<String>,
    pub security_question: Option<String>,
    pub security_answer_hash: Option<String>,
    pub active: Option<bool>,
}
