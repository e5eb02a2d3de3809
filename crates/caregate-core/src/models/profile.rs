//! Role-scoped profile placeholder.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::role::Role;

/// The per-role profile row created in the same transaction as its
/// account, so downstream profile features always find their record.
///
/// Everything beyond creation (contact details, medical fields, ...)
/// belongs to the profile-management collaborator, not to this crate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    pub account_id: Uuid,
    pub role: Role,
    pub first_name: String,
    pub last_name: String,
    pub created_at: DateTime<Utc>,
}
