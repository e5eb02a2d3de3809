//! Role domain model.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// The fixed set of roles recognized by the platform.
///
/// Role names are matched case-insensitively on input and always
/// stored, compared, and serialized in lowercase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Patient,
    Physician,
    Admin,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Patient, Role::Physician, Role::Admin];

    /// Canonical lowercase name, as stored and as embedded in tokens.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Role::Patient => "patient",
            Role::Physician => "physician",
            Role::Admin => "admin",
        }
    }
}

impl std::str::FromStr for Role {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "patient" => Ok(Role::Patient),
            "physician" => Ok(Role::Physician),
            "admin" => Ok(Role::Admin),
            other => Err(CoreError::Validation {
                message: format!("unknown role: {other}"),
            }),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
