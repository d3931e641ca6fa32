//! Account roles.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The role stored on a profile. Exactly one per account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
    Superadmin,
}

impl Role {
    /// Role given to every account created through sign-up.
    pub const DEFAULT: Role = Role::User;

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
            Role::Superadmin => "superadmin",
        }
    }

    /// Fixed dashboard address for this role.
    pub fn dashboard_path(&self) -> &'static str {
        match self {
            Role::User => "/api/v1/dashboards/user",
            Role::Admin => "/api/v1/dashboards/admin",
            Role::Superadmin => "/api/v1/dashboards/superadmin",
        }
    }

    /// Admins and superadmins may manage requests, drones and users.
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin | Role::Superadmin)
    }

    pub fn is_superadmin(&self) -> bool {
        matches!(self, Role::Superadmin)
    }

    pub fn all() -> &'static [Role] {
        &[Role::User, Role::Admin, Role::Superadmin]
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', '_'], "").as_str() {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            "superadmin" => Ok(Role::Superadmin),
            _ => Err(format!("Unknown role: {}", s)),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
