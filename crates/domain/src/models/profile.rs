//! Profile domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::role::Role;

/// The stored record that carries an account's display name and role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Profile {
    pub user_id: Uuid,
    pub name: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    /// Header avatar letter: first character of the name upper-cased, `U` when empty.
    pub fn avatar_initial(&self) -> String {
        avatar_initial(&self.name)
    }
}

pub fn avatar_initial(name: &str) -> String {
    name.trim()
        .chars()
        .next()
        .map(|c| c.to_uppercase().collect())
        .unwrap_or_else(|| "U".to_string())
}

/// Header card for `GET /api/v1/me`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct CurrentProfileResponse {
    pub user_id: Uuid,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub avatar_initial: String,
    pub dashboard_path: &'static str,
}

/// Request body for `PATCH /api/v1/superadmin/users/:user_id/role`.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateRoleRequest {
    pub role: Role,
}

/// Profile row in the admin user listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct UserSummary {
    pub user_id: Uuid,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}
