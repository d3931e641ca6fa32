//! Profile entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::Role;
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum for user_role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
pub enum RoleDb {
    User,
    Admin,
    Superadmin,
}

impl From<RoleDb> for Role {
    fn from(db: RoleDb) -> Self {
        match db {
            RoleDb::User => Role::User,
            RoleDb::Admin => Role::Admin,
            RoleDb::Superadmin => Role::Superadmin,
        }
    }
}

impl From<Role> for RoleDb {
    fn from(role: Role) -> Self {
        match role {
            Role::User => RoleDb::User,
            Role::Admin => RoleDb::Admin,
            Role::Superadmin => RoleDb::Superadmin,
        }
    }
}

/// Database row mapping for the profiles table.
#[derive(Debug, Clone, FromRow)]
pub struct ProfileEntity {
    pub user_id: Uuid,
    pub name: String,
    pub role: RoleDb,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ProfileEntity> for domain::models::Profile {
    fn from(entity: ProfileEntity) -> Self {
        Self {
            user_id: entity.user_id,
            name: entity.name,
            role: entity.role.into(),
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

/// Profile joined with its identity row.
#[derive(Debug, Clone, FromRow)]
pub struct ProfileWithUserEntity {
    pub user_id: Uuid,
    pub email: String,
    pub name: String,
    pub role: RoleDb,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}

impl From<ProfileWithUserEntity> for domain::models::profile::UserSummary {
    fn from(entity: ProfileWithUserEntity) -> Self {
        Self {
            user_id: entity.user_id,
            email: entity.email,
            name: entity.name,
            role: entity.role.into(),
            is_active: entity.is_active,
            created_at: entity.created_at,
            last_login_at: entity.last_login_at,
        }
    }
}
