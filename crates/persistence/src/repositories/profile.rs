//! Profile repository for database operations.

use chrono::Utc;
use domain::models::{LogAction, NewActivityLog, Role};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{ProfileEntity, ProfileWithUserEntity, RoleDb};
use crate::metrics::QueryTimer;
use crate::repositories::activity_log::append_log;

#[derive(Clone)]
pub struct ProfileRepository {
    pool: PgPool,
}

impl ProfileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Profile plus identity for an active account.
    pub async fn find_active_with_user(
        &self,
        user_id: Uuid,
    ) -> Result<Option<ProfileWithUserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_active_profile_with_user");
        let result = sqlx::query_as::<_, ProfileWithUserEntity>(
            r#"
            SELECT p.user_id, u.email, p.name, p.role, u.is_active, p.created_at, u.last_login_at
            FROM profiles p
            JOIN users u ON u.id = p.user_id
            WHERE p.user_id = $1 AND u.is_active = true
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// All profiles, newest accounts first.
    pub async fn list_with_users(&self) -> Result<Vec<ProfileWithUserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_profiles_with_users");
        let result = sqlx::query_as::<_, ProfileWithUserEntity>(
            r#"
            SELECT p.user_id, u.email, p.name, p.role, u.is_active, p.created_at, u.last_login_at
            FROM profiles p
            JOIN users u ON u.id = p.user_id
            ORDER BY p.created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Changes a profile's role and records who did it. Returns `None` when
    /// the profile does not exist.
    pub async fn update_role(
        &self,
        user_id: Uuid,
        role: Role,
        changed_by: Uuid,
    ) -> Result<Option<ProfileEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_profile_role");
        let mut tx = self.pool.begin().await?;

        let previous: Option<(RoleDb,)> =
            sqlx::query_as("SELECT role FROM profiles WHERE user_id = $1 FOR UPDATE")
                .bind(user_id)
                .fetch_optional(&mut *tx)
                .await?;

        let Some((previous,)) = previous else {
            timer.record();
            return Ok(None);
        };

        let updated = sqlx::query_as::<_, ProfileEntity>(
            r#"
            UPDATE profiles
            SET role = $2, updated_at = $3
            WHERE user_id = $1
            RETURNING user_id, name, role, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(RoleDb::from(role))
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await?;

        let previous = Role::from(previous);
        append_log(
            &mut *tx,
            &NewActivityLog::new(LogAction::RoleChanged, Some(changed_by)).with_details(json!({
                "user_id": user_id,
                "from": previous.as_str(),
                "to": role.as_str(),
            })),
        )
        .await?;

        tx.commit().await?;
        timer.record();
        Ok(Some(updated))
    }
}
