//! Superadmin bootstrap.
//!
//! Ensures the account named in `admin.bootstrap_email` exists with the
//! superadmin role. Runs after migrations on every start and is idempotent.

use domain::models::{LogAction, NewActivityLog, Role};
use persistence::entities::RoleDb;
use persistence::repositories::append_log;
use serde_json::json;
use shared::password::{hash_password, PasswordError};
use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::AdminBootstrapConfig;

#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Password hashing error: {0}")]
    PasswordHash(#[from] PasswordError),
}

/// What the bootstrap did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapOutcome {
    NotConfigured,
    AlreadySuperadmin(Uuid),
    Promoted(Uuid),
    Created(Uuid),
}

pub async fn bootstrap_superadmin(
    pool: &PgPool,
    config: &AdminBootstrapConfig,
) -> Result<BootstrapOutcome, BootstrapError> {
    let email = config.bootstrap_email.trim().to_lowercase();
    if email.is_empty() {
        return Ok(BootstrapOutcome::NotConfigured);
    }

    if config.bootstrap_password.is_empty() {
        warn!("DH__ADMIN__BOOTSTRAP_EMAIL is set but DH__ADMIN__BOOTSTRAP_PASSWORD is empty - skipping bootstrap");
        return Ok(BootstrapOutcome::NotConfigured);
    }

    let mut tx = pool.begin().await?;

    let existing: Option<(Uuid, Option<RoleDb>)> = sqlx::query_as(
        r#"
        SELECT u.id, p.role
        FROM users u
        LEFT JOIN profiles p ON p.user_id = u.id
        WHERE u.email = $1
        FOR UPDATE OF u
        "#,
    )
    .bind(&email)
    .fetch_optional(&mut *tx)
    .await?;

    let outcome = match existing {
        Some((user_id, Some(RoleDb::Superadmin))) => {
            tx.rollback().await?;
            info!(user_id = %user_id, "Bootstrap superadmin already present");
            return Ok(BootstrapOutcome::AlreadySuperadmin(user_id));
        }
        Some((user_id, previous)) => {
            sqlx::query(
                r#"
                INSERT INTO profiles (user_id, name, role)
                VALUES ($1, $2, 'superadmin')
                ON CONFLICT (user_id) DO UPDATE SET role = 'superadmin', updated_at = NOW()
                "#,
            )
            .bind(user_id)
            .bind(&config.bootstrap_name)
            .execute(&mut *tx)
            .await?;

            append_log(
                &mut *tx,
                &NewActivityLog::new(LogAction::SuperadminBootstrapped, None).with_details(json!({
                    "user_id": user_id,
                    "email": email,
                    "from": previous.map(|r| Role::from(r).as_str()),
                })),
            )
            .await?;
            BootstrapOutcome::Promoted(user_id)
        }
        None => {
            let password_hash = hash_password(&config.bootstrap_password)?;

            let user_id: Uuid = sqlx::query_scalar(
                r#"
                INSERT INTO users (email, password_hash, is_active)
                VALUES ($1, $2, true)
                RETURNING id
                "#,
            )
            .bind(&email)
            .bind(&password_hash)
            .fetch_one(&mut *tx)
            .await?;

            sqlx::query("INSERT INTO profiles (user_id, name, role) VALUES ($1, $2, 'superadmin')")
                .bind(user_id)
                .bind(&config.bootstrap_name)
                .execute(&mut *tx)
                .await?;

            append_log(
                &mut *tx,
                &NewActivityLog::new(LogAction::SuperadminBootstrapped, None)
                    .with_details(json!({ "user_id": user_id, "email": email })),
            )
            .await?;
            BootstrapOutcome::Created(user_id)
        }
    };

    tx.commit().await?;

    info!(email = %email, outcome = ?outcome, "Bootstrap superadmin ensured");
    warn!("SECURITY: remove DH__ADMIN__BOOTSTRAP_PASSWORD from the environment after initial setup");

    Ok(outcome)
}
