//! Sign-up, sign-in with a claimed role, token refresh and logout.

use chrono::Utc;
use domain::models::{LogAction, NewActivityLog, Profile, Role};
use persistence::entities::{ProfileEntity, RoleDb};
use persistence::repositories::append_log;
use serde_json::json;
use shared::crypto::sha256_hex;
use shared::jwt::{JwtConfig, JwtError};
use shared::password::{
    check_password_policy, hash_password, verify_dummy_password, verify_password, PasswordError,
};
use sqlx::{PgPool, Postgres, Transaction};
use thiserror::Error;
use uuid::Uuid;

use crate::config::JwtAuthConfig;
use crate::middleware::metrics::record_sign_in;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Email already registered")]
    EmailAlreadyExists,

    #[error("{0}")]
    WeakPassword(String),

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Account is disabled")]
    UserDisabled,

    #[error("Profile not found. Please contact administrator.")]
    ProfileNotFound,

    #[error("Access denied. You don't have {claimed} privileges.")]
    RoleMismatch { claimed: Role },

    #[error("Invalid refresh token")]
    InvalidRefreshToken,

    #[error("Session not found")]
    SessionNotFound,

    #[error("Token error: {0}")]
    TokenError(#[from] JwtError),

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

/// Access and refresh tokens plus the `jti`s stored (hashed) on the session.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub access_token_jti: String,
    pub refresh_token: String,
    pub refresh_token_jti: String,
    pub expires_in: i64,
}

/// A successful sign-in.
#[derive(Debug, Clone)]
pub struct SignInResult {
    pub email: String,
    pub profile: Profile,
    pub tokens: TokenPair,
}

impl SignInResult {
    pub fn welcome_message(&self) -> String {
        format!(
            "Welcome back, {}! Signed in as {}.",
            self.profile.name, self.profile.role
        )
    }
}

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    email: String,
    password_hash: String,
    is_active: bool,
}

#[derive(Debug, sqlx::FromRow)]
struct SessionRow {
    id: Uuid,
    expires_at: chrono::DateTime<Utc>,
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub struct AuthService {
    pool: PgPool,
    jwt_config: JwtConfig,
}

impl AuthService {
    pub fn new(pool: PgPool, jwt_config: &JwtAuthConfig) -> Result<Self, AuthError> {
        let jwt = JwtConfig::with_leeway(
            &jwt_config.private_key,
            &jwt_config.public_key,
            jwt_config.access_token_expiry_secs,
            jwt_config.refresh_token_expiry_secs,
            jwt_config.leeway_secs,
        )?;

        Ok(Self {
            pool,
            jwt_config: jwt,
        })
    }

    /// Creates the identity and its profile. New accounts always get
    /// [`Role::DEFAULT`]; no session is opened.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<(String, Profile), AuthError> {
        check_password_policy(password).map_err(AuthError::WeakPassword)?;

        let email = normalize_email(email);
        let password_hash = hash_password(password)?;

        let mut tx = self.pool.begin().await?;

        let insert_result: Result<Uuid, sqlx::Error> = sqlx::query_scalar(
            r#"
            INSERT INTO users (email, password_hash, is_active)
            VALUES ($1, $2, true)
            RETURNING id
            "#,
        )
        .bind(&email)
        .bind(&password_hash)
        .fetch_one(&mut *tx)
        .await;

        // Unique violation: a concurrent or earlier sign-up took the email.
        let user_id = match insert_result {
            Err(sqlx::Error::Database(db_err)) if db_err.code().as_deref() == Some("23505") => {
                return Err(AuthError::EmailAlreadyExists);
            }
            other => other?,
        };

        let profile: ProfileEntity = sqlx::query_as(
            r#"
            INSERT INTO profiles (user_id, name, role)
            VALUES ($1, $2, $3)
            RETURNING user_id, name, role, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(name.trim())
        .bind(RoleDb::from(Role::DEFAULT))
        .fetch_one(&mut *tx)
        .await?;

        append_log(
            &mut *tx,
            &NewActivityLog::new(LogAction::SignedUp, Some(user_id))
                .with_details(json!({ "email": email })),
        )
        .await?;

        tx.commit().await?;

        tracing::info!(user_id = %user_id, "Account created");
        Ok((email, profile.into()))
    }

    /// Authenticates and checks the claimed role against the stored profile.
    ///
    /// A role mismatch opens no session and issues no tokens.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        claimed_role: Role,
    ) -> Result<SignInResult, AuthError> {
        let user: Option<UserRow> = sqlx::query_as(
            r#"
            SELECT id, email, password_hash, is_active
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(normalize_email(email))
        .fetch_optional(&self.pool)
        .await?;

        let Some(user) = user else {
            verify_dummy_password(password);
            record_sign_in("invalid_credentials");
            return Err(AuthError::InvalidCredentials);
        };

        if !verify_password(password, &user.password_hash)? {
            record_sign_in("invalid_credentials");
            return Err(AuthError::InvalidCredentials);
        }

        if !user.is_active {
            record_sign_in("disabled");
            return Err(AuthError::UserDisabled);
        }

        let profile: Option<ProfileEntity> = sqlx::query_as(
            "SELECT user_id, name, role, created_at, updated_at FROM profiles WHERE user_id = $1",
        )
        .bind(user.id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(profile) = profile.map(Profile::from) else {
            record_sign_in("no_profile");
            tracing::warn!(user_id = %user.id, "Sign-in for account without profile");
            return Err(AuthError::ProfileNotFound);
        };

        if profile.role != claimed_role {
            record_sign_in("role_mismatch");
            tracing::warn!(
                user_id = %user.id,
                claimed = %claimed_role,
                stored = %profile.role,
                "Sign-in rejected: claimed role does not match profile"
            );
            return Err(AuthError::RoleMismatch {
                claimed: claimed_role,
            });
        }

        let tokens = self.generate_tokens(user.id)?;

        let mut tx = self.pool.begin().await?;

        sqlx::query("UPDATE users SET last_login_at = $1 WHERE id = $2")
            .bind(Utc::now())
            .bind(user.id)
            .execute(&mut *tx)
            .await?;

        self.create_session(&mut tx, user.id, &tokens).await?;

        append_log(
            &mut *tx,
            &NewActivityLog::new(LogAction::SignedIn, Some(user.id))
                .with_details(json!({ "role": profile.role })),
        )
        .await?;

        tx.commit().await?;
        record_sign_in("success");

        Ok(SignInResult {
            email: user.email,
            profile,
            tokens,
        })
    }

    /// Rotates the session's tokens. The old refresh token stops working.
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, AuthError> {
        let claims = self.validate_refresh(refresh_token)?;
        let user_id = claims.user_id().map_err(|_| AuthError::InvalidRefreshToken)?;
        let jti_hash = sha256_hex(&claims.jti);

        let session: Option<SessionRow> = sqlx::query_as(
            r#"
            SELECT id, expires_at
            FROM user_sessions
            WHERE refresh_token_hash = $1 AND user_id = $2
            "#,
        )
        .bind(&jti_hash)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        let session = session.ok_or(AuthError::SessionNotFound)?;

        if session.expires_at < Utc::now() {
            sqlx::query("DELETE FROM user_sessions WHERE id = $1")
                .bind(session.id)
                .execute(&self.pool)
                .await?;
            return Err(AuthError::InvalidRefreshToken);
        }

        let is_active: Option<bool> = sqlx::query_scalar("SELECT is_active FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        if is_active != Some(true) {
            return Err(AuthError::UserDisabled);
        }

        let tokens = self.generate_tokens(user_id)?;
        let now = Utc::now();
        let expires_at = now + chrono::Duration::seconds(self.jwt_config.refresh_token_expiry_secs);

        // Matching on the old hash makes a concurrent second rotation a no-op.
        let rotated = sqlx::query(
            r#"
            UPDATE user_sessions
            SET token_hash = $1, refresh_token_hash = $2, expires_at = $3, last_used_at = $4
            WHERE id = $5 AND refresh_token_hash = $6
            "#,
        )
        .bind(sha256_hex(&tokens.access_token_jti))
        .bind(sha256_hex(&tokens.refresh_token_jti))
        .bind(expires_at)
        .bind(now)
        .bind(session.id)
        .bind(&jti_hash)
        .execute(&self.pool)
        .await?;

        if rotated.rows_affected() == 0 {
            return Err(AuthError::SessionNotFound);
        }

        Ok(tokens)
    }

    /// Ends the session holding `refresh_token`, or every session of its
    /// user when `all_devices` is set.
    pub async fn logout(&self, refresh_token: &str, all_devices: bool) -> Result<(), AuthError> {
        let claims = self.validate_refresh(refresh_token)?;
        let user_id = claims.user_id().map_err(|_| AuthError::InvalidRefreshToken)?;

        let result = if all_devices {
            sqlx::query("DELETE FROM user_sessions WHERE user_id = $1")
                .bind(user_id)
                .execute(&self.pool)
                .await?
        } else {
            sqlx::query("DELETE FROM user_sessions WHERE refresh_token_hash = $1 AND user_id = $2")
                .bind(sha256_hex(&claims.jti))
                .bind(user_id)
                .execute(&self.pool)
                .await?
        };

        if result.rows_affected() == 0 {
            tracing::debug!(user_id = %user_id, "No session found during logout");
        }
        Ok(())
    }

    fn validate_refresh(&self, refresh_token: &str) -> Result<shared::jwt::Claims, AuthError> {
        self.jwt_config
            .validate_refresh_token(refresh_token)
            .map_err(|e| match e {
                JwtError::TokenExpired | JwtError::InvalidToken | JwtError::DecodingError(_) => {
                    AuthError::InvalidRefreshToken
                }
                other => AuthError::TokenError(other),
            })
    }

    fn generate_tokens(&self, user_id: Uuid) -> Result<TokenPair, AuthError> {
        let access = self.jwt_config.generate_access_token(user_id)?;
        let refresh = self.jwt_config.generate_refresh_token(user_id)?;

        Ok(TokenPair {
            access_token: access.token,
            access_token_jti: access.jti,
            refresh_token: refresh.token,
            refresh_token_jti: refresh.jti,
            expires_in: self.jwt_config.access_token_expiry_secs,
        })
    }

    async fn create_session(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user_id: Uuid,
        tokens: &TokenPair,
    ) -> Result<(), AuthError> {
        let expires_at =
            Utc::now() + chrono::Duration::seconds(self.jwt_config.refresh_token_expiry_secs);

        sqlx::query(
            r#"
            INSERT INTO user_sessions (user_id, token_hash, refresh_token_hash, expires_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(user_id)
        .bind(sha256_hex(&tokens.access_token_jti))
        .bind(sha256_hex(&tokens.refresh_token_jti))
        .bind(expires_at)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }
}
