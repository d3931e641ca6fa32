//! Bearer token authentication.
//!
//! The token only proves identity. The caller's role comes from the stored
//! profile, re-read on every request, so role changes apply immediately.

use axum::{
    body::Body,
    extract::State,
    http::{header::AUTHORIZATION, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use domain::models::Role;
use persistence::repositories::ProfileRepository;
use shared::jwt::JwtConfig;
use uuid::Uuid;

use crate::app::AppState;
use crate::config::JwtAuthConfig;
use crate::error::ApiError;

/// Identity proven by a valid access token.
#[derive(Debug, Clone)]
pub struct TokenAuth {
    pub user_id: Uuid,
    pub jti: String,
}

impl TokenAuth {
    pub fn validate(jwt_config: &JwtConfig, token: &str) -> Result<Self, String> {
        let claims = jwt_config
            .validate_access_token(token)
            .map_err(|e| format!("Invalid token: {}", e))?;
        let user_id = claims
            .user_id()
            .map_err(|_| "Invalid user ID in token".to_string())?;

        Ok(TokenAuth {
            user_id,
            jti: claims.jti,
        })
    }

    pub fn create_jwt_config(config: &JwtAuthConfig) -> Result<JwtConfig, String> {
        JwtConfig::with_leeway(
            &config.private_key,
            &config.public_key,
            config.access_token_expiry_secs,
            config.refresh_token_expiry_secs,
            config.leeway_secs,
        )
        .map_err(|e| format!("Failed to initialize JWT config: {}", e))
    }
}

/// The authenticated caller with their stored profile.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user_id: Uuid,
    pub email: String,
    pub name: String,
    pub role: Role,
}

/// Extracts the token from `Authorization: Bearer <token>`.
pub fn bearer_token(req: &Request<Body>) -> Option<&str> {
    req.headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Validates the bearer token, loads the caller's active profile and stores
/// it as [`CurrentUser`] in the request extensions.
pub async fn require_user_auth(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    match authenticate(&state, &req).await {
        Ok(user) => {
            tracing::Span::current().record("user_id", tracing::field::display(user.user_id));
            req.extensions_mut().insert(user);
            next.run(req).await
        }
        Err(e) => e.into_response(),
    }
}

// `Body` is not `Sync`, so the request reference must not be held across the
// `.await`; token checks run synchronously and only owned data is awaited on.
fn authenticate<'a>(
    state: &'a AppState,
    req: &Request<Body>,
) -> impl std::future::Future<Output = Result<CurrentUser, ApiError>> + Send + 'a {
    let auth = validate_request_token(state, req);
    async move {
        let auth = auth?;

        let profile = ProfileRepository::new(state.pool.clone())
            .find_active_with_user(auth.user_id)
            .await?
            .ok_or_else(|| ApiError::Unauthorized("Account not found or disabled".to_string()))?;

        Ok(CurrentUser {
            user_id: profile.user_id,
            email: profile.email,
            name: profile.name,
            role: profile.role.into(),
        })
    }
}

fn validate_request_token(state: &AppState, req: &Request<Body>) -> Result<TokenAuth, ApiError> {
    let token = bearer_token(req).ok_or_else(|| {
        ApiError::Unauthorized("Missing or invalid Authorization header".to_string())
    })?;

    let jwt_config = TokenAuth::create_jwt_config(&state.config.jwt).map_err(|e| {
        tracing::error!("Failed to create JWT config: {}", e);
        ApiError::Internal("Authentication service unavailable".to_string())
    })?;

    let auth = TokenAuth::validate(&jwt_config, token).map_err(|e| {
        tracing::debug!("JWT validation failed: {}", e);
        ApiError::Unauthorized("Invalid or expired token".to_string())
    })?;

    Ok(auth)
}
