//! Sign-up, sign-in, token refresh and logout.

use axum::{extract::State, http::StatusCode, Json};
use domain::models::{Profile, Role};
use serde::{Deserialize, Serialize};
use shared::validation::validate_not_blank;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::services::auth::{AuthService, TokenPair};

pub const SIGN_UP_MESSAGE: &str =
    "Account created. New accounts are created with user role by default.";

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,

    #[validate(
        length(min = 1, max = 100, message = "Name must be 1-100 characters"),
        custom(function = "validate_not_blank")
    )]
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterResponse {
    pub email: String,
    pub profile: Profile,
    pub message: &'static str,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,

    /// The role the caller claims to hold.
    pub role: Role,
}

#[derive(Debug, Clone, Serialize)]
pub struct TokensResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: &'static str,
    pub expires_in: i64,
}

impl From<TokenPair> for TokensResponse {
    fn from(tokens: TokenPair) -> Self {
        Self {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            token_type: "Bearer",
            expires_in: tokens.expires_in,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub email: String,
    pub profile: Profile,
    pub tokens: TokensResponse,
    pub dashboard_path: &'static str,
    pub message: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RefreshRequest {
    #[validate(length(min = 1, message = "Refresh token is required"))]
    pub refresh_token: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LogoutRequest {
    #[validate(length(min = 1, message = "Refresh token is required"))]
    pub refresh_token: String,

    #[serde(default)]
    pub all_devices: bool,
}

fn auth_service(state: &AppState) -> Result<AuthService, ApiError> {
    AuthService::new(state.pool.clone(), &state.config.jwt)
        .map_err(|e| ApiError::Internal(format!("Failed to initialize auth service: {}", e)))
}

/// POST /api/v1/auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    request.validate()?;

    let (email, profile) = auth_service(&state)?
        .register(&request.email, &request.password, &request.name)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            email,
            profile,
            message: SIGN_UP_MESSAGE,
        }),
    ))
}

/// POST /api/v1/auth/login
///
/// Fails with 403 when the claimed role differs from the stored one; in that
/// case no tokens and no dashboard path are returned.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    request.validate()?;

    let result = auth_service(&state)?
        .login(&request.email, &request.password, request.role)
        .await?;

    let message = result.welcome_message();
    let dashboard_path = result.profile.role.dashboard_path();

    Ok(Json(LoginResponse {
        email: result.email,
        profile: result.profile,
        tokens: result.tokens.into(),
        dashboard_path,
        message,
    }))
}

/// POST /api/v1/auth/refresh
pub async fn refresh(
    State(state): State<AppState>,
    Json(request): Json<RefreshRequest>,
) -> Result<Json<TokensResponse>, ApiError> {
    request.validate()?;

    let tokens = auth_service(&state)?.refresh(&request.refresh_token).await?;
    Ok(Json(tokens.into()))
}

/// POST /api/v1/auth/logout
pub async fn logout(
    State(state): State<AppState>,
    Json(request): Json<LogoutRequest>,
) -> Result<StatusCode, ApiError> {
    request.validate()?;

    auth_service(&state)?
        .logout(&request.refresh_token, request.all_devices)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fake::faker::internet::en::SafeEmail;
    use fake::faker::name::en::Name;
    use fake::Fake;

    fn register_request(name: &str) -> RegisterRequest {
        RegisterRequest {
            email: SafeEmail().fake(),
            password: "hover-123".to_string(),
            name: name.to_string(),
        }
    }

    #[test]
    fn test_register_request_validation() {
        let name: String = Name().fake();
        assert!(register_request(&name).validate().is_ok());
    }

    #[test]
    fn test_register_request_invalid_email() {
        let mut request = register_request("Kai");
        request.email = "not-an-email".to_string();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_register_request_blank_name() {
        assert!(register_request("").validate().is_err());
        assert!(register_request("   ").validate().is_err());
        assert!(register_request(&"A".repeat(101)).validate().is_err());
    }

    #[test]
    fn test_login_request_parses_role() {
        let request: LoginRequest = serde_json::from_str(
            r#"{"email":"kai@dronehub.test","password":"hover-123","role":"admin"}"#,
        )
        .unwrap();
        assert_eq!(request.role, Role::Admin);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_login_request_rejects_unknown_role() {
        let result: Result<LoginRequest, _> = serde_json::from_str(
            r#"{"email":"kai@dronehub.test","password":"hover-123","role":"owner"}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_logout_defaults_to_single_session() {
        let request: LogoutRequest = serde_json::from_str(r#"{"refresh_token":"t"}"#).unwrap();
        assert!(!request.all_devices);
    }

    #[test]
    fn test_tokens_response_is_bearer() {
        let tokens = TokensResponse::from(TokenPair {
            access_token: "a".to_string(),
            access_token_jti: "aj".to_string(),
            refresh_token: "r".to_string(),
            refresh_token_jti: "rj".to_string(),
            expires_in: 900,
        });
        assert_eq!(tokens.token_type, "Bearer");
        assert_eq!(tokens.expires_in, 900);
    }
}
