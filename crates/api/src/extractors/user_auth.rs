//! Handler access to the authenticated caller.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::error::ApiError;
use crate::middleware::user_auth::CurrentUser;

/// Reads the [`CurrentUser`] placed in the extensions by `require_user_auth`.
/// Using it on a route without that middleware yields 401.
#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or_else(|| ApiError::Unauthorized("Authentication required".to_string()))
    }
}
