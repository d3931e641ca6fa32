//! Role checks for management routes.
//!
//! Must run after [`require_user_auth`](super::user_auth::require_user_auth).
//! Unlike the dashboards, which redirect, these answer 403.

use axum::{
    body::Body,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use domain::models::Role;

use crate::error::ApiError;
use crate::middleware::user_auth::CurrentUser;

/// Admins and superadmins.
pub async fn require_admin(req: Request<Body>, next: Next) -> Response {
    require_role(req, next, Role::is_admin, "Administrator privileges required").await
}

pub async fn require_superadmin(req: Request<Body>, next: Next) -> Response {
    require_role(req, next, Role::is_superadmin, "Superadmin privileges required").await
}

async fn require_role(
    req: Request<Body>,
    next: Next,
    allowed: fn(&Role) -> bool,
    denied_message: &str,
) -> Response {
    let Some(user) = req.extensions().get::<CurrentUser>() else {
        tracing::warn!("Role guard called without an authenticated user");
        return ApiError::Unauthorized("Authentication required".to_string()).into_response();
    };

    if !allowed(&user.role) {
        tracing::debug!(user_id = %user.user_id, role = %user.role, "Role guard denied access");
        return ApiError::Forbidden(denied_message.to_string()).into_response();
    }

    next.run(req).await
}
