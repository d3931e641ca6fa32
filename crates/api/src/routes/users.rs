//! Account administration: listing accounts and changing roles.

use axum::{
    extract::{Path, State},
    Json,
};
use domain::models::profile::{UpdateRoleRequest, UserSummary};
use domain::models::Profile;
use persistence::repositories::ProfileRepository;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::CurrentUser;

#[derive(Debug, Serialize)]
pub struct ListUsersResponse {
    pub data: Vec<UserSummary>,
    pub total: usize,
}

/// GET /api/v1/admin/users
pub async fn list_users(State(state): State<AppState>) -> Result<Json<ListUsersResponse>, ApiError> {
    let data: Vec<UserSummary> = ProfileRepository::new(state.pool.clone())
        .list_with_users()
        .await?
        .into_iter()
        .map(UserSummary::from)
        .collect();

    Ok(Json(ListUsersResponse {
        total: data.len(),
        data,
    }))
}

/// PATCH /api/v1/superadmin/users/:user_id/role
///
/// A superadmin cannot change their own role, so the system always keeps the
/// account that is performing role changes.
pub async fn change_role(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(user_id): Path<Uuid>,
    Json(request): Json<UpdateRoleRequest>,
) -> Result<Json<Profile>, ApiError> {
    if user_id == user.user_id {
        return Err(ApiError::Conflict(
            "You cannot change your own role".to_string(),
        ));
    }

    let profile = ProfileRepository::new(state.pool.clone())
        .update_role(user_id, request.role, user.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    info!(
        target_user_id = %user_id,
        changed_by = %user.user_id,
        role = request.role.as_str(),
        "Role changed"
    );
    Ok(Json(profile.into()))
}
