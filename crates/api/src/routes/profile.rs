//! Header profile card and sidebar navigation for the current caller.

use axum::Json;
use domain::models::navigation::NavigationResponse;
use domain::models::profile::{avatar_initial, CurrentProfileResponse};

use crate::middleware::CurrentUser;

/// GET /api/v1/me
pub async fn get_me(user: CurrentUser) -> Json<CurrentProfileResponse> {
    Json(CurrentProfileResponse {
        user_id: user.user_id,
        avatar_initial: avatar_initial(&user.name),
        dashboard_path: user.role.dashboard_path(),
        email: user.email,
        name: user.name,
        role: user.role,
    })
}

/// GET /api/v1/navigation
pub async fn get_navigation(user: CurrentUser) -> Json<NavigationResponse> {
    Json(NavigationResponse::for_role(user.role))
}
