//! Overview and role dashboards.
//!
//! Each role dashboard is gated on the caller's stored role before any data
//! is read. A refused caller gets `307 Temporary Redirect` to their own
//! dashboard.

use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use domain::models::dashboard::OverviewDashboard;
use domain::services::{check_dashboard_access, DashboardAccess, DashboardView};
use persistence::repositories::DashboardRepository;
use tracing::{debug, info};

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::CurrentUser;

/// `Some(redirect)` when `user` may not open `view`.
fn gate(view: DashboardView, user: &CurrentUser) -> Option<Response> {
    match check_dashboard_access(view, user.role) {
        DashboardAccess::Granted => None,
        DashboardAccess::Redirect(path) => {
            debug!(
                user_id = %user.user_id,
                role = %user.role,
                view = ?view,
                to = path,
                "Dashboard access redirected"
            );
            Some(Redirect::temporary(path).into_response())
        }
    }
}

/// GET /api/v1/dashboard
pub async fn get_overview(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<OverviewDashboard>, ApiError> {
    let overview = DashboardRepository::new(state.pool.clone())
        .overview(user.user_id, user.role)
        .await?;
    Ok(Json(overview))
}

/// GET /api/v1/dashboards/user
pub async fn get_user_dashboard(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Response, ApiError> {
    if let Some(redirect) = gate(DashboardView::User, &user) {
        return Ok(redirect);
    }

    let dashboard = DashboardRepository::new(state.pool.clone())
        .user_dashboard(user.user_id)
        .await?;
    Ok(Json(dashboard).into_response())
}

/// GET /api/v1/dashboards/admin
pub async fn get_admin_dashboard(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Response, ApiError> {
    if let Some(redirect) = gate(DashboardView::Admin, &user) {
        return Ok(redirect);
    }

    let dashboard = DashboardRepository::new(state.pool.clone())
        .admin_dashboard()
        .await?;

    info!(
        user_id = %user.user_id,
        pending = dashboard.requests.pending,
        overdue = dashboard.requests.overdue,
        "Fetched admin dashboard"
    );
    Ok(Json(dashboard).into_response())
}

/// GET /api/v1/dashboards/superadmin
pub async fn get_superadmin_dashboard(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Response, ApiError> {
    if let Some(redirect) = gate(DashboardView::Superadmin, &user) {
        return Ok(redirect);
    }

    let dashboard = DashboardRepository::new(state.pool.clone())
        .superadmin_dashboard()
        .await?;
    Ok(Json(dashboard).into_response())
}
