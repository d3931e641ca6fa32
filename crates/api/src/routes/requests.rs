//! Borrow requests: submission, listing and admin decisions.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use domain::models::borrow_request::{
    CreateBorrowRequest, ListRequestsQuery, ListRequestsResponse,
};
use domain::models::BorrowRequestView;
use domain::services::borrow_workflow::{validate_submission, Transition};
use persistence::repositories::BorrowRequestRepository;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::metrics::record_request_transition;
use crate::middleware::CurrentUser;

async fn load_view(
    repo: &BorrowRequestRepository,
    id: Uuid,
) -> Result<BorrowRequestView, ApiError> {
    let today = Utc::now().date_naive();
    repo.find_detail_by_id(id)
        .await?
        .map(|detail| detail.into_view(today))
        .ok_or_else(|| ApiError::NotFound("Borrow request not found".to_string()))
}

/// POST /api/v1/requests
pub async fn submit_request(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(request): Json<CreateBorrowRequest>,
) -> Result<(StatusCode, Json<BorrowRequestView>), ApiError> {
    request.validate()?;
    validate_submission(&request, Utc::now().date_naive())?;

    let repo = BorrowRequestRepository::new(state.pool.clone());
    let created = repo.create(user.user_id, &request).await?;

    info!(
        request_id = %created.id,
        drone_id = %created.drone_id,
        user_id = %user.user_id,
        "Borrow request submitted"
    );
    Ok((StatusCode::CREATED, Json(load_view(&repo, created.id).await?)))
}

/// GET /api/v1/requests
pub async fn list_my_requests(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<ListRequestsResponse>, ApiError> {
    let today = Utc::now().date_naive();
    let data: Vec<BorrowRequestView> = BorrowRequestRepository::new(state.pool.clone())
        .list_for_user(user.user_id, None)
        .await?
        .into_iter()
        .map(|r| r.into_view(today))
        .collect();

    Ok(Json(ListRequestsResponse {
        total: data.len(),
        data,
    }))
}

/// GET /api/v1/admin/requests
pub async fn list_all_requests(
    State(state): State<AppState>,
    Query(query): Query<ListRequestsQuery>,
) -> Result<Json<ListRequestsResponse>, ApiError> {
    let today = Utc::now().date_naive();
    let data: Vec<BorrowRequestView> = BorrowRequestRepository::new(state.pool.clone())
        .list_all(query.status, None)
        .await?
        .into_iter()
        .map(|r| r.into_view(today))
        .collect();

    Ok(Json(ListRequestsResponse {
        total: data.len(),
        data,
    }))
}

async fn decide(
    state: AppState,
    user: CurrentUser,
    request_id: Uuid,
    transition: Transition,
) -> Result<Json<BorrowRequestView>, ApiError> {
    let repo = BorrowRequestRepository::new(state.pool.clone());
    let updated = repo
        .transition(request_id, transition, user.user_id, Utc::now().date_naive())
        .await?;

    record_request_transition(transition.verb());
    info!(
        request_id = %request_id,
        reviewer_id = %user.user_id,
        action = transition.verb(),
        "Borrow request decided"
    );
    Ok(Json(load_view(&repo, updated.id).await?))
}

/// POST /api/v1/admin/requests/:request_id/approve
pub async fn approve_request(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(request_id): Path<Uuid>,
) -> Result<Json<BorrowRequestView>, ApiError> {
    decide(state, user, request_id, Transition::Approve).await
}

/// POST /api/v1/admin/requests/:request_id/reject
pub async fn reject_request(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(request_id): Path<Uuid>,
) -> Result<Json<BorrowRequestView>, ApiError> {
    decide(state, user, request_id, Transition::Reject).await
}

/// POST /api/v1/admin/requests/:request_id/return
pub async fn return_request(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(request_id): Path<Uuid>,
) -> Result<Json<BorrowRequestView>, ApiError> {
    decide(state, user, request_id, Transition::Return).await
}
