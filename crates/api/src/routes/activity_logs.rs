//! Activity log browsing for superadmins.

use axum::{
    extract::{Query, State},
    Json,
};
use domain::models::activity_log::{ListLogsQuery, ListLogsResponse, PaginationInfo};
use domain::models::ActivityLog;
use persistence::repositories::ActivityLogRepository;
use shared::pagination::{decode_cursor, encode_cursor, resolve_limit};

use crate::app::AppState;
use crate::error::ApiError;

/// GET /api/v1/superadmin/logs
///
/// Newest first. `next_cursor` points at the last row returned and is only
/// present when another page exists.
pub async fn list_logs(
    State(state): State<AppState>,
    Query(query): Query<ListLogsQuery>,
) -> Result<Json<ListLogsResponse>, ApiError> {
    let limit = resolve_limit(query.limit).map_err(ApiError::Validation)?;
    let cursor = query
        .cursor
        .as_deref()
        .filter(|c| !c.is_empty())
        .map(decode_cursor)
        .transpose()?;

    let mut rows = ActivityLogRepository::new(state.pool.clone())
        .list_page(cursor, limit)
        .await?;

    let has_more = rows.len() as i64 > limit;
    rows.truncate(limit as usize);

    let next_cursor = if has_more {
        rows.last().map(|row| encode_cursor(row.created_at, row.id))
    } else {
        None
    };

    Ok(Json(ListLogsResponse {
        data: rows.into_iter().map(ActivityLog::from).collect(),
        pagination: PaginationInfo {
            next_cursor,
            has_more,
        },
    }))
}
