//! Decorative drone vignette.

use axum::{extract::Query, Json};
use domain::models::scene::{ScenePose, SceneQuery};

use crate::error::ApiError;

/// GET /api/v1/scene?elapsed=<seconds>
///
/// Omitted `elapsed` means the pose at t = 0.
pub async fn get_scene(Query(query): Query<SceneQuery>) -> Result<Json<ScenePose>, ApiError> {
    let elapsed = query.elapsed.unwrap_or(0.0);
    if !elapsed.is_finite() || elapsed < 0.0 {
        return Err(ApiError::Validation(
            "elapsed must be a finite, non-negative number of seconds".to_string(),
        ));
    }
    Ok(Json(ScenePose::at(elapsed)))
}
