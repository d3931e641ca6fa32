//! Drone inventory.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use domain::models::drone::{
    CreateDroneRequest, ListDronesQuery, ListDronesResponse, UpdateDroneRequest,
};
use domain::models::Drone;
use persistence::repositories::{DeleteDroneOutcome, DroneRepository};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::CurrentUser;

fn duplicate_serial(err: sqlx::Error) -> ApiError {
    match ApiError::from(err) {
        ApiError::Conflict(_) => {
            ApiError::Conflict("A drone with this serial number already exists".to_string())
        }
        other => other,
    }
}

/// GET /api/v1/drones
pub async fn list_drones(
    State(state): State<AppState>,
    Query(query): Query<ListDronesQuery>,
) -> Result<Json<ListDronesResponse>, ApiError> {
    let drones: Vec<Drone> = DroneRepository::new(state.pool.clone())
        .list(query.status, Utc::now().date_naive())
        .await?
        .into_iter()
        .map(Drone::from)
        .collect();

    Ok(Json(ListDronesResponse {
        total: drones.len(),
        data: drones,
    }))
}

/// GET /api/v1/drones/:drone_id
pub async fn get_drone(
    State(state): State<AppState>,
    Path(drone_id): Path<Uuid>,
) -> Result<Json<Drone>, ApiError> {
    let drone = DroneRepository::new(state.pool.clone())
        .find_by_id(drone_id, Utc::now().date_naive())
        .await?
        .ok_or_else(|| ApiError::NotFound("Drone not found".to_string()))?;
    Ok(Json(drone.into()))
}

/// POST /api/v1/admin/drones
pub async fn create_drone(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(request): Json<CreateDroneRequest>,
) -> Result<(StatusCode, Json<Drone>), ApiError> {
    request.validate()?;

    let drone = DroneRepository::new(state.pool.clone())
        .create(&request, user.user_id)
        .await
        .map_err(duplicate_serial)?;

    info!(drone_id = %drone.id, created_by = %user.user_id, "Drone created");
    Ok((StatusCode::CREATED, Json(drone.into())))
}

/// PATCH /api/v1/admin/drones/:drone_id
pub async fn update_drone(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(drone_id): Path<Uuid>,
    Json(request): Json<UpdateDroneRequest>,
) -> Result<Json<Drone>, ApiError> {
    request.validate()?;
    if request.is_empty() {
        return Err(ApiError::Validation(
            "At least one field must be provided".to_string(),
        ));
    }

    let drone = DroneRepository::new(state.pool.clone())
        .update(drone_id, &request, user.user_id, Utc::now().date_naive())
        .await
        .map_err(duplicate_serial)?
        .ok_or_else(|| ApiError::NotFound("Drone not found".to_string()))?;

    info!(drone_id = %drone_id, updated_by = %user.user_id, "Drone updated");
    Ok(Json(drone.into()))
}

/// DELETE /api/v1/admin/drones/:drone_id
pub async fn delete_drone(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(drone_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let outcome = DroneRepository::new(state.pool.clone())
        .delete(drone_id, user.user_id)
        .await?;

    match outcome {
        DeleteDroneOutcome::Deleted => {
            info!(drone_id = %drone_id, deleted_by = %user.user_id, "Drone deleted");
            Ok(StatusCode::NO_CONTENT)
        }
        DeleteDroneOutcome::NotFound => Err(ApiError::NotFound("Drone not found".to_string())),
        DeleteDroneOutcome::HasOpenRequests(count) => Err(ApiError::Conflict(format!(
            "Drone has {} pending or approved request(s)",
            count
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_serial_message() {
        let err = duplicate_serial(sqlx::Error::RowNotFound);
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[test]
    fn test_empty_patch_is_detected() {
        let request: UpdateDroneRequest = serde_json::from_str("{}").unwrap();
        assert!(request.is_empty());
    }

    #[test]
    fn test_null_patch_is_not_empty() {
        let request: UpdateDroneRequest = serde_json::from_str(r#"{"model":null}"#).unwrap();
        assert!(!request.is_empty());
        assert!(request.validate().is_ok());
    }
}
