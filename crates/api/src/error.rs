use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use domain::services::WorkflowError;
use persistence::repositories::BorrowRequestError;
use serde::Serialize;
use shared::pagination::CursorError;
use thiserror::Error;

use crate::services::auth::AuthError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    message: String,
}

#[derive(Debug)]
struct ValidationDetail {
    field: String,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match &self {
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "unauthorized", msg.clone()),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, "forbidden", msg.clone()),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg.clone()),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg.clone()),
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, "validation_error", msg.clone()),
            ApiError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".into(),
                )
            }
            ApiError::ServiceUnavailable(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "service_unavailable",
                msg.clone(),
            ),
        };

        let body = ErrorBody {
            error: error_code.into(),
            message,
        };

        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ApiError::NotFound("Resource not found".into()),
            sqlx::Error::Database(db_err) => {
                if let Some(code) = db_err.code() {
                    match code.as_ref() {
                        "23505" => ApiError::Conflict("Resource already exists".into()),
                        "23503" => ApiError::NotFound("Referenced resource not found".into()),
                        _ => ApiError::Internal(format!("Database error: {}", db_err)),
                    }
                } else {
                    ApiError::Internal(format!("Database error: {}", db_err))
                }
            }
            _ => ApiError::Internal(format!("Database error: {}", err)),
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let details: Vec<ValidationDetail> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |e| ValidationDetail {
                    field: field.to_string(),
                    message: e
                        .message
                        .clone()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("{} is invalid", field)),
                })
            })
            .collect();

        let message = match details.as_slice() {
            [single] => single.message.clone(),
            _ => {
                let fields: Vec<&str> = details.iter().map(|d| d.field.as_str()).collect();
                format!("{} validation errors: {}", details.len(), fields.join(", "))
            }
        };

        ApiError::Validation(message)
    }
}

impl From<WorkflowError> for ApiError {
    fn from(err: WorkflowError) -> Self {
        match err {
            WorkflowError::InvalidDates(msg) => ApiError::Validation(msg),
            other => ApiError::Conflict(other.to_string()),
        }
    }
}

impl From<BorrowRequestError> for ApiError {
    fn from(err: BorrowRequestError) -> Self {
        match err {
            BorrowRequestError::NotFound => ApiError::NotFound("Borrow request not found".into()),
            BorrowRequestError::DroneNotFound => ApiError::NotFound("Drone not found".into()),
            BorrowRequestError::Workflow(e) => e.into(),
            BorrowRequestError::Database(e) => e.into(),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::EmailAlreadyExists => ApiError::Conflict(err.to_string()),
            AuthError::WeakPassword(msg) => ApiError::Validation(msg),
            AuthError::InvalidCredentials
            | AuthError::UserDisabled
            | AuthError::InvalidRefreshToken
            | AuthError::SessionNotFound => ApiError::Unauthorized(err.to_string()),
            AuthError::ProfileNotFound | AuthError::RoleMismatch { .. } => {
                ApiError::Forbidden(err.to_string())
            }
            AuthError::DatabaseError(db_err) => db_err.into(),
            AuthError::TokenError(_) | AuthError::PasswordError(_) => {
                ApiError::Internal(err.to_string())
            }
        }
    }
}

impl From<CursorError> for ApiError {
    fn from(err: CursorError) -> Self {
        ApiError::Validation(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use domain::models::{DroneStatus, RequestStatus};
    use uuid::Uuid;

    #[test]
    fn test_api_error_statuses() {
        let cases = [
            (ApiError::Unauthorized("x".into()), StatusCode::UNAUTHORIZED),
            (ApiError::Forbidden("x".into()), StatusCode::FORBIDDEN),
            (ApiError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (ApiError::Conflict("x".into()), StatusCode::CONFLICT),
            (ApiError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (ApiError::Internal("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (ApiError::ServiceUnavailable("x".into()), StatusCode::SERVICE_UNAVAILABLE),
        ];
        for (error, status) in cases {
            assert_eq!(error.into_response().status(), status);
        }
    }

    #[test]
    fn test_api_error_display() {
        assert_eq!(
            format!("{}", ApiError::Unauthorized("test".to_string())),
            "Unauthorized: test"
        );
        assert_eq!(
            format!("{}", ApiError::Validation("test".to_string())),
            "Validation error: test"
        );
        assert_eq!(
            format!("{}", ApiError::Internal("test".to_string())),
            "Internal error: test"
        );
    }

    #[tokio::test]
    async fn test_error_body_shape() {
        let response = ApiError::Forbidden("Admins only".into()).into_response();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "forbidden");
        assert_eq!(body["message"], "Admins only");
    }

    #[tokio::test]
    async fn test_internal_error_hides_details() {
        let response = ApiError::Internal("connection refused on 10.0.0.3".into()).into_response();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["message"], "An internal error occurred");
    }

    #[test]
    fn test_from_sqlx_row_not_found() {
        let error: ApiError = sqlx::Error::RowNotFound.into();
        match error {
            ApiError::NotFound(msg) => assert_eq!(msg, "Resource not found"),
            _ => panic!("Expected NotFound error"),
        }
    }

    #[test]
    fn test_from_workflow_error() {
        let invalid: ApiError = WorkflowError::InvalidTransition {
            action: "approve",
            from: RequestStatus::Rejected,
        }
        .into();
        assert!(matches!(invalid, ApiError::Conflict(_)));

        let dates: ApiError = WorkflowError::InvalidDates("bad".into()).into();
        assert!(matches!(dates, ApiError::Validation(msg) if msg == "bad"));

        let overlap: ApiError = WorkflowError::Overlap(Uuid::nil()).into();
        assert!(matches!(overlap, ApiError::Conflict(_)));

        let unavailable: ApiError = WorkflowError::DroneUnavailable(DroneStatus::Damaged).into();
        assert!(matches!(unavailable, ApiError::Conflict(_)));
    }

    #[test]
    fn test_from_borrow_request_error() {
        let err: ApiError = BorrowRequestError::NotFound.into();
        assert!(matches!(err, ApiError::NotFound(_)));

        let err: ApiError = BorrowRequestError::DroneNotFound.into();
        assert!(matches!(err, ApiError::NotFound(msg) if msg == "Drone not found"));
    }

    #[test]
    fn test_from_auth_error() {
        let err: ApiError = AuthError::RoleMismatch {
            claimed: domain::models::Role::Superadmin,
        }
        .into();
        assert!(matches!(
            err,
            ApiError::Forbidden(msg) if msg == "Access denied. You don't have superadmin privileges."
        ));

        let err: ApiError = AuthError::InvalidCredentials.into();
        assert!(matches!(err, ApiError::Unauthorized(msg) if msg == "Invalid email or password"));

        let err: ApiError = AuthError::EmailAlreadyExists.into();
        assert!(matches!(err, ApiError::Conflict(_)));

        let err: ApiError = AuthError::ProfileNotFound.into();
        assert!(matches!(err, ApiError::Forbidden(_)));
    }

    #[test]
    fn test_from_cursor_error() {
        let err: ApiError = CursorError::InvalidEncoding.into();
        assert!(matches!(err, ApiError::Validation(_)));
    }
}
