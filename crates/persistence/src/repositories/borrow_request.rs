//! Borrow request repository.
//!
//! Status transitions lock the request and its drone (`FOR UPDATE`, always in
//! that order) so two concurrent approvals for one drone are serialized. The
//! drone's other approved requests are read inside the same transaction, both
//! for the overlap check and to decide whether a return frees the drone.

use chrono::{NaiveDate, Utc};
use domain::models::borrow_request::CreateBorrowRequest;
use domain::models::{BorrowRequest, DroneStatus, LogAction, NewActivityLog, RequestStatus};
use domain::services::borrow_workflow::{
    apply_transition, check_approval, drone_status_after, effective_drone_status,
    ensure_drone_in_service, Transition, WorkflowError,
};
use serde_json::json;
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use crate::entities::{
    BorrowRequestDetailEntity, BorrowRequestEntity, DroneStatusDb, RequestStatusDb,
};
use crate::metrics::QueryTimer;
use crate::repositories::activity_log::append_log;

const REQUEST_COLUMNS: &str = "id, user_id, drone_id, purpose, start_date, end_date, status, \
                               reviewed_by, reviewed_at, created_at, updated_at";

const SELECT_DETAIL: &str = r#"
    SELECT r.id, r.user_id, r.drone_id, r.purpose, r.start_date, r.end_date, r.status,
           r.reviewed_by, r.reviewed_at, r.created_at, r.updated_at,
           p.name AS requester_name, d.name AS drone_name
    FROM borrow_requests r
    LEFT JOIN profiles p ON p.user_id = r.user_id
    LEFT JOIN drones d ON d.id = r.drone_id
"#;

#[derive(Debug, Error)]
pub enum BorrowRequestError {
    #[error("Borrow request not found")]
    NotFound,

    #[error("Drone not found")]
    DroneNotFound,

    #[error(transparent)]
    Workflow(#[from] WorkflowError),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

#[derive(Clone)]
pub struct BorrowRequestRepository {
    pool: PgPool,
}

impl BorrowRequestRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Stores a new pending request after checking the drone is in service.
    /// Date rules are checked by the caller.
    pub async fn create(
        &self,
        user_id: Uuid,
        input: &CreateBorrowRequest,
    ) -> Result<BorrowRequestEntity, BorrowRequestError> {
        let timer = QueryTimer::new("create_borrow_request");
        let mut tx = self.pool.begin().await?;

        let drone: Option<(DroneStatusDb,)> =
            sqlx::query_as("SELECT status FROM drones WHERE id = $1 FOR SHARE")
                .bind(input.drone_id)
                .fetch_optional(&mut *tx)
                .await?;
        let (drone_status,) = drone.ok_or(BorrowRequestError::DroneNotFound)?;
        ensure_drone_in_service(drone_status.into())?;

        let sql = format!(
            r#"
            INSERT INTO borrow_requests (user_id, drone_id, purpose, start_date, end_date, status)
            VALUES ($1, $2, $3, $4, $5, 'pending')
            RETURNING {}
            "#,
            REQUEST_COLUMNS
        );
        let request = sqlx::query_as::<_, BorrowRequestEntity>(&sql)
            .bind(user_id)
            .bind(input.drone_id)
            .bind(input.purpose.trim())
            .bind(input.start_date)
            .bind(input.end_date)
            .fetch_one(&mut *tx)
            .await?;

        append_log(
            &mut *tx,
            &NewActivityLog::new(LogAction::RequestSubmitted, Some(user_id)).with_details(json!({
                "request_id": request.id,
                "drone_id": request.drone_id,
                "start_date": request.start_date,
                "end_date": request.end_date,
            })),
        )
        .await?;

        tx.commit().await?;
        timer.record();
        Ok(request)
    }

    pub async fn find_detail_by_id(
        &self,
        id: Uuid,
    ) -> Result<Option<BorrowRequestDetailEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_borrow_request_detail");
        let sql = format!("{} WHERE r.id = $1", SELECT_DETAIL);
        let result = sqlx::query_as::<_, BorrowRequestDetailEntity>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await;
        timer.record();
        result
    }

    /// A user's own requests, newest first.
    pub async fn list_for_user(
        &self,
        user_id: Uuid,
        limit: Option<i64>,
    ) -> Result<Vec<BorrowRequestDetailEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_borrow_requests_for_user");
        let sql = format!(
            "{} WHERE r.user_id = $1 ORDER BY r.created_at DESC, r.id DESC LIMIT $2",
            SELECT_DETAIL
        );
        let result = sqlx::query_as::<_, BorrowRequestDetailEntity>(&sql)
            .bind(user_id)
            .bind(limit)
            .fetch_all(&self.pool)
            .await;
        timer.record();
        result
    }

    /// All requests, optionally filtered by status, newest first.
    pub async fn list_all(
        &self,
        status: Option<RequestStatus>,
        limit: Option<i64>,
    ) -> Result<Vec<BorrowRequestDetailEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_borrow_requests");
        let sql = format!(
            "{} WHERE ($1::request_status IS NULL OR r.status = $1) \
             ORDER BY r.created_at DESC, r.id DESC LIMIT $2",
            SELECT_DETAIL
        );
        let result = sqlx::query_as::<_, BorrowRequestDetailEntity>(&sql)
            .bind(status.map(RequestStatusDb::from))
            .bind(limit)
            .fetch_all(&self.pool)
            .await;
        timer.record();
        result
    }

    /// Applies an admin decision inside one transaction.
    pub async fn transition(
        &self,
        id: Uuid,
        transition: Transition,
        reviewer_id: Uuid,
        today: NaiveDate,
    ) -> Result<BorrowRequestEntity, BorrowRequestError> {
        let timer = QueryTimer::new("transition_borrow_request");
        let mut tx = self.pool.begin().await?;

        let select_request = format!(
            "SELECT {} FROM borrow_requests WHERE id = $1 FOR UPDATE",
            REQUEST_COLUMNS
        );
        let request: BorrowRequest = sqlx::query_as::<_, BorrowRequestEntity>(&select_request)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(BorrowRequestError::NotFound)?
            .into();

        let next_status = apply_transition(request.status, transition)?;

        let (drone_status,): (DroneStatusDb,) =
            sqlx::query_as("SELECT status FROM drones WHERE id = $1 FOR UPDATE")
                .bind(request.drone_id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or(BorrowRequestError::DroneNotFound)?;
        let stored_drone_status = DroneStatus::from(drone_status);

        let select_approved = format!(
            "SELECT {} FROM borrow_requests \
             WHERE drone_id = $1 AND status = 'approved' AND id <> $2",
            REQUEST_COLUMNS
        );
        let other_approved: Vec<BorrowRequest> =
            sqlx::query_as::<_, BorrowRequestEntity>(&select_approved)
                .bind(request.drone_id)
                .bind(request.id)
                .fetch_all(&mut *tx)
                .await?
                .into_iter()
                .map(BorrowRequest::from)
                .collect();

        let held = std::iter::once(&request)
            .chain(other_approved.iter())
            .cloned()
            .collect::<Vec<_>>();
        let drone_status = effective_drone_status(stored_drone_status, &held, today);

        if transition == Transition::Approve {
            check_approval(&request, drone_status, &other_approved)?;
        }

        let now = Utc::now();
        let reviewed = matches!(transition, Transition::Approve | Transition::Reject);
        let update_request = format!(
            r#"
            UPDATE borrow_requests
            SET status = $2,
                reviewed_by = CASE WHEN $3 THEN $4 ELSE reviewed_by END,
                reviewed_at = CASE WHEN $3 THEN $5 ELSE reviewed_at END,
                updated_at = $5
            WHERE id = $1
            RETURNING {}
            "#,
            REQUEST_COLUMNS
        );
        let updated = sqlx::query_as::<_, BorrowRequestEntity>(&update_request)
            .bind(id)
            .bind(RequestStatusDb::from(next_status))
            .bind(reviewed)
            .bind(reviewer_id)
            .bind(now)
            .fetch_one(&mut *tx)
            .await?;

        let new_drone_status =
            drone_status_after(transition, &request, drone_status, &other_approved, today)
                .unwrap_or(drone_status);
        if new_drone_status != stored_drone_status {
            sqlx::query("UPDATE drones SET status = $2, updated_at = $3 WHERE id = $1")
                .bind(request.drone_id)
                .bind(DroneStatusDb::from(new_drone_status))
                .bind(now)
                .execute(&mut *tx)
                .await?;
        }

        append_log(
            &mut *tx,
            &NewActivityLog::new(transition.log_action(), Some(reviewer_id)).with_details(json!({
                "request_id": id,
                "drone_id": request.drone_id,
                "requester_id": request.user_id,
                "from": request.status,
                "to": next_status,
                "drone_status": new_drone_status,
            })),
        )
        .await?;

        tx.commit().await?;
        timer.record();
        Ok(updated)
    }
}
