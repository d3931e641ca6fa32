//! Drone repository for database operations.

use chrono::{NaiveDate, Utc};
use domain::models::drone::{CreateDroneRequest, UpdateDroneRequest};
use domain::models::{DroneStatus, LogAction, NewActivityLog};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{DroneEntity, DroneStatusDb};
use crate::metrics::QueryTimer;
use crate::repositories::activity_log::append_log;

const DRONE_COLUMNS: &str = "id, name, model, serial_number, status, created_at, updated_at";

/// Drones as reported to readers: an `available` drone with an approved
/// request that has started (`start_date <= $1`) reads as `borrowed`.
pub(crate) const EFFECTIVE_DRONES: &str = r#"
    SELECT d.id, d.name, d.model, d.serial_number,
           CASE
               WHEN d.status = 'available' AND EXISTS (
                   SELECT 1 FROM borrow_requests r
                   WHERE r.drone_id = d.id AND r.status = 'approved' AND r.start_date <= $1
               ) THEN 'borrowed'::drone_status
               ELSE d.status
           END AS status,
           d.created_at, d.updated_at
    FROM drones d
"#;

/// Result of a delete attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteDroneOutcome {
    Deleted,
    NotFound,
    /// Pending or approved requests still reference the drone.
    HasOpenRequests(i64),
}

#[derive(Clone)]
pub struct DroneRepository {
    pool: PgPool,
}

impl DroneRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Drones ordered by name. The status filter applies to the status as
    /// of `today`.
    pub async fn list(
        &self,
        status: Option<DroneStatus>,
        today: NaiveDate,
    ) -> Result<Vec<DroneEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_drones");
        let sql = format!(
            "SELECT {} FROM ({}) drones \
             WHERE ($2::drone_status IS NULL OR status = $2) ORDER BY name ASC",
            DRONE_COLUMNS, EFFECTIVE_DRONES
        );
        let result = sqlx::query_as::<_, DroneEntity>(&sql)
            .bind(today)
            .bind(status.map(DroneStatusDb::from))
            .fetch_all(&self.pool)
            .await;
        timer.record();
        result
    }

    pub async fn find_by_id(
        &self,
        id: Uuid,
        today: NaiveDate,
    ) -> Result<Option<DroneEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_drone_by_id");
        let sql = format!(
            "SELECT {} FROM ({}) drones WHERE id = $2",
            DRONE_COLUMNS, EFFECTIVE_DRONES
        );
        let result = sqlx::query_as::<_, DroneEntity>(&sql)
            .bind(today)
            .bind(id)
            .fetch_optional(&self.pool)
            .await;
        timer.record();
        result
    }

    /// Inserts a drone. A duplicate serial number surfaces as a unique violation.
    pub async fn create(
        &self,
        input: &CreateDroneRequest,
        created_by: Uuid,
    ) -> Result<DroneEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_drone");
        let mut tx = self.pool.begin().await?;

        let sql = format!(
            r#"
            INSERT INTO drones (name, model, serial_number, status)
            VALUES ($1, $2, $3, $4)
            RETURNING {}
            "#,
            DRONE_COLUMNS
        );
        let drone = sqlx::query_as::<_, DroneEntity>(&sql)
            .bind(input.name.trim())
            .bind(input.model.as_deref())
            .bind(input.serial_number.as_deref())
            .bind(DroneStatusDb::from(input.status))
            .fetch_one(&mut *tx)
            .await?;

        append_log(
            &mut *tx,
            &NewActivityLog::new(LogAction::DroneCreated, Some(created_by)).with_details(json!({
                "drone_id": drone.id,
                "name": drone.name,
            })),
        )
        .await?;

        tx.commit().await?;
        timer.record();
        Ok(drone)
    }

    /// Applies the present fields of `input`; an explicit `null` clears
    /// `model` or `serial_number`. Returns `None` when the drone does not
    /// exist. The returned status is the status as of `today`.
    pub async fn update(
        &self,
        id: Uuid,
        input: &UpdateDroneRequest,
        updated_by: Uuid,
        today: NaiveDate,
    ) -> Result<Option<DroneEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_drone");
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE drones
            SET name = COALESCE($2, name),
                model = CASE WHEN $3 THEN $4::text ELSE model END,
                serial_number = CASE WHEN $5 THEN $6::text ELSE serial_number END,
                status = COALESCE($7, status),
                updated_at = $8
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(input.name.as_deref().map(str::trim))
        .bind(input.model.is_some())
        .bind(input.model.clone().flatten())
        .bind(input.serial_number.is_some())
        .bind(input.serial_number.clone().flatten())
        .bind(input.status.map(DroneStatusDb::from))
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            timer.record();
            return Ok(None);
        }

        let select = format!(
            "SELECT {} FROM ({}) drones WHERE id = $2",
            DRONE_COLUMNS, EFFECTIVE_DRONES
        );
        let drone = sqlx::query_as::<_, DroneEntity>(&select)
            .bind(today)
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

        append_log(
            &mut *tx,
            &NewActivityLog::new(LogAction::DroneUpdated, Some(updated_by)).with_details(json!({
                "drone_id": drone.id,
                "name": input.name,
                "model": input.model,
                "serial_number": input.serial_number,
                "status": input.status,
            })),
        )
        .await?;

        tx.commit().await?;
        timer.record();
        Ok(Some(drone))
    }

    /// Deletes a drone that has no pending or approved requests. Closed
    /// requests for it are removed with it.
    pub async fn delete(&self, id: Uuid, deleted_by: Uuid) -> Result<DeleteDroneOutcome, sqlx::Error> {
        let timer = QueryTimer::new("delete_drone");
        let mut tx = self.pool.begin().await?;

        let drone: Option<(String,)> =
            sqlx::query_as("SELECT name FROM drones WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some((name,)) = drone else {
            timer.record();
            return Ok(DeleteDroneOutcome::NotFound);
        };

        let (open,): (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*)
            FROM borrow_requests
            WHERE drone_id = $1 AND status IN ('pending', 'approved')
            "#,
        )
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        if open > 0 {
            timer.record();
            return Ok(DeleteDroneOutcome::HasOpenRequests(open));
        }

        sqlx::query("DELETE FROM drones WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        append_log(
            &mut *tx,
            &NewActivityLog::new(LogAction::DroneDeleted, Some(deleted_by))
                .with_details(json!({ "drone_id": id, "name": name })),
        )
        .await?;

        tx.commit().await?;
        timer.record();
        Ok(DeleteDroneOutcome::Deleted)
    }
}
