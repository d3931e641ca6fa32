//! Activity log repository.
//!
//! Entries are only ever inserted. Mutating operations append their entry on
//! the same transaction so the log never records a change that rolled back.

use chrono::{DateTime, Utc};
use domain::models::NewActivityLog;
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use crate::entities::ActivityLogEntity;
use crate::metrics::QueryTimer;

const SELECT_LOG: &str = r#"
    SELECT l.id, l.action, l.actor_id, p.name AS actor_name, l.details, l.created_at
    FROM logs l
    LEFT JOIN profiles p ON p.user_id = l.actor_id
"#;

/// Appends an entry using any executor (pool or open transaction).
pub async fn append_log<'e, E>(executor: E, entry: &NewActivityLog) -> Result<Uuid, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    let timer = QueryTimer::new("append_log");
    let result: Result<(Uuid,), sqlx::Error> = sqlx::query_as(
        r#"
        INSERT INTO logs (action, actor_id, details)
        VALUES ($1, $2, $3)
        RETURNING id
        "#,
    )
    .bind(entry.action.as_str())
    .bind(entry.actor_id)
    .bind(&entry.details)
    .fetch_one(executor)
    .await;
    timer.record();
    result.map(|(id,)| id)
}

#[derive(Clone)]
pub struct ActivityLogRepository {
    pool: PgPool,
}

impl ActivityLogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Newest-first page strictly after the `(created_at, id)` cursor.
    ///
    /// Fetches `limit + 1` rows; the caller uses the extra row to detect
    /// whether another page exists.
    pub async fn list_page(
        &self,
        cursor: Option<(DateTime<Utc>, Uuid)>,
        limit: i64,
    ) -> Result<Vec<ActivityLogEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_logs_page");
        let result = match cursor {
            Some((created_at, id)) => {
                let sql = format!(
                    "{} WHERE (l.created_at, l.id) < ($1, $2) ORDER BY l.created_at DESC, l.id DESC LIMIT $3",
                    SELECT_LOG
                );
                sqlx::query_as::<_, ActivityLogEntity>(&sql)
                    .bind(created_at)
                    .bind(id)
                    .bind(limit + 1)
                    .fetch_all(&self.pool)
                    .await
            }
            None => {
                let sql = format!(
                    "{} ORDER BY l.created_at DESC, l.id DESC LIMIT $1",
                    SELECT_LOG
                );
                sqlx::query_as::<_, ActivityLogEntity>(&sql)
                    .bind(limit + 1)
                    .fetch_all(&self.pool)
                    .await
            }
        };
        timer.record();
        result
    }

    pub async fn recent(&self, limit: i64) -> Result<Vec<ActivityLogEntity>, sqlx::Error> {
        let timer = QueryTimer::new("recent_logs");
        let sql = format!(
            "{} ORDER BY l.created_at DESC, l.id DESC LIMIT $1",
            SELECT_LOG
        );
        let result = sqlx::query_as::<_, ActivityLogEntity>(&sql)
            .bind(limit)
            .fetch_all(&self.pool)
            .await;
        timer.record();
        result
    }

    pub async fn count(&self) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_logs");
        let result: Result<(i64,), sqlx::Error> = sqlx::query_as("SELECT COUNT(*) FROM logs")
            .fetch_one(&self.pool)
            .await;
        timer.record();
        result.map(|(n,)| n)
    }
}
