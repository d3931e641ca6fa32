//! Dashboard aggregate queries.
//!
//! Each dashboard is a fixed set of independent reads run concurrently with
//! `tokio::try_join!`. `COUNT(*)` over an empty table yields 0, so every
//! figure is always present.

use chrono::{NaiveDate, Utc};
use domain::models::dashboard::{
    AdminDashboard, DroneCounts, OverviewDashboard, RequestCounts, SuperadminDashboard,
    UserCounts, UserDashboard, ADMIN_RECENT_REQUESTS, SUPERADMIN_RECENT_LOGS,
    USER_RECENT_REQUESTS,
};
use domain::models::{ActivityLog, Role};
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::metrics::QueryTimer;
use crate::repositories::drone::EFFECTIVE_DRONES;
use crate::repositories::{ActivityLogRepository, BorrowRequestRepository};

#[derive(Clone)]
pub struct DashboardRepository {
    pool: PgPool,
}

impl DashboardRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn overview(&self, user_id: Uuid, role: Role) -> Result<OverviewDashboard, sqlx::Error> {
        let today = Utc::now().date_naive();
        let (drones, mine) = tokio::try_join!(
            self.drone_counts(today),
            self.request_counts(Some(user_id), today),
        )?;
        Ok(OverviewDashboard::new(role, &drones, &mine))
    }

    pub async fn user_dashboard(&self, user_id: Uuid) -> Result<UserDashboard, sqlx::Error> {
        let today = Utc::now().date_naive();
        let requests = BorrowRequestRepository::new(self.pool.clone());

        let (drones, mine, recent) = tokio::try_join!(
            self.drone_counts(today),
            self.request_counts(Some(user_id), today),
            requests.list_for_user(user_id, Some(USER_RECENT_REQUESTS)),
        )?;

        Ok(UserDashboard {
            available_drones: drones.available,
            total_drones: drones.total,
            my_requests: mine,
            recent_requests: recent.into_iter().map(|r| r.into_view(today)).collect(),
            generated_at: Utc::now(),
        })
    }

    pub async fn admin_dashboard(&self) -> Result<AdminDashboard, sqlx::Error> {
        let today = Utc::now().date_naive();
        let requests = BorrowRequestRepository::new(self.pool.clone());

        let (drones, request_counts, users, recent) = tokio::try_join!(
            self.drone_counts(today),
            self.request_counts(None, today),
            self.user_counts(),
            requests.list_all(None, Some(ADMIN_RECENT_REQUESTS)),
        )?;

        Ok(AdminDashboard {
            drones,
            requests: request_counts,
            users,
            recent_requests: recent.into_iter().map(|r| r.into_view(today)).collect(),
            generated_at: Utc::now(),
        })
    }

    pub async fn superadmin_dashboard(&self) -> Result<SuperadminDashboard, sqlx::Error> {
        let today = Utc::now().date_naive();
        let requests = BorrowRequestRepository::new(self.pool.clone());
        let logs = ActivityLogRepository::new(self.pool.clone());

        let (drones, request_counts, users, total_logs, recent, recent_logs) = tokio::try_join!(
            self.drone_counts(today),
            self.request_counts(None, today),
            self.user_counts(),
            logs.count(),
            requests.list_all(None, Some(ADMIN_RECENT_REQUESTS)),
            logs.recent(SUPERADMIN_RECENT_LOGS),
        )?;

        Ok(SuperadminDashboard {
            drones,
            requests: request_counts,
            users,
            total_logs,
            recent_requests: recent.into_iter().map(|r| r.into_view(today)).collect(),
            recent_logs: recent_logs.into_iter().map(ActivityLog::from).collect(),
            generated_at: Utc::now(),
        })
    }

    /// Drone counts by status as of `today`; started loans count as borrowed.
    pub async fn drone_counts(&self, today: NaiveDate) -> Result<DroneCounts, sqlx::Error> {
        let timer = QueryTimer::new("dashboard_drone_counts");
        let sql = format!(
            r#"
            SELECT
                COUNT(*) AS total,
                COUNT(*) FILTER (WHERE status = 'available') AS available,
                COUNT(*) FILTER (WHERE status = 'borrowed') AS borrowed,
                COUNT(*) FILTER (WHERE status = 'damaged') AS damaged,
                COUNT(*) FILTER (WHERE status = 'maintenance') AS maintenance
            FROM ({}) drones
            "#,
            EFFECTIVE_DRONES
        );
        let row = sqlx::query(&sql)
            .bind(today)
            .fetch_one(&self.pool)
            .await;
        timer.record();
        let row = row?;

        Ok(DroneCounts {
            total: row.get::<i64, _>("total"),
            available: row.get::<i64, _>("available"),
            borrowed: row.get::<i64, _>("borrowed"),
            damaged: row.get::<i64, _>("damaged"),
            maintenance: row.get::<i64, _>("maintenance"),
        })
    }

    /// Request counts for one user, or for everyone when `user_id` is `None`.
    pub async fn request_counts(
        &self,
        user_id: Option<Uuid>,
        today: NaiveDate,
    ) -> Result<RequestCounts, sqlx::Error> {
        let timer = QueryTimer::new("dashboard_request_counts");
        let row = sqlx::query(
            r#"
            SELECT
                COUNT(*) AS total,
                COUNT(*) FILTER (WHERE status = 'pending') AS pending,
                COUNT(*) FILTER (WHERE status = 'approved') AS approved,
                COUNT(*) FILTER (WHERE status = 'rejected') AS rejected,
                COUNT(*) FILTER (WHERE status = 'returned') AS returned,
                COUNT(*) FILTER (WHERE status = 'approved' AND end_date < $2) AS overdue
            FROM borrow_requests
            WHERE ($1::uuid IS NULL OR user_id = $1)
            "#,
        )
        .bind(user_id)
        .bind(today)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        let row = row?;

        Ok(RequestCounts {
            total: row.get::<i64, _>("total"),
            pending: row.get::<i64, _>("pending"),
            approved: row.get::<i64, _>("approved"),
            rejected: row.get::<i64, _>("rejected"),
            returned: row.get::<i64, _>("returned"),
            overdue: row.get::<i64, _>("overdue"),
        })
    }

    pub async fn user_counts(&self) -> Result<UserCounts, sqlx::Error> {
        let timer = QueryTimer::new("dashboard_user_counts");
        let row = sqlx::query(
            r#"
            SELECT
                COUNT(*) AS total,
                COUNT(*) FILTER (WHERE role = 'user') AS users,
                COUNT(*) FILTER (WHERE role = 'admin') AS admins,
                COUNT(*) FILTER (WHERE role = 'superadmin') AS superadmins
            FROM profiles
            "#,
        )
        .fetch_one(&self.pool)
        .await;
        timer.record();
        let row = row?;

        Ok(UserCounts {
            total: row.get::<i64, _>("total"),
            user: row.get::<i64, _>("users"),
            admin: row.get::<i64, _>("admins"),
            superadmin: row.get::<i64, _>("superadmins"),
        })
    }
}
