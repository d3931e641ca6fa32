//! Dashboard view models.
//!
//! Every count defaults to zero so an empty store renders as zeros rather
//! than missing fields.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::activity_log::ActivityLog;
use super::borrow_request::BorrowRequestView;
use super::role::Role;

/// Drone counts by status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DroneCounts {
    pub total: i64,
    pub available: i64,
    pub borrowed: i64,
    pub damaged: i64,
    pub maintenance: i64,
}

/// Borrow request counts by status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RequestCounts {
    pub total: i64,
    pub pending: i64,
    pub approved: i64,
    pub rejected: i64,
    pub returned: i64,
    pub overdue: i64,
}

/// Profile counts by role.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct UserCounts {
    pub total: i64,
    pub user: i64,
    pub admin: i64,
    pub superadmin: i64,
}

/// Generic landing dashboard, available to every role.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct OverviewDashboard {
    pub role: Role,
    pub available_drones: i64,
    pub total_drones: i64,
    pub my_pending_requests: i64,
    pub my_approved_requests: i64,
    pub show_admin_actions: bool,
    pub show_analytics: bool,
}

impl OverviewDashboard {
    pub fn new(role: Role, drones: &DroneCounts, mine: &RequestCounts) -> Self {
        Self {
            role,
            available_drones: drones.available,
            total_drones: drones.total,
            my_pending_requests: mine.pending,
            my_approved_requests: mine.approved,
            show_admin_actions: role.is_admin(),
            show_analytics: role.is_superadmin(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct UserDashboard {
    pub available_drones: i64,
    pub total_drones: i64,
    pub my_requests: RequestCounts,
    pub recent_requests: Vec<BorrowRequestView>,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct AdminDashboard {
    pub drones: DroneCounts,
    pub requests: RequestCounts,
    pub users: UserCounts,
    pub recent_requests: Vec<BorrowRequestView>,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SuperadminDashboard {
    pub drones: DroneCounts,
    pub requests: RequestCounts,
    pub users: UserCounts,
    pub total_logs: i64,
    pub recent_requests: Vec<BorrowRequestView>,
    pub recent_logs: Vec<ActivityLog>,
    pub generated_at: DateTime<Utc>,
}

/// Number of recent requests shown on the user dashboard.
pub const USER_RECENT_REQUESTS: i64 = 3;
/// Number of recent requests shown on the admin and superadmin dashboards.
pub const ADMIN_RECENT_REQUESTS: i64 = 5;
pub const SUPERADMIN_RECENT_LOGS: i64 = 10;
