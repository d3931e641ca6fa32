//! Activity log domain models.
//!
//! The log is append-only; entries are never updated or deleted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;
use uuid::Uuid;

/// Actions recorded in the activity log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogAction {
    #[serde(rename = "auth.signed_up")]
    SignedUp,
    #[serde(rename = "auth.signed_in")]
    SignedIn,
    #[serde(rename = "drone.created")]
    DroneCreated,
    #[serde(rename = "drone.updated")]
    DroneUpdated,
    #[serde(rename = "drone.deleted")]
    DroneDeleted,
    #[serde(rename = "request.submitted")]
    RequestSubmitted,
    #[serde(rename = "request.approved")]
    RequestApproved,
    #[serde(rename = "request.rejected")]
    RequestRejected,
    #[serde(rename = "request.returned")]
    RequestReturned,
    #[serde(rename = "user.role_changed")]
    RoleChanged,
    #[serde(rename = "system.superadmin_bootstrapped")]
    SuperadminBootstrapped,
}

impl LogAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogAction::SignedUp => "auth.signed_up",
            LogAction::SignedIn => "auth.signed_in",
            LogAction::DroneCreated => "drone.created",
            LogAction::DroneUpdated => "drone.updated",
            LogAction::DroneDeleted => "drone.deleted",
            LogAction::RequestSubmitted => "request.submitted",
            LogAction::RequestApproved => "request.approved",
            LogAction::RequestRejected => "request.rejected",
            LogAction::RequestReturned => "request.returned",
            LogAction::RoleChanged => "user.role_changed",
            LogAction::SuperadminBootstrapped => "system.superadmin_bootstrapped",
        }
    }
}

impl fmt::Display for LogAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored activity log entry. `action` stays a string so entries written by
/// older releases still load.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ActivityLog {
    pub id: Uuid,
    pub action: String,
    pub actor_id: Option<Uuid>,
    pub actor_name: Option<String>,
    pub details: JsonValue,
    pub created_at: DateTime<Utc>,
}

/// An entry about to be appended.
#[derive(Debug, Clone)]
pub struct NewActivityLog {
    pub action: LogAction,
    pub actor_id: Option<Uuid>,
    pub details: JsonValue,
}

impl NewActivityLog {
    pub fn new(action: LogAction, actor_id: Option<Uuid>) -> Self {
        Self {
            action,
            actor_id,
            details: JsonValue::Object(Default::default()),
        }
    }

    pub fn with_details(mut self, details: JsonValue) -> Self {
        self.details = details;
        self
    }
}

/// Query for `GET /api/v1/superadmin/logs`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListLogsQuery {
    pub cursor: Option<String>,
    pub limit: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PaginationInfo {
    pub next_cursor: Option<String>,
    pub has_more: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListLogsResponse {
    pub data: Vec<ActivityLog>,
    pub pagination: PaginationInfo,
}
