//! Borrow request domain model.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

use shared::validation::validate_not_blank;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
    Returned,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Approved => "approved",
            RequestStatus::Rejected => "rejected",
            RequestStatus::Returned => "returned",
        }
    }

    /// Requests that still hold a claim on the drone.
    pub fn is_open(&self) -> bool {
        matches!(self, RequestStatus::Pending | RequestStatus::Approved)
    }
}

impl FromStr for RequestStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(RequestStatus::Pending),
            "approved" => Ok(RequestStatus::Approved),
            "rejected" => Ok(RequestStatus::Rejected),
            "returned" => Ok(RequestStatus::Returned),
            _ => Err(format!("Unknown request status: {}", s)),
        }
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user's request to borrow one drone for an inclusive date range.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct BorrowRequest {
    pub id: Uuid,
    pub user_id: Uuid,
    pub drone_id: Uuid,
    pub purpose: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: RequestStatus,
    pub reviewed_by: Option<Uuid>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BorrowRequest {
    /// Approved and past its end date without being returned.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.status == RequestStatus::Approved && self.end_date < today
    }

    /// Approved and already started, so the drone is out on this loan.
    pub fn holds_drone(&self, today: NaiveDate) -> bool {
        self.status == RequestStatus::Approved && self.start_date <= today
    }

    /// Inclusive date ranges overlap.
    pub fn overlaps(&self, start: NaiveDate, end: NaiveDate) -> bool {
        self.start_date <= end && start <= self.end_date
    }
}

/// Request as shown in listings and dashboards.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct BorrowRequestView {
    pub id: Uuid,
    pub user_id: Uuid,
    pub requester_name: Option<String>,
    pub drone_id: Uuid,
    pub drone_name: Option<String>,
    pub purpose: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: RequestStatus,
    pub is_overdue: bool,
    pub reviewed_by: Option<Uuid>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl BorrowRequestView {
    pub fn new(
        request: BorrowRequest,
        requester_name: Option<String>,
        drone_name: Option<String>,
        today: NaiveDate,
    ) -> Self {
        Self {
            is_overdue: request.is_overdue(today),
            id: request.id,
            user_id: request.user_id,
            requester_name,
            drone_id: request.drone_id,
            drone_name,
            purpose: request.purpose,
            start_date: request.start_date,
            end_date: request.end_date,
            status: request.status,
            reviewed_by: request.reviewed_by,
            reviewed_at: request.reviewed_at,
            created_at: request.created_at,
        }
    }
}

/// Request payload for `POST /api/v1/requests`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateBorrowRequest {
    pub drone_id: Uuid,

    #[validate(length(min = 1, max = 500, message = "Purpose must be 1-500 characters"))]
    #[validate(custom(function = "validate_not_blank"))]
    pub purpose: String,

    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Query for `GET /api/v1/admin/requests`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListRequestsQuery {
    pub status: Option<RequestStatus>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListRequestsResponse {
    pub data: Vec<BorrowRequestView>,
    pub total: usize,
}
