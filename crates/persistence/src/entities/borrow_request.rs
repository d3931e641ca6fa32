//! Borrow request entity (database row mapping).

use chrono::{DateTime, NaiveDate, Utc};
use domain::models::{BorrowRequest, BorrowRequestView, RequestStatus};
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum for request_status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "request_status", rename_all = "lowercase")]
pub enum RequestStatusDb {
    Pending,
    Approved,
    Rejected,
    Returned,
}

impl From<RequestStatusDb> for RequestStatus {
    fn from(db: RequestStatusDb) -> Self {
        match db {
            RequestStatusDb::Pending => RequestStatus::Pending,
            RequestStatusDb::Approved => RequestStatus::Approved,
            RequestStatusDb::Rejected => RequestStatus::Rejected,
            RequestStatusDb::Returned => RequestStatus::Returned,
        }
    }
}

impl From<RequestStatus> for RequestStatusDb {
    fn from(status: RequestStatus) -> Self {
        match status {
            RequestStatus::Pending => RequestStatusDb::Pending,
            RequestStatus::Approved => RequestStatusDb::Approved,
            RequestStatus::Rejected => RequestStatusDb::Rejected,
            RequestStatus::Returned => RequestStatusDb::Returned,
        }
    }
}

/// Database row mapping for the borrow_requests table.
#[derive(Debug, Clone, FromRow)]
pub struct BorrowRequestEntity {
    pub id: Uuid,
    pub user_id: Uuid,
    pub drone_id: Uuid,
    pub purpose: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: RequestStatusDb,
    pub reviewed_by: Option<Uuid>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<BorrowRequestEntity> for BorrowRequest {
    fn from(entity: BorrowRequestEntity) -> Self {
        Self {
            id: entity.id,
            user_id: entity.user_id,
            drone_id: entity.drone_id,
            purpose: entity.purpose,
            start_date: entity.start_date,
            end_date: entity.end_date,
            status: entity.status.into(),
            reviewed_by: entity.reviewed_by,
            reviewed_at: entity.reviewed_at,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

/// Borrow request joined with requester and drone names.
#[derive(Debug, Clone, FromRow)]
pub struct BorrowRequestDetailEntity {
    #[sqlx(flatten)]
    pub request: BorrowRequestEntity,
    pub requester_name: Option<String>,
    pub drone_name: Option<String>,
}

impl BorrowRequestDetailEntity {
    pub fn into_view(self, today: NaiveDate) -> BorrowRequestView {
        BorrowRequestView::new(
            self.request.into(),
            self.requester_name,
            self.drone_name,
            today,
        )
    }
}
