//! Borrow request lifecycle rules.
//!
//! ```text
//! pending --approve--> approved --return--> returned
//!    \
//!     --reject--> rejected
//! ```

use chrono::NaiveDate;
use thiserror::Error;
use uuid::Uuid;

use shared::validation::{validate_date_range, validate_not_in_past};

use crate::models::{
    borrow_request::CreateBorrowRequest, BorrowRequest, DroneStatus, LogAction, RequestStatus,
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WorkflowError {
    #[error("Cannot {action} a request that is {from}")]
    InvalidTransition {
        action: &'static str,
        from: RequestStatus,
    },

    #[error("{0}")]
    InvalidDates(String),

    #[error("Drone is {0} and cannot be borrowed")]
    DroneUnavailable(DroneStatus),

    #[error("Drone is already booked for an overlapping period (request {0})")]
    Overlap(Uuid),
}

/// An admin decision on a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Approve,
    Reject,
    Return,
}

impl Transition {
    pub fn verb(&self) -> &'static str {
        match self {
            Transition::Approve => "approve",
            Transition::Reject => "reject",
            Transition::Return => "return",
        }
    }

    pub fn required_status(&self) -> RequestStatus {
        match self {
            Transition::Approve | Transition::Reject => RequestStatus::Pending,
            Transition::Return => RequestStatus::Approved,
        }
    }

    pub fn target_status(&self) -> RequestStatus {
        match self {
            Transition::Approve => RequestStatus::Approved,
            Transition::Reject => RequestStatus::Rejected,
            Transition::Return => RequestStatus::Returned,
        }
    }

    pub fn log_action(&self) -> LogAction {
        match self {
            Transition::Approve => LogAction::RequestApproved,
            Transition::Reject => LogAction::RequestRejected,
            Transition::Return => LogAction::RequestReturned,
        }
    }
}

/// Returns the status `current` moves to under `transition`.
pub fn apply_transition(
    current: RequestStatus,
    transition: Transition,
) -> Result<RequestStatus, WorkflowError> {
    if current == transition.required_status() {
        Ok(transition.target_status())
    } else {
        Err(WorkflowError::InvalidTransition {
            action: transition.verb(),
            from: current,
        })
    }
}

/// Date checks for a new request.
pub fn validate_submission(
    request: &CreateBorrowRequest,
    today: NaiveDate,
) -> Result<(), WorkflowError> {
    let to_error = |e: validator::ValidationError| {
        WorkflowError::InvalidDates(
            e.message
                .map(|m| m.to_string())
                .unwrap_or_else(|| e.code.to_string()),
        )
    };
    validate_date_range(request.start_date, request.end_date).map_err(to_error)?;
    validate_not_in_past(request.start_date, today).map_err(to_error)?;
    Ok(())
}

pub fn ensure_drone_in_service(status: DroneStatus) -> Result<(), WorkflowError> {
    if status.is_out_of_service() {
        Err(WorkflowError::DroneUnavailable(status))
    } else {
        Ok(())
    }
}

/// Checks that approving `request` neither uses an out-of-service drone nor
/// double-books it against the drone's other approved requests.
pub fn check_approval(
    request: &BorrowRequest,
    drone_status: DroneStatus,
    approved_for_drone: &[BorrowRequest],
) -> Result<(), WorkflowError> {
    ensure_drone_in_service(drone_status)?;

    if let Some(conflict) = approved_for_drone.iter().find(|other| {
        other.id != request.id
            && other.status == RequestStatus::Approved
            && other.overlaps(request.start_date, request.end_date)
    }) {
        return Err(WorkflowError::Overlap(conflict.id));
    }
    Ok(())
}

/// Status a drone shows once started loans are taken into account.
///
/// A loan approved ahead of its start date leaves the stored status at
/// `available`; from the start date on the drone counts as borrowed.
pub fn effective_drone_status(
    stored: DroneStatus,
    loans: &[BorrowRequest],
    today: NaiveDate,
) -> DroneStatus {
    if stored == DroneStatus::Available && loans.iter().any(|loan| loan.holds_drone(today)) {
        DroneStatus::Borrowed
    } else {
        stored
    }
}

/// New drone status implied by a transition, if it changes.
///
/// `other_approved` holds the drone's approved requests other than `request`.
/// A return only frees the drone when the returned loan had started and no
/// other approved loan covers `today`.
pub fn drone_status_after(
    transition: Transition,
    request: &BorrowRequest,
    drone_status: DroneStatus,
    other_approved: &[BorrowRequest],
    today: NaiveDate,
) -> Option<DroneStatus> {
    let held_by_other = other_approved
        .iter()
        .any(|other| other.id != request.id && other.holds_drone(today));

    match transition {
        Transition::Approve
            if drone_status == DroneStatus::Available && request.start_date <= today =>
        {
            Some(DroneStatus::Borrowed)
        }
        Transition::Return
            if drone_status == DroneStatus::Borrowed
                && request.start_date <= today
                && !held_by_other =>
        {
            Some(DroneStatus::Available)
        }
        _ => None,
    }
}
