//! Repository implementations for database operations.

pub mod activity_log;
pub mod borrow_request;
pub mod dashboard;
pub mod drone;
pub mod profile;

pub use activity_log::{append_log, ActivityLogRepository};
pub use borrow_request::{BorrowRequestError, BorrowRequestRepository};
pub use dashboard::DashboardRepository;
pub use drone::{DeleteDroneOutcome, DroneRepository};
pub use profile::ProfileRepository;
