//! Domain models for DroneHub.

pub mod activity_log;
pub mod borrow_request;
pub mod dashboard;
pub mod drone;
pub mod navigation;
pub mod profile;
pub mod role;
pub mod scene;

pub use activity_log::{ActivityLog, LogAction, NewActivityLog};
pub use borrow_request::{BorrowRequest, BorrowRequestView, RequestStatus};
pub use drone::{Drone, DroneStatus};
pub use profile::Profile;
pub use role::Role;
