//! Database entity definitions.
//!
//! Entities are direct mappings to database rows.

pub mod activity_log;
pub mod borrow_request;
pub mod drone;
pub mod profile;

pub use activity_log::ActivityLogEntity;
pub use borrow_request::{BorrowRequestDetailEntity, BorrowRequestEntity, RequestStatusDb};
pub use drone::{DroneEntity, DroneStatusDb};
pub use profile::{ProfileEntity, ProfileWithUserEntity, RoleDb};
