//! Domain services for DroneHub.

pub mod access;
pub mod borrow_workflow;

pub use access::{check_dashboard_access, DashboardAccess, DashboardView};
pub use borrow_workflow::{apply_transition, Transition, WorkflowError};
