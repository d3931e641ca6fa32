//! Domain layer for DroneHub.
//!
//! This crate contains:
//! - Domain models (Role, Profile, Drone, BorrowRequest, ActivityLog)
//! - Dashboard, navigation and scene view models
//! - Role gating and the borrow request workflow

pub mod models;
pub mod services;
