//! HTTP route handlers.

pub mod activity_logs;
pub mod auth;
pub mod dashboard;
pub mod drones;
pub mod health;
pub mod profile;
pub mod requests;
pub mod scene;
pub mod users;
