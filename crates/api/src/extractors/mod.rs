//! Custom Axum extractors.

pub mod user_auth;
