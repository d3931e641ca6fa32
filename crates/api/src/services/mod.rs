//! Application services.

pub mod admin_bootstrap;
pub mod auth;

pub use admin_bootstrap::{bootstrap_superadmin, BootstrapError, BootstrapOutcome};
pub use auth::{AuthError, AuthService};
