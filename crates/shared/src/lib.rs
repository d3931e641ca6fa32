//! Shared utilities and common types for the DroneHub backend.
//!
//! This crate provides common functionality used across all other crates:
//! - Hashing helpers for session token identifiers
//! - Password hashing with Argon2id
//! - JWT issuing and validation
//! - Cursor pagination and request validation helpers

pub mod crypto;
pub mod jwt;
pub mod pagination;
pub mod password;
pub mod validation;
