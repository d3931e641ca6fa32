//! Keyset pagination cursors.
//!
//! A cursor is `base64url(RFC3339 timestamp ":" uuid)` and points at the last
//! row of the previous page. Pages are ordered by `(created_at, id)` descending
//! so rows sharing a timestamp are still visited exactly once.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

pub const DEFAULT_PAGE_LIMIT: i64 = 50;
pub const MAX_PAGE_LIMIT: i64 = 100;

#[derive(Debug, Error)]
pub enum CursorError {
    #[error("Invalid cursor format")]
    InvalidFormat,
    #[error("Invalid cursor encoding")]
    InvalidEncoding,
    #[error("Invalid timestamp in cursor")]
    InvalidTimestamp,
    #[error("Invalid ID in cursor")]
    InvalidId,
}

pub fn encode_cursor(created_at: DateTime<Utc>, id: Uuid) -> String {
    let raw = format!(
        "{}:{}",
        created_at.to_rfc3339_opts(chrono::SecondsFormat::Micros, true),
        id
    );
    URL_SAFE_NO_PAD.encode(raw.as_bytes())
}

pub fn decode_cursor(cursor: &str) -> Result<(DateTime<Utc>, Uuid), CursorError> {
    let decoded = URL_SAFE_NO_PAD
        .decode(cursor)
        .map_err(|_| CursorError::InvalidEncoding)?;
    let s = String::from_utf8(decoded).map_err(|_| CursorError::InvalidFormat)?;

    // The timestamp contains colons; a UUID never does.
    let colon_pos = s.rfind(':').ok_or(CursorError::InvalidFormat)?;
    let (timestamp_str, id_str) = (&s[..colon_pos], &s[colon_pos + 1..]);

    let id = Uuid::parse_str(id_str).map_err(|_| CursorError::InvalidId)?;
    let timestamp = DateTime::parse_from_rfc3339(timestamp_str)
        .map_err(|_| CursorError::InvalidTimestamp)?
        .with_timezone(&Utc);

    Ok((timestamp, id))
}

/// Resolves an optional page size, rejecting values outside `1..=MAX_PAGE_LIMIT`.
pub fn resolve_limit(limit: Option<i64>) -> Result<i64, String> {
    match limit {
        None => Ok(DEFAULT_PAGE_LIMIT),
        Some(n) if (1..=MAX_PAGE_LIMIT).contains(&n) => Ok(n),
        Some(_) => Err(format!("limit must be between 1 and {}", MAX_PAGE_LIMIT)),
    }
}
