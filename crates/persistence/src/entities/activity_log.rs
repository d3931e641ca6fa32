//! Activity log entity (database row mapping).

use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the logs table, joined with the actor's name.
#[derive(Debug, Clone, FromRow)]
pub struct ActivityLogEntity {
    pub id: Uuid,
    pub action: String,
    pub actor_id: Option<Uuid>,
    pub actor_name: Option<String>,
    pub details: JsonValue,
    pub created_at: DateTime<Utc>,
}

impl From<ActivityLogEntity> for domain::models::ActivityLog {
    fn from(entity: ActivityLogEntity) -> Self {
        Self {
            id: entity.id,
            action: entity.action,
            actor_id: entity.actor_id,
            actor_name: entity.actor_name,
            details: entity.details,
            created_at: entity.created_at,
        }
    }
}
