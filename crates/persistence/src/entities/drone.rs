//! Drone entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::DroneStatus;
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum for drone_status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "drone_status", rename_all = "lowercase")]
pub enum DroneStatusDb {
    Available,
    Borrowed,
    Damaged,
    Maintenance,
}

impl From<DroneStatusDb> for DroneStatus {
    fn from(db: DroneStatusDb) -> Self {
        match db {
            DroneStatusDb::Available => DroneStatus::Available,
            DroneStatusDb::Borrowed => DroneStatus::Borrowed,
            DroneStatusDb::Damaged => DroneStatus::Damaged,
            DroneStatusDb::Maintenance => DroneStatus::Maintenance,
        }
    }
}

impl From<DroneStatus> for DroneStatusDb {
    fn from(status: DroneStatus) -> Self {
        match status {
            DroneStatus::Available => DroneStatusDb::Available,
            DroneStatus::Borrowed => DroneStatusDb::Borrowed,
            DroneStatus::Damaged => DroneStatusDb::Damaged,
            DroneStatus::Maintenance => DroneStatusDb::Maintenance,
        }
    }
}

/// Database row mapping for the drones table.
#[derive(Debug, Clone, FromRow)]
pub struct DroneEntity {
    pub id: Uuid,
    pub name: String,
    pub model: Option<String>,
    pub serial_number: Option<String>,
    pub status: DroneStatusDb,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<DroneEntity> for domain::models::Drone {
    fn from(entity: DroneEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            model: entity.model,
            serial_number: entity.serial_number,
            status: entity.status.into(),
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
