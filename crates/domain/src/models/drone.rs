//! Drone inventory domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use shared::validation::{validate_not_blank, validate_serial_number};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DroneStatus {
    Available,
    Borrowed,
    Damaged,
    Maintenance,
}

impl DroneStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DroneStatus::Available => "available",
            DroneStatus::Borrowed => "borrowed",
            DroneStatus::Damaged => "damaged",
            DroneStatus::Maintenance => "maintenance",
        }
    }

    /// Damaged and maintenance drones cannot be requested or approved.
    pub fn is_out_of_service(&self) -> bool {
        matches!(self, DroneStatus::Damaged | DroneStatus::Maintenance)
    }
}

impl FromStr for DroneStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "available" => Ok(DroneStatus::Available),
            "borrowed" | "in_use" => Ok(DroneStatus::Borrowed),
            "damaged" => Ok(DroneStatus::Damaged),
            "maintenance" => Ok(DroneStatus::Maintenance),
            _ => Err(format!("Unknown drone status: {}", s)),
        }
    }
}

impl fmt::Display for DroneStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A physical drone that can be borrowed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Drone {
    pub id: Uuid,
    pub name: String,
    pub model: Option<String>,
    pub serial_number: Option<String>,
    pub status: DroneStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request payload for adding a drone.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateDroneRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    #[validate(custom(function = "validate_not_blank"))]
    pub name: String,

    #[validate(length(max = 100, message = "Model must be at most 100 characters"))]
    pub model: Option<String>,

    #[validate(length(max = 64, message = "Serial number must be at most 64 characters"))]
    #[validate(custom(function = "validate_serial_number"))]
    pub serial_number: Option<String>,

    #[serde(default = "default_status")]
    pub status: DroneStatus,
}

/// Partial update; absent fields are left unchanged.
///
/// `model` and `serial_number` distinguish an absent key (`None`) from an
/// explicit `null` (`Some(None)`), which clears the stored value.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[validate(schema(function = "validate_update_drone"))]
pub struct UpdateDroneRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    #[validate(custom(function = "validate_not_blank"))]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "nullable")]
    pub model: Option<Option<String>>,

    #[serde(default, deserialize_with = "nullable")]
    pub serial_number: Option<Option<String>>,

    pub status: Option<DroneStatus>,
}

impl UpdateDroneRequest {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.model.is_none()
            && self.serial_number.is_none()
            && self.status.is_none()
    }
}

fn nullable<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

fn validate_update_drone(request: &UpdateDroneRequest) -> Result<(), ValidationError> {
    if let Some(Some(model)) = &request.model {
        if model.chars().count() > 100 {
            let mut err = ValidationError::new("length");
            err.message = Some("Model must be at most 100 characters".into());
            return Err(err);
        }
    }
    if let Some(Some(serial)) = &request.serial_number {
        if serial.chars().count() > 64 {
            let mut err = ValidationError::new("length");
            err.message = Some("Serial number must be at most 64 characters".into());
            return Err(err);
        }
        validate_serial_number(serial)?;
    }
    Ok(())
}

/// Query for `GET /api/v1/drones`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListDronesQuery {
    pub status: Option<DroneStatus>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListDronesResponse {
    pub data: Vec<Drone>,
    pub total: usize,
}

fn default_status() -> DroneStatus {
    DroneStatus::Available
}
