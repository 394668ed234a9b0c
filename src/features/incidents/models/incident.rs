use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

use crate::features::incidents::error::IncidentError;
use crate::features::incidents::ownership::OwnerId;

/// Incident category, stored as text constrained by a CHECK
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum IncidentCategory {
    Safety,
    Maintenance,
}

impl IncidentCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            IncidentCategory::Safety => "Safety",
            IncidentCategory::Maintenance => "Maintenance",
        }
    }
}

impl fmt::Display for IncidentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IncidentCategory {
    type Err = IncidentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Safety" => Ok(IncidentCategory::Safety),
            "Maintenance" => Ok(IncidentCategory::Maintenance),
            other => Err(IncidentError::InvalidCategory(other.to_string())),
        }
    }
}

impl TryFrom<String> for IncidentCategory {
    type Error = IncidentError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Incident status. Any status may follow any other; there is no workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum IncidentStatus {
    Open,
    #[serde(rename = "In Progress")]
    InProgress,
    Success,
}

impl IncidentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            IncidentStatus::Open => "Open",
            IncidentStatus::InProgress => "In Progress",
            IncidentStatus::Success => "Success",
        }
    }
}

impl fmt::Display for IncidentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IncidentStatus {
    type Err = IncidentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Open" => Ok(IncidentStatus::Open),
            "In Progress" => Ok(IncidentStatus::InProgress),
            "Success" => Ok(IncidentStatus::Success),
            other => Err(IncidentError::InvalidStatus(other.to_string())),
        }
    }
}

impl TryFrom<String> for IncidentStatus {
    type Error = IncidentError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Database model for incident
#[derive(Debug, Clone, FromRow)]
pub struct Incident {
    pub id: i64,
    pub title: String,
    pub description: String,
    #[sqlx(try_from = "String")]
    pub category: IncidentCategory,
    #[sqlx(try_from = "String")]
    pub status: IncidentStatus,
    pub owner_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The four caller-mutable fields, already validated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncidentChanges {
    pub title: String,
    pub description: String,
    pub category: IncidentCategory,
    pub status: IncidentStatus,
}

/// Data for creating a new incident
#[derive(Debug, Clone)]
pub struct NewIncident {
    pub fields: IncidentChanges,
    pub owner: OwnerId,
}
