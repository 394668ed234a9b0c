use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::features::incidents::models::{Incident, IncidentCategory, IncidentStatus};

/// Request body for creating or updating an incident.
///
/// `category` and `status` arrive as plain strings so that an unknown value
/// is reported as a validation failure rather than a JSON decoding error.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IncidentInputDto {
    /// At least 3 characters, not trimmed
    #[validate(length(min = 3, message = "title must be at least 3 characters"))]
    #[schema(min_length = 3, example = "Spill in bay 3")]
    pub title: String,

    #[serde(default)]
    pub description: String,

    /// `Safety` or `Maintenance`
    #[schema(example = "Safety")]
    pub category: String,

    /// `Open`, `In Progress` or `Success`
    #[schema(example = "Open")]
    pub status: String,
}

/// Response DTO for incident. The owner token is never exposed.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IncidentResponseDto {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub category: IncidentCategory,
    pub status: IncidentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Incident> for IncidentResponseDto {
    fn from(i: Incident) -> Self {
        Self {
            id: i.id,
            title: i.title,
            description: i.description,
            category: i.category,
            status: i.status,
            created_at: i.created_at,
            updated_at: i.updated_at,
        }
    }
}
