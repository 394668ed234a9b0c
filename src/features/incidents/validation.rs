//! Field rules checked before any storage access.
//!
//! Rules run in a fixed order and the first failure wins:
//! title length, then category, then status.

use validator::Validate;

use crate::features::incidents::dtos::IncidentInputDto;
use crate::features::incidents::error::{IncidentError, Result};
use crate::features::incidents::models::{IncidentCategory, IncidentChanges, IncidentStatus};

/// Minimum title length, counted in characters on the raw (untrimmed) title
pub const MIN_TITLE_LENGTH: u64 = 3;

/// Check an incident payload and turn it into typed fields.
pub fn validate_incident(input: IncidentInputDto) -> Result<IncidentChanges> {
    // title is the only field carrying a validator rule
    if input.validate().is_err() {
        return Err(IncidentError::TitleTooShort);
    }

    let category: IncidentCategory = input.category.parse()?;
    let status: IncidentStatus = input.status.parse()?;

    Ok(IncidentChanges {
        title: input.title,
        description: input.description,
        category,
        status,
    })
}
