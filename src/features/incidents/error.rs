use std::time::Duration;

use thiserror::Error;

use crate::core::error::AppError;
use crate::features::incidents::validation::MIN_TITLE_LENGTH;

/// Every failure an incident operation can end in.
///
/// Input and owner errors are produced before the store is touched.
#[derive(Debug, Error)]
pub enum IncidentError {
    #[error("title must be at least {} characters", MIN_TITLE_LENGTH)]
    TitleTooShort,

    #[error("invalid category '{0}' (expected Safety or Maintenance)")]
    InvalidCategory(String),

    #[error("invalid status '{0}' (expected Open, In Progress or Success)")]
    InvalidStatus(String),

    #[error("missing X-Owner-Id header")]
    MissingOwner,

    #[error("incident {0} not found")]
    NotFound(i64),

    /// Target absent or owned by someone else; the two are not distinguished
    #[error("cannot delete incident {0} (not owner or not found)")]
    Forbidden(i64),

    #[error("incident store unavailable: {0}")]
    StoreUnavailable(#[from] sqlx::Error),

    #[error("incident store did not answer within {0:?}")]
    Timeout(Duration),
}

pub type Result<T> = std::result::Result<T, IncidentError>;

impl From<IncidentError> for AppError {
    fn from(err: IncidentError) -> Self {
        match err {
            IncidentError::TitleTooShort
            | IncidentError::InvalidCategory(_)
            | IncidentError::InvalidStatus(_) => AppError::Validation(err.to_string()),
            IncidentError::MissingOwner => AppError::BadRequest(err.to_string()),
            IncidentError::NotFound(_) => AppError::NotFound(err.to_string()),
            IncidentError::Forbidden(_) => AppError::Forbidden(err.to_string()),
            IncidentError::StoreUnavailable(e) => AppError::Database(e),
            IncidentError::Timeout(_) => AppError::ServiceUnavailable(err.to_string()),
        }
    }
}
