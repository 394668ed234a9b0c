use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Error body returned by every failing request: `{"error": "..."}`.
///
/// Successful requests return the resource itself with no wrapper, which is
/// the contract the web client reads.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
