use crate::features::incidents::error::{IncidentError, Result};

/// Opaque owner token supplied by the caller. Compared for equality only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnerId(String);

impl OwnerId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Short form for logs
    pub fn redacted(&self) -> String {
        let prefix: String = self.0.chars().take(4).collect();
        format!("{}…", prefix)
    }
}

/// Gate for create and delete: an absent or empty token fails with
/// `MissingOwner`, anything else is passed through verbatim.
pub fn require_owner(token: Option<&str>) -> Result<OwnerId> {
    match token {
        Some(token) if !token.is_empty() => Ok(OwnerId(token.to_string())),
        _ => Err(IncidentError::MissingOwner),
    }
}
