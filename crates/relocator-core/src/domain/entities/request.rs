//! The relocation request value.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::{
    error::DomainError,
    value_objects::{Guid, ImageOperation},
};

/// Ask to move or copy one disk from one domain to another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RelocationRequest {
    pub disk_id: Guid,
    pub source_domain_id: Guid,
    pub dest_domain_id: Guid,
    pub operation: ImageOperation,
}

impl RelocationRequest {
    pub fn new(
        disk_id: Guid,
        source_domain_id: Guid,
        dest_domain_id: Guid,
        operation: ImageOperation,
    ) -> Self {
        Self {
            disk_id,
            source_domain_id,
            dest_domain_id,
            operation,
        }
    }

    pub fn is_move(&self) -> bool {
        self.operation == ImageOperation::Move
    }

    /// Shape checks only. Same source and destination is a relocation
    /// verdict, not a malformed request, so it is not rejected here.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.disk_id.is_empty() {
            return Err(DomainError::InvalidRequest("disk id cannot be empty".into()));
        }
        if self.source_domain_id.is_empty() {
            return Err(DomainError::InvalidRequest(
                "source domain id cannot be empty".into(),
            ));
        }
        if self.dest_domain_id.is_empty() {
            return Err(DomainError::InvalidRequest(
                "destination domain id cannot be empty".into(),
            ));
        }
        Ok(())
    }
}

impl fmt::Display for RelocationRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} disk {} from {} to {}",
            self.operation, self.disk_id, self.source_domain_id, self.dest_domain_id
        )
    }
}
