//! Application layer errors.
//!
//! These errors represent failures in orchestration, not relocation verdicts.
//! Input and inventory shape errors are `DomainError` from `crate::domain`.

use thiserror::Error;

use crate::domain::Guid;
use crate::error::ErrorCategory;

/// Errors that occur during application orchestration.
#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// Store access failed (lock poisoned, etc.).
    #[error("Inventory store error")]
    StoreLockError,

    /// A record another record depends on is missing.
    #[error("{entity} {id} not found")]
    EntityMissing { entity: &'static str, id: Guid },

    /// A template-owned disk whose template cannot be resolved.
    #[error("No template owns disk {disk_id}")]
    TemplateNotFound { disk_id: Guid },

    /// Port/Adapter not configured.
    #[error("Required adapter not configured: {name}")]
    AdapterNotConfigured { name: &'static str },

    /// Query parameters do not fit the query type.
    #[error("Invalid query parameters: {0}")]
    InvalidQueryParameters(String),

    /// Inventory document could not be read.
    #[error("Inventory load failed: {reason}")]
    InventoryLoad { reason: String },
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::StoreLockError => vec![
                "The inventory store is locked".into(),
                "Try again in a moment".into(),
            ],
            Self::EntityMissing { entity, id } => vec![
                format!("No {} with id {} in the inventory", entity, id),
                "Try: relocator list to see what is loaded".into(),
            ],
            Self::TemplateNotFound { disk_id } => vec![
                format!("Disk {} is marked as template-owned", disk_id),
                "Add the owning template to the inventory or fix the disk owner".into(),
            ],
            Self::AdapterNotConfigured { name } => vec![
                format!("Required component not configured: {}", name),
                "This is likely a configuration error".into(),
            ],
            Self::InvalidQueryParameters(_) => vec![
                "Try: relocator query --help".into(),
            ],
            Self::InventoryLoad { .. } => vec![
                "Check the inventory path in your config or --inventory".into(),
                "Inventory files are TOML; see `relocator init` for a sample".into(),
            ],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::StoreLockError => ErrorCategory::Internal,
            Self::EntityMissing { .. } | Self::TemplateNotFound { .. } => ErrorCategory::NotFound,
            Self::AdapterNotConfigured { .. } => ErrorCategory::Configuration,
            Self::InvalidQueryParameters(_) => ErrorCategory::Validation,
            Self::InventoryLoad { .. } => ErrorCategory::Inventory,
        }
    }
}
