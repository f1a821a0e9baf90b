// ============================================================================
// domain/error.rs - DOMAIN ERRORS
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// These describe malformed input and broken entity invariants. A relocation
/// that is merely *not allowed* is never a `DomainError`; it is an invalid
/// [`ValidationResult`](crate::domain::ValidationResult).
///
/// All errors are:
/// - Cloneable (for retry logic)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Validation Errors (400-level equivalent)
    // ========================================================================
    #[error("Invalid identifier {0}")]
    InvalidIdentifier(String),

    #[error("Invalid relocation request: {0}")]
    InvalidRequest(String),

    #[error("Invalid {entity} '{id}': {reason}")]
    InvalidEntity {
        entity: &'static str,
        id: String,
        reason: String,
    },

    #[error("Unknown {kind}: '{value}'")]
    UnknownVariant { kind: &'static str, value: String },

    // ========================================================================
    // Constraint Violations
    // ========================================================================
    #[error("Required field missing: {field}")]
    MissingRequiredField { field: &'static str },

    #[error("Duplicate {entity} id: {id}")]
    DuplicateEntity { entity: &'static str, id: String },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidIdentifier(value) => vec![
                format!("Could not parse identifier {}", value),
                "Identifiers are UUIDs, e.g. 6f1c2a9e-0d4b-4e8a-9a7e-3c2f1b0a9d8e".into(),
            ],
            Self::InvalidRequest(msg) => vec![
                "Check the disk, source and destination identifiers".into(),
                format!("Details: {}", msg),
            ],
            Self::UnknownVariant { kind, value } => vec![
                format!("'{}' is not a known {}", value, kind),
                "Use --help to list accepted values".into(),
            ],
            Self::DuplicateEntity { entity, id } => vec![
                format!("The inventory declares {} '{}' more than once", entity, id),
                "Remove the duplicate entry from the inventory file".into(),
            ],
            _ => vec!["See documentation for more details".into()],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidIdentifier(_) | Self::InvalidRequest(_) | Self::UnknownVariant { .. } => {
                ErrorCategory::Validation
            }
            Self::InvalidEntity { .. }
            | Self::MissingRequiredField { .. }
            | Self::DuplicateEntity { .. } => ErrorCategory::Inventory,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Inventory,
}
