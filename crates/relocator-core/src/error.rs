//! Unified error handling for relocator core.
//!
//! This module provides a unified error type that wraps domain and application
//! errors, with rich context and user-actionable suggestions.
//!
//! A refused relocation is not an error. It is returned as
//! [`ValidationResult::Invalid`](crate::domain::ValidationResult).

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;

/// Root error type for relocator core operations.
#[derive(Debug, Error, Clone)]
pub enum RelocatorError {
    /// Malformed input or inventory.
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    /// Errors from the application layer (store faults, missing collaborators).
    #[error("Application error: {0}")]
    Application(#[from] ApplicationError),

    /// Configuration or setup errors.
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Unexpected internal errors (bugs or inconsistent state).
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl RelocatorError {
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Domain(e) => e.suggestions(),
            Self::Application(e) => e.suggestions(),
            Self::Configuration { message } => vec![
                format!("Configuration issue: {}", message),
                "Run `relocator config list` to inspect the effective settings".into(),
            ],
            Self::Internal { .. } => vec![
                "The inventory may be inconsistent; reload it and retry".into(),
                "If the problem persists, please report it".into(),
            ],
        }
    }

    /// Get error category for display/styling purposes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Domain(e) => match e.category() {
                crate::domain::ErrorCategory::Validation => ErrorCategory::Validation,
                crate::domain::ErrorCategory::Inventory => ErrorCategory::Inventory,
            },
            Self::Application(e) => e.category(),
            Self::Configuration { .. } => ErrorCategory::Configuration,
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }

    /// Check if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Application(ApplicationError::StoreLockError))
    }
}

/// Error categories for UI display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Inventory,
    NotFound,
    Configuration,
    Internal,
}

/// Convenient result type alias.
pub type RelocatorResult<T> = Result<T, RelocatorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lock_errors_are_retryable() {
        let err = RelocatorError::from(ApplicationError::StoreLockError);
        assert!(err.is_retryable());
        assert!(!RelocatorError::internal("x").is_retryable());
    }
}
