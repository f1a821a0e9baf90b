// ============================================================================
//  CLEAN MODULE BOUNDARIES
// ============================================================================

//! Core domain layer for relocator.
//!
//! This module contains the pure relocation vocabulary: entities as the
//! inventory reports them, the value objects they carry, the reason codes a
//! relocation can be refused with, and the capability tables the validators
//! consult.
//!
//! ## Hexagonal Architecture Compliance
//!
//! - **No async**: Domain logic is synchronous
//! - **No I/O**: Entities arrive through ports defined in the application layer
//! - **No logging**: Observability belongs to the application and CLI layers
//! - **Immutable entities**: All domain objects are Clone + PartialEq
//!
pub mod capabilities;
pub mod entities;
pub mod error;
pub mod outcome;
pub mod value_objects;

mod validation;

pub use entities::{
    Disk, DiskImage, DiskVmElement, ImageVolume, RelocationRequest, Snapshot, StorageDomain, Vm,
    VmDevice, VmTemplate,
};

pub use error::{DomainError, ErrorCategory};

pub use outcome::{FailureReason, ValidationFailure, ValidationResult};

pub use value_objects::{
    DiskContentType, DiskInterface, DiskStorageType, Guid, ImageOperation, ImageStatus,
    SnapshotStatus, SnapshotType, StorageDomainStatus, StorageType, TemplateStatus, VmEntityType,
    VmStatus, VolumeFormat,
};

pub use capabilities::StorageClass;
pub use validation::DomainValidator;

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    // ========================================================================
    // Value Object Tests
    // ========================================================================

    #[test]
    fn operation_parses_correctly() {
        assert_eq!(ImageOperation::from_str("move").unwrap(), ImageOperation::Move);
        assert_eq!(ImageOperation::from_str("CP").unwrap(), ImageOperation::Copy);
        assert!(ImageOperation::from_str("clone").is_err());
    }

    #[test]
    fn guid_parses_and_displays() {
        let text = "6f1c2a9e-0d4b-4e8a-9a7e-3c2f1b0a9d8e";
        let id = Guid::from_str(text).unwrap();
        assert_eq!(id.to_string(), text);
        assert!(!id.is_empty());
        assert!(Guid::EMPTY.is_empty());
    }

    #[test]
    fn guid_rejects_garbage() {
        let err = Guid::from_str("not-a-uuid").unwrap_err();
        assert!(matches!(err, DomainError::InvalidIdentifier(_)));
        assert_eq!(err.category(), ErrorCategory::Validation);
    }

    #[test]
    fn only_down_counts_as_down() {
        assert!(VmStatus::Down.is_down());
        assert!(!VmStatus::PoweringDown.is_down());
        assert!(!VmStatus::Suspended.is_down());
    }

    #[test]
    fn storage_type_strings_are_stable() {
        assert_eq!(StorageType::GlusterFs.to_string(), "glusterfs");
        assert_eq!(DiskInterface::VirtIoScsi.to_string(), "virtio-scsi");
        assert_eq!(DiskContentType::OvfStore.to_string(), "ovf-store");
    }

    // ========================================================================
    // Error Tests
    // ========================================================================

    #[test]
    fn unknown_variant_suggests_help() {
        let err = DomainError::UnknownVariant {
            kind: "image operation",
            value: "clone".into(),
        };
        assert!(err.suggestions().iter().any(|s| s.contains("--help")));
    }
}
