//! Relocation verdicts.
//!
//! A rejected relocation is an expected outcome, so it is carried as a value
//! ([`ValidationResult::Invalid`]) rather than as an error. Errors are kept
//! for faults: a store that cannot be read, an inventory that contradicts
//! itself.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Caller-visible reason a relocation may not start.
///
/// The `as_str` codes are stable and are what the CLI prints and what
/// scripts match on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FailureReason {
    DiskNotExist,
    NotSupportedDiskStorageType,
    IsNotVmDisk,
    VmTemplateImageIsLocked,
    OvfDiskNotSupported,
    DisksLocked,
    CantMoveShareableDiskToGlusterfs,
    StorageDomainNotExist,
    StorageDomainStatusIllegal,
    SourceStorageDomainDoesContainsTheDisk,
    DestinationStorageDomainAlreadyContainsTheDisk,
    SourceAndTargetSame,
    VmIsNotDown,
    VmInPreview,
    VmIsDuringSnapshot,
    DiskSpaceLowOnStorageDomain,
    PassDiscardNotSupportedByDiskInterface,
    PassDiscardNotSupportedByUnderlyingStorage,
}

impl FailureReason {
    pub const ALL: &'static [FailureReason] = &[
        Self::DiskNotExist,
        Self::NotSupportedDiskStorageType,
        Self::IsNotVmDisk,
        Self::VmTemplateImageIsLocked,
        Self::OvfDiskNotSupported,
        Self::DisksLocked,
        Self::CantMoveShareableDiskToGlusterfs,
        Self::StorageDomainNotExist,
        Self::StorageDomainStatusIllegal,
        Self::SourceStorageDomainDoesContainsTheDisk,
        Self::DestinationStorageDomainAlreadyContainsTheDisk,
        Self::SourceAndTargetSame,
        Self::VmIsNotDown,
        Self::VmInPreview,
        Self::VmIsDuringSnapshot,
        Self::DiskSpaceLowOnStorageDomain,
        Self::PassDiscardNotSupportedByDiskInterface,
        Self::PassDiscardNotSupportedByUnderlyingStorage,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::DiskNotExist => "DISK_NOT_EXIST",
            Self::NotSupportedDiskStorageType => "NOT_SUPPORTED_DISK_STORAGE_TYPE",
            Self::IsNotVmDisk => "IS_NOT_VM_DISK",
            Self::VmTemplateImageIsLocked => "VM_TEMPLATE_IMAGE_IS_LOCKED",
            Self::OvfDiskNotSupported => "OVF_DISK_NOT_SUPPORTED",
            Self::DisksLocked => "DISKS_LOCKED",
            Self::CantMoveShareableDiskToGlusterfs => "CANT_MOVE_SHAREABLE_DISK_TO_GLUSTERFS",
            Self::StorageDomainNotExist => "STORAGE_DOMAIN_NOT_EXIST",
            Self::StorageDomainStatusIllegal => "STORAGE_DOMAIN_STATUS_ILLEGAL",
            Self::SourceStorageDomainDoesContainsTheDisk => {
                "SOURCE_STORAGE_DOMAIN_DOES_CONTAINS_THE_DISK"
            }
            Self::DestinationStorageDomainAlreadyContainsTheDisk => {
                "DESTINATION_STORAGE_DOMAIN_ALREADY_CONTAINS_THE_DISK"
            }
            Self::SourceAndTargetSame => "SOURCE_AND_TARGET_SAME",
            Self::VmIsNotDown => "VM_IS_NOT_DOWN",
            Self::VmInPreview => "VM_IN_PREVIEW",
            Self::VmIsDuringSnapshot => "VM_IS_DURING_SNAPSHOT",
            Self::DiskSpaceLowOnStorageDomain => "DISK_SPACE_LOW_ON_STORAGE_DOMAIN",
            Self::PassDiscardNotSupportedByDiskInterface => {
                "PASS_DISCARD_NOT_SUPPORTED_BY_DISK_INTERFACE"
            }
            Self::PassDiscardNotSupportedByUnderlyingStorage => {
                "PASS_DISCARD_NOT_SUPPORTED_BY_UNDERLYING_STORAGE"
            }
        }
    }

    /// One-line human explanation.
    pub const fn message(&self) -> &'static str {
        match self {
            Self::DiskNotExist => "The disk does not exist",
            Self::NotSupportedDiskStorageType => {
                "Only image-backed disks can be moved or copied between storage domains"
            }
            Self::IsNotVmDisk => "Template disks can be copied but not moved",
            Self::VmTemplateImageIsLocked => "The template owning this disk is locked",
            Self::OvfDiskNotSupported => "OVF store disks cannot be moved or copied",
            Self::DisksLocked => "The disk is locked",
            Self::CantMoveShareableDiskToGlusterfs => {
                "Shareable disks cannot be moved to a GlusterFS domain"
            }
            Self::StorageDomainNotExist => "The storage domain does not exist",
            Self::StorageDomainStatusIllegal => "The storage domain is not active",
            Self::SourceStorageDomainDoesContainsTheDisk => {
                "The source storage domain does not contain the disk"
            }
            Self::DestinationStorageDomainAlreadyContainsTheDisk => {
                "The destination storage domain already contains the disk"
            }
            Self::SourceAndTargetSame => "Source and destination storage domains are the same",
            Self::VmIsNotDown => "A VM using the disk is not down",
            Self::VmInPreview => "A VM using the disk is previewing a snapshot",
            Self::VmIsDuringSnapshot => "A VM using the disk is taking a snapshot",
            Self::DiskSpaceLowOnStorageDomain => "Not enough free space on the storage domain",
            Self::PassDiscardNotSupportedByDiskInterface => {
                "Discard passthrough is not supported by the disk interface"
            }
            Self::PassDiscardNotSupportedByUnderlyingStorage => {
                "Discard passthrough is not supported by the destination storage"
            }
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One failure reason plus optional detail naming the offending entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationFailure {
    pub reason: FailureReason,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ValidationFailure {
    pub fn new(reason: FailureReason) -> Self {
        Self {
            reason,
            detail: None,
        }
    }

    pub fn with_detail(reason: FailureReason, detail: impl Into<String>) -> Self {
        Self {
            reason,
            detail: Some(detail.into()),
        }
    }
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.detail {
            Some(detail) => write!(f, "{}: {}", self.reason, detail),
            None => write!(f, "{}", self.reason),
        }
    }
}

impl std::error::Error for ValidationFailure {}

/// Verdict of a single check or of the whole pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "verdict", rename_all = "lowercase")]
pub enum ValidationResult {
    #[default]
    Valid,
    Invalid(ValidationFailure),
}

impl ValidationResult {
    pub fn fail(reason: FailureReason) -> Self {
        Self::Invalid(ValidationFailure::new(reason))
    }

    pub fn fail_with(reason: FailureReason, detail: impl Into<String>) -> Self {
        Self::Invalid(ValidationFailure::with_detail(reason, detail))
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    pub fn reason(&self) -> Option<FailureReason> {
        match self {
            Self::Valid => None,
            Self::Invalid(f) => Some(f.reason),
        }
    }

    pub fn failure(&self) -> Option<&ValidationFailure> {
        match self {
            Self::Valid => None,
            Self::Invalid(f) => Some(f),
        }
    }

    /// `Ok(())` when valid, so checks can be chained with `?`.
    pub fn into_result(self) -> Result<(), ValidationFailure> {
        match self {
            Self::Valid => Ok(()),
            Self::Invalid(f) => Err(f),
        }
    }
}

impl From<ValidationFailure> for ValidationResult {
    fn from(failure: ValidationFailure) -> Self {
        Self::Invalid(failure)
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Valid => f.write_str("valid"),
            Self::Invalid(failure) => write!(f, "invalid ({failure})"),
        }
    }
}
