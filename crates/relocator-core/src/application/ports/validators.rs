//! Validator roles the relocation pipeline delegates to.
//!
//! Each role is bound to the entity it checks at construction time, the way
//! a [`ValidatorFactory`] hands them out. Concrete implementations live in
//! `crate::application::validators`; tests substitute mockall mocks.

use crate::domain::{DiskImage, DiskVmElement, Guid, StorageDomain, ValidationResult};
use crate::error::RelocatorResult;

/// Checks against one storage domain, which may be missing.
#[cfg_attr(test, mockall::automock)]
pub trait StorageDomainChecks: Send + Sync {
    /// `STORAGE_DOMAIN_NOT_EXIST` or `STORAGE_DOMAIN_STATUS_ILLEGAL`.
    fn is_domain_exist_and_active(&self) -> ValidationResult;

    /// `DISK_SPACE_LOW_ON_STORAGE_DOMAIN` when free space is below the
    /// critical blocker.
    fn is_domain_within_thresholds(&self) -> ValidationResult;

    /// `DISK_SPACE_LOW_ON_STORAGE_DOMAIN` when the disk and its whole
    /// snapshot chain do not fit.
    fn has_space_for_disk_with_snapshots(&self, disk: &DiskImage) -> ValidationResult;
}

/// Snapshot state of a VM.
#[cfg_attr(test, mockall::automock)]
pub trait SnapshotChecks: Send + Sync {
    /// `VM_IN_PREVIEW` when any snapshot of the VM is being previewed.
    fn vm_not_in_preview(&self, vm_id: Guid) -> RelocatorResult<ValidationResult>;

    /// `VM_IS_DURING_SNAPSHOT` when any snapshot of the VM is locked.
    fn vm_not_during_snapshot(&self, vm_id: Guid) -> RelocatorResult<ValidationResult>;
}

/// Discard passthrough of every disk-VM element of one disk.
#[cfg_attr(test, mockall::automock)]
pub trait DiskVmElementChecks: Send + Sync {
    fn is_pass_discard_supported_for_dest_sd(
        &self,
        dest_domain_id: Guid,
    ) -> RelocatorResult<ValidationResult>;
}

/// Hands out validators bound to the entities of one relocation.
#[cfg_attr(test, mockall::automock)]
pub trait ValidatorFactory: Send + Sync {
    fn storage_domain(&self, domain: Option<StorageDomain>) -> Box<dyn StorageDomainChecks>;

    fn snapshots(&self) -> Box<dyn SnapshotChecks>;

    fn disk_vm_elements(
        &self,
        disk: &DiskImage,
        elements: Vec<DiskVmElement>,
    ) -> Box<dyn DiskVmElementChecks>;
}
