//! Concrete validator roles and the default factory that hands them out.

mod disk_vm_element;
mod snapshots;
mod storage_domain;

use std::sync::Arc;

pub use disk_vm_element::{DiskVmElementValidator, MultipleDiskVmElementValidator};
pub use snapshots::SnapshotsValidator;
pub use storage_domain::{StorageDomainValidator, StorageThresholds};

use crate::application::ports::{
    DiskVmElementChecks, EntityReaders, SnapshotChecks, StorageDomainChecks, ValidatorFactory,
};
use crate::domain::{DiskImage, DiskVmElement, StorageDomain};

/// The production [`ValidatorFactory`], backed by the entity readers.
#[derive(Clone)]
pub struct EngineValidators {
    readers: EntityReaders,
    thresholds: StorageThresholds,
}

impl EngineValidators {
    pub fn new(readers: EntityReaders, thresholds: StorageThresholds) -> Self {
        Self {
            readers,
            thresholds,
        }
    }
}

impl ValidatorFactory for EngineValidators {
    fn storage_domain(&self, domain: Option<StorageDomain>) -> Box<dyn StorageDomainChecks> {
        Box::new(StorageDomainValidator::new(domain, self.thresholds))
    }

    fn snapshots(&self) -> Box<dyn SnapshotChecks> {
        Box::new(SnapshotsValidator::new(self.readers.snapshots.clone()))
    }

    fn disk_vm_elements(
        &self,
        disk: &DiskImage,
        elements: Vec<DiskVmElement>,
    ) -> Box<dyn DiskVmElementChecks> {
        Box::new(MultipleDiskVmElementValidator::new(
            disk,
            elements,
            self.readers.storage_domains.clone(),
        ))
    }
}
