//! Discard passthrough checks for the disk-VM elements of one disk.

use std::sync::Arc;

use tracing::debug;

use crate::application::ports::{DiskVmElementChecks, StorageDomainStore};
use crate::domain::{
    DiskImage, DiskVmElement, FailureReason, Guid, StorageDomain, ValidationResult, capabilities,
};
use crate::error::RelocatorResult;

/// Checks for a single element against an already resolved domain.
#[derive(Debug, Clone)]
pub struct DiskVmElementValidator<'a> {
    element: &'a DiskVmElement,
}

impl<'a> DiskVmElementValidator<'a> {
    pub fn new(element: &'a DiskVmElement) -> Self {
        Self { element }
    }

    pub fn is_pass_discard_supported(&self, domain: &StorageDomain) -> ValidationResult {
        if !self.element.pass_discard {
            return ValidationResult::Valid;
        }

        if !capabilities::interface_supports_pass_discard(self.element.interface) {
            return ValidationResult::fail_with(
                FailureReason::PassDiscardNotSupportedByDiskInterface,
                format!(
                    "vm {} attaches the disk over {}",
                    self.element.vm_id, self.element.interface
                ),
            );
        }

        if domain.storage_type.is_block_domain() && domain.supports_discard != Some(true) {
            return ValidationResult::fail_with(
                FailureReason::PassDiscardNotSupportedByUnderlyingStorage,
                format!("storage domain '{}' does not support discard", domain.name),
            );
        }

        ValidationResult::Valid
    }
}

/// Checks every element of one disk against a destination domain.
pub struct MultipleDiskVmElementValidator {
    disk_id: Guid,
    storage_pool_id: Guid,
    elements: Vec<DiskVmElement>,
    storage_domains: Arc<dyn StorageDomainStore>,
}

impl MultipleDiskVmElementValidator {
    pub fn new(
        disk: &DiskImage,
        elements: Vec<DiskVmElement>,
        storage_domains: Arc<dyn StorageDomainStore>,
    ) -> Self {
        Self {
            disk_id: disk.id,
            storage_pool_id: disk.storage_pool_id,
            elements,
            storage_domains,
        }
    }
}

impl DiskVmElementChecks for MultipleDiskVmElementValidator {
    fn is_pass_discard_supported_for_dest_sd(
        &self,
        dest_domain_id: Guid,
    ) -> RelocatorResult<ValidationResult> {
        let Some(domain) = self
            .storage_domains
            .get_for_pool(self.storage_pool_id, dest_domain_id)?
        else {
            return Ok(ValidationResult::fail_with(
                FailureReason::StorageDomainNotExist,
                format!("destination {dest_domain_id}"),
            ));
        };

        debug!(
            disk = %self.disk_id,
            elements = self.elements.len(),
            domain = %domain.name,
            "checking discard passthrough"
        );

        for element in &self.elements {
            let result = DiskVmElementValidator::new(element).is_pass_discard_supported(&domain);
            if !result.is_valid() {
                return Ok(result);
            }
        }
        Ok(ValidationResult::Valid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::output::MockStorageDomainStore;
    use crate::domain::{DiskInterface, StorageDomainStatus, StorageType};

    fn element(interface: DiskInterface, pass_discard: bool) -> DiskVmElement {
        DiskVmElement {
            disk_id: Guid::from_u128(1),
            vm_id: Guid::from_u128(2),
            interface,
            pass_discard,
            boot: false,
        }
    }

    fn domain(storage_type: StorageType, supports_discard: Option<bool>) -> StorageDomain {
        StorageDomain {
            id: Guid::from_u128(20),
            name: "dest".into(),
            storage_type,
            status: StorageDomainStatus::Active,
            storage_pool_id: Guid::from_u128(100),
            available_disk_size_gb: Some(100),
            used_disk_size_gb: Some(0),
            supports_discard,
        }
    }

    #[test]
    fn element_without_pass_discard_passes() {
        let e = element(DiskInterface::VirtIo, false);
        assert!(DiskVmElementValidator::new(&e)
            .is_pass_discard_supported(&domain(StorageType::Iscsi, None))
            .is_valid());
    }

    #[test]
    fn virtio_cannot_pass_discard() {
        let e = element(DiskInterface::VirtIo, true);
        assert_eq!(
            DiskVmElementValidator::new(&e)
                .is_pass_discard_supported(&domain(StorageType::Nfs, None))
                .reason(),
            Some(FailureReason::PassDiscardNotSupportedByDiskInterface)
        );
    }

    #[test]
    fn block_domain_must_report_discard() {
        let e = element(DiskInterface::VirtIoScsi, true);
        let v = DiskVmElementValidator::new(&e);
        assert_eq!(
            v.is_pass_discard_supported(&domain(StorageType::Iscsi, Some(false)))
                .reason(),
            Some(FailureReason::PassDiscardNotSupportedByUnderlyingStorage)
        );
        assert!(v
            .is_pass_discard_supported(&domain(StorageType::Iscsi, Some(true)))
            .is_valid());
        assert!(v
            .is_pass_discard_supported(&domain(StorageType::Nfs, None))
            .is_valid());
    }

    #[test]
    fn missing_destination_does_not_exist() {
        let mut store = MockStorageDomainStore::new();
        store.expect_get_for_pool().returning(|_, _| Ok(None));

        let disk = crate::application::services::fixtures::image(Guid::from_u128(1));
        let v = MultipleDiskVmElementValidator::new(
            &disk,
            vec![element(DiskInterface::Ide, true)],
            Arc::new(store),
        );
        assert_eq!(
            v.is_pass_discard_supported_for_dest_sd(Guid::from_u128(20))
                .unwrap()
                .reason(),
            Some(FailureReason::StorageDomainNotExist)
        );
    }

    #[test]
    fn first_failing_element_wins() {
        let mut store = MockStorageDomainStore::new();
        store
            .expect_get_for_pool()
            .returning(|_, _| Ok(Some(domain(StorageType::Iscsi, Some(false)))));

        let disk = crate::application::services::fixtures::image(Guid::from_u128(1));
        let v = MultipleDiskVmElementValidator::new(
            &disk,
            vec![
                element(DiskInterface::VirtIoScsi, false),
                element(DiskInterface::Sata, true),
                element(DiskInterface::VirtIoScsi, true),
            ],
            Arc::new(store),
        );
        assert_eq!(
            v.is_pass_discard_supported_for_dest_sd(Guid::from_u128(20))
                .unwrap()
                .reason(),
            Some(FailureReason::PassDiscardNotSupportedByDiskInterface)
        );
    }
}
