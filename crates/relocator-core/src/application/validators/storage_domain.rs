//! Storage domain checks: existence, status, thresholds and free space.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::application::ports::StorageDomainChecks;
use crate::domain::{
    DiskImage, FailureReason, StorageClass, StorageDomain, ValidationResult, VolumeFormat,
    capabilities,
};

const BYTES_PER_GB: u64 = 1 << 30;

/// Free-space limits applied to every enforcing domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageThresholds {
    /// Below this many free GiB a domain refuses new disks.
    pub critical_space_action_blocker_gb: u64,
    /// Below this free percentage a warning is logged; nothing is refused.
    pub warning_low_space_percent: u64,
}

impl Default for StorageThresholds {
    fn default() -> Self {
        Self {
            critical_space_action_blocker_gb: 5,
            warning_low_space_percent: 10,
        }
    }
}

/// Checks bound to one storage domain lookup result.
#[derive(Debug, Clone)]
pub struct StorageDomainValidator {
    domain: Option<StorageDomain>,
    thresholds: StorageThresholds,
}

impl StorageDomainValidator {
    pub fn new(domain: Option<StorageDomain>, thresholds: StorageThresholds) -> Self {
        Self { domain, thresholds }
    }

    fn not_exist() -> ValidationResult {
        ValidationResult::fail(FailureReason::StorageDomainNotExist)
    }

    /// Bytes the chain occupies once copied onto this domain.
    ///
    /// File domains allocate sparsely, so only written bytes count. Block
    /// domains preallocate raw volumes in full and grow cow volumes.
    pub fn required_bytes(class: StorageClass, disk: &DiskImage) -> u64 {
        disk.chain()
            .iter()
            .map(|v| match (class, v.format) {
                (StorageClass::Block, VolumeFormat::Raw) => v.size,
                _ => v.actual_size,
            })
            .fold(0u64, u64::saturating_add)
    }
}

impl StorageDomainChecks for StorageDomainValidator {
    fn is_domain_exist_and_active(&self) -> ValidationResult {
        let Some(domain) = &self.domain else {
            return Self::not_exist();
        };
        if !domain.is_active() {
            return ValidationResult::fail_with(
                FailureReason::StorageDomainStatusIllegal,
                format!("storage domain '{}' is {}", domain.name, domain.status),
            );
        }
        ValidationResult::Valid
    }

    fn is_domain_within_thresholds(&self) -> ValidationResult {
        let Some(domain) = &self.domain else {
            return Self::not_exist();
        };
        if !capabilities::enforces_thresholds(domain.storage_type) {
            return ValidationResult::Valid;
        }

        if let Some(percent) = domain.free_percent() {
            if percent < self.thresholds.warning_low_space_percent {
                warn!(
                    domain = %domain.name,
                    free_percent = percent,
                    "storage domain is low on space"
                );
            }
        }

        match domain.available_disk_size_gb {
            Some(free) if free < self.thresholds.critical_space_action_blocker_gb => {
                ValidationResult::fail_with(
                    FailureReason::DiskSpaceLowOnStorageDomain,
                    format!(
                        "storage domain '{}' has {} GiB free, below the {} GiB blocker",
                        domain.name, free, self.thresholds.critical_space_action_blocker_gb
                    ),
                )
            }
            _ => ValidationResult::Valid,
        }
    }

    fn has_space_for_disk_with_snapshots(&self, disk: &DiskImage) -> ValidationResult {
        let Some(domain) = &self.domain else {
            return Self::not_exist();
        };
        let class = capabilities::storage_class(domain.storage_type);
        if class == StorageClass::Managed {
            return ValidationResult::Valid;
        }

        let required = Self::required_bytes(class, disk);
        let Some(free_gb) = domain.available_disk_size_gb else {
            return ValidationResult::fail_with(
                FailureReason::DiskSpaceLowOnStorageDomain,
                format!("storage domain '{}' has not reported its free space", domain.name),
            );
        };
        let available = free_gb.saturating_mul(BYTES_PER_GB);

        debug!(
            domain = %domain.name,
            required,
            available,
            "space check for disk with snapshots"
        );

        if required > available {
            return ValidationResult::fail_with(
                FailureReason::DiskSpaceLowOnStorageDomain,
                format!(
                    "storage domain '{}' needs {} bytes, has {}",
                    domain.name, required, available
                ),
            );
        }
        ValidationResult::Valid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Guid, ImageVolume, StorageDomainStatus, StorageType, VmEntityType};

    fn domain(storage_type: StorageType, free_gb: Option<u64>) -> StorageDomain {
        StorageDomain {
            id: Guid::from_u128(10),
            name: "dest".into(),
            storage_type,
            status: StorageDomainStatus::Active,
            storage_pool_id: Guid::from_u128(100),
            available_disk_size_gb: free_gb,
            used_disk_size_gb: Some(100),
            supports_discard: None,
        }
    }

    fn disk_with_chain(volumes: Vec<ImageVolume>) -> DiskImage {
        DiskImage {
            id: Guid::from_u128(1),
            alias: "disk".into(),
            shareable: false,
            content_type: Default::default(),
            image_status: Default::default(),
            owner_type: VmEntityType::Vm,
            storage_pool_id: Guid::from_u128(100),
            storage_ids: vec![],
            size: 0,
            actual_size: 0,
            volume_format: VolumeFormat::Raw,
            volumes,
        }
    }

    fn volume(format: VolumeFormat, size: u64, actual_size: u64) -> ImageVolume {
        ImageVolume {
            id: Guid::new_random(),
            format,
            size,
            actual_size,
        }
    }

    #[test]
    fn missing_domain_does_not_exist() {
        let v = StorageDomainValidator::new(None, StorageThresholds::default());
        assert_eq!(
            v.is_domain_exist_and_active().reason(),
            Some(FailureReason::StorageDomainNotExist)
        );
    }

    #[test]
    fn maintenance_domain_is_illegal() {
        let mut sd = domain(StorageType::Nfs, Some(100));
        sd.status = StorageDomainStatus::Maintenance;
        let v = StorageDomainValidator::new(Some(sd), StorageThresholds::default());
        assert_eq!(
            v.is_domain_exist_and_active().reason(),
            Some(FailureReason::StorageDomainStatusIllegal)
        );
    }

    #[test]
    fn below_blocker_fails_thresholds() {
        let v = StorageDomainValidator::new(
            Some(domain(StorageType::Nfs, Some(4))),
            StorageThresholds::default(),
        );
        assert_eq!(
            v.is_domain_within_thresholds().reason(),
            Some(FailureReason::DiskSpaceLowOnStorageDomain)
        );
    }

    #[test]
    fn managed_domain_ignores_thresholds() {
        let v = StorageDomainValidator::new(
            Some(domain(StorageType::Cinder, Some(0))),
            StorageThresholds::default(),
        );
        assert!(v.is_domain_within_thresholds().is_valid());
    }

    #[test]
    fn file_domain_counts_actual_size() {
        let disk = disk_with_chain(vec![
            volume(VolumeFormat::Raw, 10 * BYTES_PER_GB, BYTES_PER_GB),
            volume(VolumeFormat::Cow, 10 * BYTES_PER_GB, BYTES_PER_GB),
        ]);
        assert_eq!(
            StorageDomainValidator::required_bytes(StorageClass::File, &disk),
            2 * BYTES_PER_GB
        );
    }

    #[test]
    fn block_domain_preallocates_raw() {
        let disk = disk_with_chain(vec![
            volume(VolumeFormat::Raw, 10 * BYTES_PER_GB, BYTES_PER_GB),
            volume(VolumeFormat::Cow, 10 * BYTES_PER_GB, BYTES_PER_GB),
        ]);
        assert_eq!(
            StorageDomainValidator::required_bytes(StorageClass::Block, &disk),
            11 * BYTES_PER_GB
        );
    }

    #[test]
    fn space_check_compares_chain_with_free_space() {
        let disk = disk_with_chain(vec![volume(VolumeFormat::Raw, 20 * BYTES_PER_GB, 0)]);

        let small = StorageDomainValidator::new(
            Some(domain(StorageType::Iscsi, Some(10))),
            StorageThresholds::default(),
        );
        assert_eq!(
            small.has_space_for_disk_with_snapshots(&disk).reason(),
            Some(FailureReason::DiskSpaceLowOnStorageDomain)
        );

        let large = StorageDomainValidator::new(
            Some(domain(StorageType::Iscsi, Some(50))),
            StorageThresholds::default(),
        );
        assert!(large.has_space_for_disk_with_snapshots(&disk).is_valid());
    }

    #[test]
    fn unknown_free_space_fails_space_check() {
        let disk = disk_with_chain(vec![volume(VolumeFormat::Cow, 1, 1)]);
        let v = StorageDomainValidator::new(
            Some(domain(StorageType::Nfs, None)),
            StorageThresholds::default(),
        );
        assert!(!v.has_space_for_disk_with_snapshots(&disk).is_valid());
    }
}
