use serde::{Deserialize, Serialize};

use crate::domain::{
    error::DomainError,
    value_objects::{Guid, StorageDomainStatus, StorageType},
};

/// A storage domain as seen from one storage pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageDomain {
    pub id: Guid,
    pub name: String,
    #[serde(rename = "type")]
    pub storage_type: StorageType,
    #[serde(default)]
    pub status: StorageDomainStatus,
    pub storage_pool_id: Guid,
    /// Free capacity in GiB. `None` while the domain has not reported.
    #[serde(default)]
    pub available_disk_size_gb: Option<u64>,
    #[serde(default)]
    pub used_disk_size_gb: Option<u64>,
    /// Only meaningful for block domains.
    #[serde(default)]
    pub supports_discard: Option<bool>,
}

impl StorageDomain {
    pub fn is_active(&self) -> bool {
        self.status == StorageDomainStatus::Active
    }

    /// Total capacity in GiB when both halves are known.
    pub fn total_disk_size_gb(&self) -> Option<u64> {
        Some(self.available_disk_size_gb? + self.used_disk_size_gb?)
    }

    /// Free capacity as a percentage of total, rounded down.
    pub fn free_percent(&self) -> Option<u64> {
        let total = self.total_disk_size_gb()?;
        if total == 0 {
            return Some(0);
        }
        Some(self.available_disk_size_gb? * 100 / total)
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.id.is_empty() {
            return Err(DomainError::MissingRequiredField {
                field: "storage_domain.id",
            });
        }
        if self.name.trim().is_empty() {
            return Err(DomainError::InvalidEntity {
                entity: "storage domain",
                id: self.id.to_string(),
                reason: "name cannot be empty".into(),
            });
        }
        if self.supports_discard.is_some() && !self.storage_type.is_block_domain() {
            return Err(DomainError::InvalidEntity {
                entity: "storage domain",
                id: self.id.to_string(),
                reason: format!(
                    "supports_discard is reported only by block domains, not {}",
                    self.storage_type
                ),
            });
        }
        Ok(())
    }
}
