//! Disk records: the generic [`Disk`], its image-backed view [`DiskImage`],
//! the per-volume snapshot chain and the per-VM [`DiskVmElement`].
//!
//! A disk's `storage_ids` is the only authority for which domains hold it.
//! Nothing here infers membership from storage domain records.

use serde::{Deserialize, Serialize};

use crate::domain::{
    error::DomainError,
    value_objects::{
        DiskContentType, DiskInterface, DiskStorageType, Guid, ImageStatus, VmEntityType,
        VolumeFormat,
    },
};

// ── Disk ──────────────────────────────────────────────────────────────────────

/// The kind-agnostic disk record. Every disk has one, whatever backs it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Disk {
    pub id: Guid,
    pub alias: String,
    pub storage_type: DiskStorageType,
}

impl Disk {
    pub fn new(id: Guid, alias: impl Into<String>, storage_type: DiskStorageType) -> Self {
        Self {
            id,
            alias: alias.into(),
            storage_type,
        }
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.id.is_empty() {
            return Err(DomainError::MissingRequiredField { field: "disk.id" });
        }
        if self.alias.trim().is_empty() {
            return Err(DomainError::InvalidEntity {
                entity: "disk",
                id: self.id.to_string(),
                reason: "alias cannot be empty".into(),
            });
        }
        Ok(())
    }
}

// ── Volumes ───────────────────────────────────────────────────────────────────

/// One volume in a disk's snapshot chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageVolume {
    pub id: Guid,
    #[serde(default)]
    pub format: VolumeFormat,
    /// Virtual size in bytes.
    pub size: u64,
    /// Bytes actually allocated on storage.
    #[serde(default)]
    pub actual_size: u64,
}

// ── DiskImage ─────────────────────────────────────────────────────────────────

/// Image-backed disk state as the relocation checks see it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiskImage {
    pub id: Guid,
    pub alias: String,
    #[serde(default)]
    pub shareable: bool,
    #[serde(default)]
    pub content_type: DiskContentType,
    #[serde(default)]
    pub image_status: ImageStatus,
    #[serde(default)]
    pub owner_type: VmEntityType,
    pub storage_pool_id: Guid,
    /// Domains currently holding this disk.
    #[serde(default)]
    pub storage_ids: Vec<Guid>,
    /// Virtual size in bytes.
    pub size: u64,
    #[serde(default)]
    pub actual_size: u64,
    #[serde(default)]
    pub volume_format: VolumeFormat,
    /// Snapshot chain, oldest first. Empty means the disk is a single volume.
    #[serde(default)]
    pub volumes: Vec<ImageVolume>,
}

impl DiskImage {
    pub fn is_in_domain(&self, domain_id: Guid) -> bool {
        self.storage_ids.contains(&domain_id)
    }

    pub fn is_template_owned(&self) -> bool {
        self.owner_type == VmEntityType::Template
    }

    /// The chain used for space estimates. A disk without recorded volumes
    /// is its own single volume.
    pub fn chain(&self) -> Vec<ImageVolume> {
        if self.volumes.is_empty() {
            vec![ImageVolume {
                id: self.id,
                format: self.volume_format,
                size: self.size,
                actual_size: self.actual_size,
            }]
        } else {
            self.volumes.clone()
        }
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.id.is_empty() {
            return Err(DomainError::MissingRequiredField {
                field: "disk_image.id",
            });
        }

        let invalid = |reason: String| DomainError::InvalidEntity {
            entity: "disk image",
            id: self.id.to_string(),
            reason,
        };

        if self.storage_pool_id.is_empty() {
            return Err(invalid("storage pool id cannot be empty".into()));
        }

        let mut seen = std::collections::HashSet::new();
        for sd in &self.storage_ids {
            if !seen.insert(sd) {
                return Err(invalid(format!("storage domain {sd} listed twice")));
            }
        }

        if let Some(v) = self.volumes.iter().find(|v| v.id.is_empty()) {
            return Err(invalid(format!("volume with empty id (size {})", v.size)));
        }

        Ok(())
    }
}

// ── DiskVmElement ─────────────────────────────────────────────────────────────

/// How one VM sees one disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiskVmElement {
    pub disk_id: Guid,
    pub vm_id: Guid,
    #[serde(default)]
    pub interface: DiskInterface,
    #[serde(default)]
    pub pass_discard: bool,
    #[serde(default)]
    pub boot: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image() -> DiskImage {
        DiskImage {
            id: Guid::from_u128(1),
            alias: "data".into(),
            shareable: false,
            content_type: DiskContentType::Data,
            image_status: ImageStatus::Ok,
            owner_type: VmEntityType::Vm,
            storage_pool_id: Guid::from_u128(100),
            storage_ids: vec![Guid::from_u128(10)],
            size: 1024,
            actual_size: 512,
            volume_format: VolumeFormat::Cow,
            volumes: vec![],
        }
    }

    #[test]
    fn single_volume_chain_mirrors_disk() {
        let chain = image().chain();
        assert_eq!(chain.len(), 1);
        assert_eq!(chain[0].size, 1024);
        assert_eq!(chain[0].actual_size, 512);
        assert_eq!(chain[0].format, VolumeFormat::Cow);
    }

    #[test]
    fn membership_comes_from_storage_ids() {
        let img = image();
        assert!(img.is_in_domain(Guid::from_u128(10)));
        assert!(!img.is_in_domain(Guid::from_u128(11)));
    }

    #[test]
    fn duplicate_storage_ids_are_rejected() {
        let mut img = image();
        img.storage_ids.push(Guid::from_u128(10));
        assert!(matches!(
            img.validate(),
            Err(DomainError::InvalidEntity { .. })
        ));
    }

    #[test]
    fn disk_requires_alias() {
        let disk = Disk::new(Guid::from_u128(1), "  ", DiskStorageType::Image);
        assert!(disk.validate().is_err());
    }
}
