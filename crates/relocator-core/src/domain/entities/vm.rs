//! VMs, templates, their disk attachments and snapshots.

use serde::{Deserialize, Serialize};

use crate::domain::{
    error::DomainError,
    value_objects::{Guid, SnapshotStatus, SnapshotType, TemplateStatus, VmStatus},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vm {
    pub id: Guid,
    pub name: String,
    #[serde(default)]
    pub status: VmStatus,
}

impl Vm {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.id.is_empty() {
            return Err(DomainError::MissingRequiredField { field: "vm.id" });
        }
        if self.name.trim().is_empty() {
            return Err(DomainError::InvalidEntity {
                entity: "vm",
                id: self.id.to_string(),
                reason: "name cannot be empty".into(),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VmTemplate {
    pub id: Guid,
    pub name: String,
    #[serde(default)]
    pub status: TemplateStatus,
    /// Disk images this template owns.
    #[serde(default)]
    pub disk_ids: Vec<Guid>,
}

impl VmTemplate {
    pub fn is_locked(&self) -> bool {
        self.status == TemplateStatus::Locked
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.id.is_empty() {
            return Err(DomainError::MissingRequiredField {
                field: "template.id",
            });
        }
        Ok(())
    }
}

/// Attachment of a disk to a VM.
///
/// An attachment carrying `snapshot_id` belongs to a previewed snapshot
/// rather than the VM's live configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VmDevice {
    pub vm_id: Guid,
    pub disk_id: Guid,
    #[serde(default = "default_plugged")]
    pub plugged: bool,
    #[serde(default)]
    pub snapshot_id: Option<Guid>,
}

fn default_plugged() -> bool {
    true
}

impl VmDevice {
    pub fn is_snapshot_attachment(&self) -> bool {
        self.snapshot_id.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub id: Guid,
    pub vm_id: Guid,
    #[serde(rename = "type", default)]
    pub snapshot_type: SnapshotType,
    #[serde(default)]
    pub status: SnapshotStatus,
    #[serde(default)]
    pub description: String,
}

impl Snapshot {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.id.is_empty() {
            return Err(DomainError::MissingRequiredField {
                field: "snapshot.id",
            });
        }
        if self.vm_id.is_empty() {
            return Err(DomainError::InvalidEntity {
                entity: "snapshot",
                id: self.id.to_string(),
                reason: "vm_id cannot be empty".into(),
            });
        }
        Ok(())
    }
}
