//! Domain value objects: identifiers and the state enums carried by entities.
//!
//! # Design
//!
//! These are pure value types: `Copy`, equality-by-value, no identity.
//! They hold NO capability logic. File/block classification, interface
//! discard support and relocatable disk kinds live in `capabilities.rs`.
//! This file only defines the types, their string forms, and parsers for the
//! ones that arrive as user input.
//!
//! # Adding New Variants
//!
//! 1. Add the enum variant here
//! 2. Add the `as_str` arm (and the `FromStr` arm where one exists)
//! 3. Add a capability entry in `capabilities.rs` if the type has one

use crate::domain::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// `Display` through `as_str` for the string-backed enums below.
macro_rules! display_as_str {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.as_str())
                }
            }
        )+
    };
}

// ── Guid ─────────────────────────────────────────────────────────────────────

/// Identifier shared by every entity (disks, domains, VMs, snapshots, pools).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Guid(Uuid);

impl Guid {
    /// The all-zero identifier. Never a valid entity key.
    pub const EMPTY: Guid = Guid(Uuid::nil());

    /// A fresh random identifier.
    pub fn new_random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Deterministic identifier, mostly useful for fixtures.
    pub const fn from_u128(value: u128) -> Self {
        Self(Uuid::from_u128(value))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_nil()
    }

    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for Guid {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl fmt::Display for Guid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for Guid {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|e| DomainError::InvalidIdentifier(format!("'{s}': {e}")))
    }
}

// ── ImageOperation ───────────────────────────────────────────────────────────

/// What the caller wants to do with the disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageOperation {
    /// Relocate: the disk leaves the source domain.
    Move,
    /// Duplicate: the source copy stays in place.
    Copy,
}

impl ImageOperation {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Move => "move",
            Self::Copy => "copy",
        }
    }
}

impl FromStr for ImageOperation {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "move" | "mv" => Ok(Self::Move),
            "copy" | "cp" => Ok(Self::Copy),
            other => Err(DomainError::UnknownVariant {
                kind: "image operation",
                value: other.to_string(),
            }),
        }
    }
}

// ── Disk attributes ──────────────────────────────────────────────────────────

/// How a disk is backed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiskStorageType {
    /// Image volumes living inside a storage domain.
    Image,
    /// A directly attached LUN.
    Lun,
    /// Managed by an external Cinder service.
    Cinder,
    /// Managed block storage driven by an external driver.
    ManagedBlockStorage,
}

impl DiskStorageType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Lun => "lun",
            Self::Cinder => "cinder",
            Self::ManagedBlockStorage => "managed-block-storage",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiskContentType {
    #[default]
    Data,
    /// Reserved for appliance metadata; never relocatable.
    OvfStore,
    Iso,
}

impl DiskContentType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Data => "data",
            Self::OvfStore => "ovf-store",
            Self::Iso => "iso",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageStatus {
    #[default]
    Ok,
    Locked,
    Illegal,
}

impl ImageStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Locked => "locked",
            Self::Illegal => "illegal",
        }
    }
}

/// Which kind of entity owns a disk image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VmEntityType {
    #[default]
    Vm,
    Template,
}

impl VmEntityType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Vm => "vm",
            Self::Template => "template",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VolumeFormat {
    #[default]
    Raw,
    Cow,
}

impl VolumeFormat {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Raw => "raw",
            Self::Cow => "cow",
        }
    }
}

/// Bus a disk is attached to a VM through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiskInterface {
    Ide,
    #[default]
    #[serde(rename = "virtio")]
    VirtIo,
    #[serde(rename = "virtio-scsi")]
    VirtIoScsi,
    Sata,
    SpaprVscsi,
}

impl DiskInterface {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Ide => "ide",
            Self::VirtIo => "virtio",
            Self::VirtIoScsi => "virtio-scsi",
            Self::Sata => "sata",
            Self::SpaprVscsi => "spapr-vscsi",
        }
    }
}

// ── Storage domain attributes ────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StorageType {
    Nfs,
    #[serde(rename = "glusterfs")]
    GlusterFs,
    Posix,
    #[serde(rename = "localfs")]
    LocalFs,
    Iscsi,
    Fcp,
    Cinder,
    ManagedBlockStorage,
}

impl StorageType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Nfs => "nfs",
            Self::GlusterFs => "glusterfs",
            Self::Posix => "posix",
            Self::LocalFs => "localfs",
            Self::Iscsi => "iscsi",
            Self::Fcp => "fcp",
            Self::Cinder => "cinder",
            Self::ManagedBlockStorage => "managed-block-storage",
        }
    }

    /// Delegates to `capabilities::storage_class`.
    pub fn is_file_domain(self) -> bool {
        crate::domain::capabilities::storage_class(self)
            == crate::domain::capabilities::StorageClass::File
    }

    /// Delegates to `capabilities::storage_class`.
    pub fn is_block_domain(self) -> bool {
        crate::domain::capabilities::storage_class(self)
            == crate::domain::capabilities::StorageClass::Block
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageDomainStatus {
    #[default]
    Active,
    Inactive,
    Maintenance,
    Locked,
    Unknown,
}

impl StorageDomainStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Maintenance => "maintenance",
            Self::Locked => "locked",
            Self::Unknown => "unknown",
        }
    }
}

// ── VM / template / snapshot attributes ──────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VmStatus {
    #[default]
    Down,
    Up,
    PoweringUp,
    PoweringDown,
    Paused,
    MigratingFrom,
    SavingState,
    RestoringState,
    ImageLocked,
    Suspended,
    NotResponding,
    Unknown,
}

impl VmStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Down => "down",
            Self::Up => "up",
            Self::PoweringUp => "powering-up",
            Self::PoweringDown => "powering-down",
            Self::Paused => "paused",
            Self::MigratingFrom => "migrating-from",
            Self::SavingState => "saving-state",
            Self::RestoringState => "restoring-state",
            Self::ImageLocked => "image-locked",
            Self::Suspended => "suspended",
            Self::NotResponding => "not-responding",
            Self::Unknown => "unknown",
        }
    }

    pub const fn is_down(self) -> bool {
        matches!(self, Self::Down)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateStatus {
    #[default]
    Ok,
    Locked,
    Illegal,
}

impl TemplateStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Locked => "locked",
            Self::Illegal => "illegal",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SnapshotType {
    #[default]
    Regular,
    Active,
    Preview,
    Stateless,
    NextRun,
}

impl SnapshotType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Regular => "regular",
            Self::Active => "active",
            Self::Preview => "preview",
            Self::Stateless => "stateless",
            Self::NextRun => "next-run",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SnapshotStatus {
    #[default]
    Ok,
    /// A snapshot operation is in flight.
    Locked,
    InPreview,
}

impl SnapshotStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Locked => "locked",
            Self::InPreview => "in-preview",
        }
    }
}

display_as_str!(
    ImageOperation,
    DiskStorageType,
    DiskContentType,
    ImageStatus,
    VmEntityType,
    VolumeFormat,
    DiskInterface,
    StorageType,
    StorageDomainStatus,
    VmStatus,
    TemplateStatus,
    SnapshotType,
    SnapshotStatus,
);
