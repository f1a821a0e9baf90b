//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits are the read-only entity snapshot readers the relocation
//! checks run over. The `relocator-adapters` crate provides implementations.
//!
//! Every lookup returns `Ok(None)` for a missing record. `Err` is reserved
//! for the store itself failing.

use std::sync::Arc;

use crate::domain::{
    Disk, DiskImage, DiskVmElement, Guid, Snapshot, StorageDomain, Vm, VmDevice, VmTemplate,
};
use crate::error::RelocatorResult;

/// Port for disk records.
///
/// Implemented by:
/// - `relocator_adapters::inventory::InMemoryInventory`
#[cfg_attr(test, mockall::automock)]
pub trait DiskStore: Send + Sync {
    /// The kind-agnostic record for any disk.
    fn get_disk(&self, id: Guid) -> RelocatorResult<Option<Disk>>;

    /// The image view. `None` for disks that are not image-backed.
    fn get_disk_image(&self, id: Guid) -> RelocatorResult<Option<DiskImage>>;

    fn list_disks(&self) -> RelocatorResult<Vec<Disk>>;
}

/// Port for storage domain records.
#[cfg_attr(test, mockall::automock)]
pub trait StorageDomainStore: Send + Sync {
    /// The domain as attached to `pool_id`. `None` if the domain does not
    /// exist or is not attached to that pool.
    fn get_for_pool(&self, pool_id: Guid, domain_id: Guid)
    -> RelocatorResult<Option<StorageDomain>>;

    fn get(&self, domain_id: Guid) -> RelocatorResult<Option<StorageDomain>>;

    fn list(&self) -> RelocatorResult<Vec<StorageDomain>>;
}

/// Port for VMs, templates and their disk attachments.
#[cfg_attr(test, mockall::automock)]
pub trait VmStore: Send + Sync {
    fn get_vm(&self, id: Guid) -> RelocatorResult<Option<Vm>>;

    /// Every VM with an attachment to `disk_id`, paired with that attachment.
    /// A VM appears once per attachment.
    fn get_vms_with_attachment(&self, disk_id: Guid) -> RelocatorResult<Vec<(Vm, VmDevice)>>;

    /// The template owning the image `disk_id`.
    fn get_template_for_image(&self, disk_id: Guid) -> RelocatorResult<Option<VmTemplate>>;

    fn list_vms(&self) -> RelocatorResult<Vec<Vm>>;
}

#[cfg_attr(test, mockall::automock)]
pub trait SnapshotStore: Send + Sync {
    fn get_all_for_vm(&self, vm_id: Guid) -> RelocatorResult<Vec<Snapshot>>;
}

#[cfg_attr(test, mockall::automock)]
pub trait DiskVmElementStore: Send + Sync {
    fn get_all_for_disk(&self, disk_id: Guid) -> RelocatorResult<Vec<DiskVmElement>>;
}

/// The full set of readers a service needs, shared by reference count.
#[derive(Clone)]
pub struct EntityReaders {
    pub disks: Arc<dyn DiskStore>,
    pub storage_domains: Arc<dyn StorageDomainStore>,
    pub vms: Arc<dyn VmStore>,
    pub snapshots: Arc<dyn SnapshotStore>,
    pub disk_vm_elements: Arc<dyn DiskVmElementStore>,
}

impl EntityReaders {
    /// Wire every reader to one backing store that implements them all.
    pub fn from_shared<S>(store: Arc<S>) -> Self
    where
        S: DiskStore
            + StorageDomainStore
            + VmStore
            + SnapshotStore
            + DiskVmElementStore
            + 'static,
    {
        Self {
            disks: store.clone(),
            storage_domains: store.clone(),
            vms: store.clone(),
            snapshots: store.clone(),
            disk_vm_elements: store,
        }
    }
}
