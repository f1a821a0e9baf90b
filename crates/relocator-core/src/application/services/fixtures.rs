//! In-crate test inventory. Every store port over plain vectors.

use std::sync::Arc;

use crate::application::ports::{
    DiskStore, DiskVmElementStore, EntityReaders, SnapshotStore, StorageDomainStore, VmStore,
};
use crate::domain::{
    Disk, DiskImage, DiskStorageType, DiskVmElement, Guid, Snapshot, StorageDomain,
    StorageDomainStatus, StorageType, Vm, VmDevice, VmEntityType, VmStatus, VmTemplate,
    VolumeFormat,
};
use crate::error::RelocatorResult;

pub const POOL: Guid = Guid::from_u128(0x100);
pub const SRC: Guid = Guid::from_u128(0x10);
pub const DEST: Guid = Guid::from_u128(0x20);
pub const DISK: Guid = Guid::from_u128(0x1);

const GB: u64 = 1 << 30;

/// An image-backed, VM-owned, 1 GiB raw disk sitting on [`SRC`].
pub fn image(id: Guid) -> DiskImage {
    DiskImage {
        id,
        alias: format!("disk-{id}"),
        shareable: false,
        content_type: Default::default(),
        image_status: Default::default(),
        owner_type: VmEntityType::Vm,
        storage_pool_id: POOL,
        storage_ids: vec![SRC],
        size: GB,
        actual_size: GB,
        volume_format: VolumeFormat::Raw,
        volumes: vec![],
    }
}

/// An active domain in [`POOL`] with 100 GiB free.
pub fn domain(id: Guid, storage_type: StorageType) -> StorageDomain {
    StorageDomain {
        id,
        name: format!("{storage_type}-{id}"),
        storage_type,
        status: StorageDomainStatus::Active,
        storage_pool_id: POOL,
        available_disk_size_gb: Some(100),
        used_disk_size_gb: Some(100),
        supports_discard: None,
    }
}

pub fn vm(id: Guid, status: VmStatus) -> Vm {
    Vm {
        id,
        name: format!("vm-{id}"),
        status,
    }
}

pub fn attachment(vm_id: Guid, disk_id: Guid, snapshot_id: Option<Guid>) -> VmDevice {
    VmDevice {
        vm_id,
        disk_id,
        plugged: true,
        snapshot_id,
    }
}

#[derive(Default)]
pub struct FakeInventory {
    pub disks: Vec<Disk>,
    pub images: Vec<DiskImage>,
    pub domains: Vec<StorageDomain>,
    pub vms: Vec<Vm>,
    pub devices: Vec<VmDevice>,
    pub templates: Vec<VmTemplate>,
    pub snapshots: Vec<Snapshot>,
    pub elements: Vec<DiskVmElement>,
}

impl FakeInventory {
    /// [`DISK`] on an NFS source, with an empty NFS destination.
    pub fn standard() -> Self {
        Self::default()
            .with_image(image(DISK))
            .with_domain(domain(SRC, StorageType::Nfs))
            .with_domain(domain(DEST, StorageType::Nfs))
    }

    pub fn with_image(mut self, image: DiskImage) -> Self {
        self.disks.retain(|d| d.id != image.id);
        self.images.retain(|i| i.id != image.id);
        self.disks
            .push(Disk::new(image.id, image.alias.clone(), DiskStorageType::Image));
        self.images.push(image);
        self
    }

    /// A disk record with no image view.
    pub fn with_disk(mut self, disk: Disk) -> Self {
        self.disks.retain(|d| d.id != disk.id);
        self.images.retain(|i| i.id != disk.id);
        self.disks.push(disk);
        self
    }

    pub fn with_domain(mut self, domain: StorageDomain) -> Self {
        self.domains.retain(|d| d.id != domain.id);
        self.domains.push(domain);
        self
    }

    pub fn with_vm(mut self, vm: Vm, device: VmDevice) -> Self {
        self.vms.retain(|v| v.id != vm.id);
        self.vms.push(vm);
        self.devices.push(device);
        self
    }

    pub fn with_template(mut self, template: VmTemplate) -> Self {
        self.templates.push(template);
        self
    }

    pub fn with_snapshot(mut self, snapshot: Snapshot) -> Self {
        self.snapshots.push(snapshot);
        self
    }

    pub fn with_element(mut self, element: DiskVmElement) -> Self {
        self.elements.push(element);
        self
    }

    pub fn into_readers(self) -> EntityReaders {
        EntityReaders::from_shared(Arc::new(self))
    }
}

impl DiskStore for FakeInventory {
    fn get_disk(&self, id: Guid) -> RelocatorResult<Option<Disk>> {
        Ok(self.disks.iter().find(|d| d.id == id).cloned())
    }

    fn get_disk_image(&self, id: Guid) -> RelocatorResult<Option<DiskImage>> {
        Ok(self.images.iter().find(|i| i.id == id).cloned())
    }

    fn list_disks(&self) -> RelocatorResult<Vec<Disk>> {
        Ok(self.disks.clone())
    }
}

impl StorageDomainStore for FakeInventory {
    fn get_for_pool(&self, pool_id: Guid, domain_id: Guid) -> RelocatorResult<Option<StorageDomain>> {
        Ok(self
            .domains
            .iter()
            .find(|d| d.id == domain_id && d.storage_pool_id == pool_id)
            .cloned())
    }

    fn get(&self, domain_id: Guid) -> RelocatorResult<Option<StorageDomain>> {
        Ok(self.domains.iter().find(|d| d.id == domain_id).cloned())
    }

    fn list(&self) -> RelocatorResult<Vec<StorageDomain>> {
        Ok(self.domains.clone())
    }
}

impl VmStore for FakeInventory {
    fn get_vm(&self, id: Guid) -> RelocatorResult<Option<Vm>> {
        Ok(self.vms.iter().find(|v| v.id == id).cloned())
    }

    fn get_vms_with_attachment(&self, disk_id: Guid) -> RelocatorResult<Vec<(Vm, VmDevice)>> {
        Ok(self
            .devices
            .iter()
            .filter(|d| d.disk_id == disk_id)
            .filter_map(|d| {
                self.vms
                    .iter()
                    .find(|v| v.id == d.vm_id)
                    .map(|v| (v.clone(), d.clone()))
            })
            .collect())
    }

    fn get_template_for_image(&self, disk_id: Guid) -> RelocatorResult<Option<VmTemplate>> {
        Ok(self
            .templates
            .iter()
            .find(|t| t.disk_ids.contains(&disk_id))
            .cloned())
    }

    fn list_vms(&self) -> RelocatorResult<Vec<Vm>> {
        Ok(self.vms.clone())
    }
}

impl SnapshotStore for FakeInventory {
    fn get_all_for_vm(&self, vm_id: Guid) -> RelocatorResult<Vec<Snapshot>> {
        Ok(self
            .snapshots
            .iter()
            .filter(|s| s.vm_id == vm_id)
            .cloned()
            .collect())
    }
}

impl DiskVmElementStore for FakeInventory {
    fn get_all_for_disk(&self, disk_id: Guid) -> RelocatorResult<Vec<DiskVmElement>> {
        Ok(self
            .elements
            .iter()
            .filter(|e| e.disk_id == disk_id)
            .cloned()
            .collect())
    }
}
