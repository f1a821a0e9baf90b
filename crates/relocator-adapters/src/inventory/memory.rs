//! In-memory inventory backing every store port.

use std::{
    collections::HashMap,
    fmt,
    sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use relocator_core::{
    application::{
        ApplicationError,
        ports::{
            DiskStore, DiskVmElementStore, EntityReaders, SnapshotStore, StorageDomainStore,
            VmStore,
        },
    },
    domain::{
        Disk, DiskImage, DiskStorageType, DiskVmElement, DomainValidator as validator, Guid,
        Snapshot, StorageDomain, Vm, VmDevice, VmTemplate,
    },
    error::{RelocatorError, RelocatorResult},
};

#[derive(Default)]
struct InventoryState {
    disks: HashMap<Guid, Disk>,
    images: HashMap<Guid, DiskImage>,
    domains: HashMap<Guid, StorageDomain>,
    vms: HashMap<Guid, Vm>,
    templates: HashMap<Guid, VmTemplate>,
    snapshots: HashMap<Guid, Snapshot>,
    devices: Vec<VmDevice>,
    elements: Vec<DiskVmElement>,
}

/// Record counts, logged after each load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InventorySummary {
    pub disks: usize,
    pub storage_domains: usize,
    pub vms: usize,
    pub templates: usize,
    pub snapshots: usize,
    pub attachments: usize,
}

/// Thread-safe in-memory inventory.
///
/// Every record is validated on insert. Re-inserting an id replaces the
/// previous record.
#[derive(Clone, Default)]
pub struct InMemoryInventory {
    inner: Arc<RwLock<InventoryState>>,
}

impl fmt::Debug for InMemoryInventory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.summary() {
            Ok(summary) => f
                .debug_struct("InMemoryInventory")
                .field("summary", &summary)
                .finish(),
            Err(_) => f.write_str("InMemoryInventory { <poisoned> }"),
        }
    }
}

impl InMemoryInventory {
    /// Create a new empty inventory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wire this inventory into every reader slot.
    pub fn readers(&self) -> EntityReaders {
        EntityReaders::from_shared(Arc::new(self.clone()))
    }

    fn read(&self) -> RelocatorResult<RwLockReadGuard<'_, InventoryState>> {
        self.inner
            .read()
            .map_err(|_| ApplicationError::StoreLockError.into())
    }

    fn write(&self) -> RelocatorResult<RwLockWriteGuard<'_, InventoryState>> {
        self.inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError.into())
    }

    pub fn summary(&self) -> RelocatorResult<InventorySummary> {
        let inner = self.read()?;
        Ok(InventorySummary {
            disks: inner.disks.len(),
            storage_domains: inner.domains.len(),
            vms: inner.vms.len(),
            templates: inner.templates.len(),
            snapshots: inner.snapshots.len(),
            attachments: inner.devices.len(),
        })
    }

    pub fn is_empty(&self) -> RelocatorResult<bool> {
        Ok(self.summary()? == InventorySummary::default())
    }

    /// Insert a disk with no image view (LUN, Cinder, managed block).
    ///
    /// An image-kind disk inserted this way has no image record, which the
    /// relocation checks report as a missing disk.
    pub fn insert_disk(&self, disk: Disk) -> RelocatorResult<()> {
        validator::validate_disk(&disk).map_err(RelocatorError::Domain)?;

        let mut inner = self.write()?;
        inner.images.remove(&disk.id);
        inner.disks.insert(disk.id, disk);
        Ok(())
    }

    /// Insert an image-backed disk together with its generic record.
    pub fn insert_disk_image(&self, image: DiskImage) -> RelocatorResult<()> {
        let disk = Disk::new(image.id, image.alias.clone(), DiskStorageType::Image);
        validator::validate_disk(&disk).map_err(RelocatorError::Domain)?;
        validator::validate_disk_image(&disk, &image).map_err(RelocatorError::Domain)?;

        let mut inner = self.write()?;
        inner.disks.insert(disk.id, disk);
        inner.images.insert(image.id, image);
        Ok(())
    }

    pub fn insert_storage_domain(&self, domain: StorageDomain) -> RelocatorResult<()> {
        validator::validate_storage_domain(&domain).map_err(RelocatorError::Domain)?;

        let mut inner = self.write()?;
        inner.domains.insert(domain.id, domain);
        Ok(())
    }

    pub fn insert_vm(&self, vm: Vm) -> RelocatorResult<()> {
        validator::validate_vm(&vm).map_err(RelocatorError::Domain)?;

        let mut inner = self.write()?;
        inner.vms.insert(vm.id, vm);
        Ok(())
    }

    pub fn insert_template(&self, template: VmTemplate) -> RelocatorResult<()> {
        validator::validate_template(&template).map_err(RelocatorError::Domain)?;

        let mut inner = self.write()?;
        inner.templates.insert(template.id, template);
        Ok(())
    }

    pub fn insert_snapshot(&self, snapshot: Snapshot) -> RelocatorResult<()> {
        validator::validate_snapshot(&snapshot).map_err(RelocatorError::Domain)?;

        let mut inner = self.write()?;
        inner.snapshots.insert(snapshot.id, snapshot);
        Ok(())
    }

    /// Attach a disk to a VM. The same (vm, disk, snapshot) triple twice is
    /// rejected.
    pub fn insert_attachment(&self, device: VmDevice) -> RelocatorResult<()> {
        let mut inner = self.write()?;
        inner.devices.push(device);
        if let Err(e) = validator::validate_attachments(&inner.devices) {
            inner.devices.pop();
            return Err(RelocatorError::Domain(e));
        }
        Ok(())
    }

    pub fn insert_disk_vm_element(&self, element: DiskVmElement) -> RelocatorResult<()> {
        let mut inner = self.write()?;
        inner
            .elements
            .retain(|e| !(e.disk_id == element.disk_id && e.vm_id == element.vm_id));
        inner.elements.push(element);
        Ok(())
    }

    /// Drop every record.
    pub fn clear(&self) -> RelocatorResult<()> {
        let mut inner = self.write()?;
        *inner = InventoryState::default();
        Ok(())
    }
}

impl DiskStore for InMemoryInventory {
    fn get_disk(&self, id: Guid) -> RelocatorResult<Option<Disk>> {
        Ok(self.read()?.disks.get(&id).cloned())
    }

    fn get_disk_image(&self, id: Guid) -> RelocatorResult<Option<DiskImage>> {
        Ok(self.read()?.images.get(&id).cloned())
    }

    fn list_disks(&self) -> RelocatorResult<Vec<Disk>> {
        let mut disks: Vec<Disk> = self.read()?.disks.values().cloned().collect();
        disks.sort_by(|a, b| a.alias.cmp(&b.alias).then(a.id.cmp(&b.id)));
        Ok(disks)
    }
}

impl StorageDomainStore for InMemoryInventory {
    fn get_for_pool(
        &self,
        pool_id: Guid,
        domain_id: Guid,
    ) -> RelocatorResult<Option<StorageDomain>> {
        Ok(self
            .read()?
            .domains
            .get(&domain_id)
            .filter(|d| d.storage_pool_id == pool_id)
            .cloned())
    }

    fn get(&self, domain_id: Guid) -> RelocatorResult<Option<StorageDomain>> {
        Ok(self.read()?.domains.get(&domain_id).cloned())
    }

    fn list(&self) -> RelocatorResult<Vec<StorageDomain>> {
        let mut domains: Vec<StorageDomain> = self.read()?.domains.values().cloned().collect();
        domains.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(domains)
    }
}

impl VmStore for InMemoryInventory {
    fn get_vm(&self, id: Guid) -> RelocatorResult<Option<Vm>> {
        Ok(self.read()?.vms.get(&id).cloned())
    }

    fn get_vms_with_attachment(&self, disk_id: Guid) -> RelocatorResult<Vec<(Vm, VmDevice)>> {
        let inner = self.read()?;
        // Attachments pointing at unknown VMs are dangling and skipped.
        Ok(inner
            .devices
            .iter()
            .filter(|d| d.disk_id == disk_id)
            .filter_map(|d| inner.vms.get(&d.vm_id).map(|vm| (vm.clone(), d.clone())))
            .collect())
    }

    fn get_template_for_image(&self, disk_id: Guid) -> RelocatorResult<Option<VmTemplate>> {
        Ok(self
            .read()?
            .templates
            .values()
            .find(|t| t.disk_ids.contains(&disk_id))
            .cloned())
    }

    fn list_vms(&self) -> RelocatorResult<Vec<Vm>> {
        let mut vms: Vec<Vm> = self.read()?.vms.values().cloned().collect();
        vms.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(vms)
    }
}

impl SnapshotStore for InMemoryInventory {
    fn get_all_for_vm(&self, vm_id: Guid) -> RelocatorResult<Vec<Snapshot>> {
        let mut snapshots: Vec<Snapshot> = self
            .read()?
            .snapshots
            .values()
            .filter(|s| s.vm_id == vm_id)
            .cloned()
            .collect();
        snapshots.sort_by_key(|s| s.id);
        Ok(snapshots)
    }
}

impl DiskVmElementStore for InMemoryInventory {
    fn get_all_for_disk(&self, disk_id: Guid) -> RelocatorResult<Vec<DiskVmElement>> {
        Ok(self
            .read()?
            .elements
            .iter()
            .filter(|e| e.disk_id == disk_id)
            .cloned()
            .collect())
    }
}
