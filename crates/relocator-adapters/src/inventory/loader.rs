//! TOML inventory loader.
//!
//! Reads entity snapshots from one `.toml` file, or from every `.toml` file
//! under a directory, into an [`InMemoryInventory`].
//!
//! # Directory layout expected
//!
//! ```text
//! inventory/
//! ├── storage.toml        ← any split is fine; files are merged
//! ├── disks.toml
//! └── cluster-a/
//!     └── vms.toml
//! ```
//!
//! Files are read in path order. A later record with the same id replaces an
//! earlier one.
//!
//! # Document format
//!
//! ```toml
//! [[storage_domains]]
//! id                     = "00000000-0000-0000-0000-000000000010"
//! name                   = "nfs-a"
//! type                   = "nfs"        # nfs | glusterfs | posix | localfs | iscsi | fcp | cinder | managed-block-storage
//! status                 = "active"     # active | inactive | maintenance | locked | unknown
//! storage_pool_id        = "00000000-0000-0000-0000-000000000100"
//! available_disk_size_gb = 120          # optional
//! used_disk_size_gb      = 80           # optional
//! supports_discard       = true         # optional, block domains only
//!
//! [[disks]]
//! id              = "00000000-0000-0000-0000-000000000001"
//! alias           = "db-data"
//! kind            = "image"             # image (default) | lun | cinder | managed-block-storage
//! # Image disks only:
//! storage_pool_id = "00000000-0000-0000-0000-000000000100"
//! storage_ids     = ["00000000-0000-0000-0000-000000000010"]
//! size            = 10737418240         # bytes
//! actual_size     = 2147483648          # optional, defaults to size
//! volume_format   = "cow"               # raw (default) | cow
//! shareable       = false
//! content_type    = "data"              # data | ovf-store | iso
//! image_status    = "ok"                # ok | locked | illegal
//! owner_type      = "vm"                # vm | template
//!
//! [[templates]]
//! id       = "00000000-0000-0000-0000-000000000040"
//! name     = "rhel-base"
//! status   = "ok"
//! disk_ids = ["00000000-0000-0000-0000-000000000001"]
//!
//! [[vms]]
//! id     = "00000000-0000-0000-0000-000000000030"
//! name   = "db01"
//! status = "down"
//!
//! [[attachments]]
//! vm_id       = "00000000-0000-0000-0000-000000000030"
//! disk_id     = "00000000-0000-0000-0000-000000000001"
//! plugged     = true                    # optional, default true
//! snapshot_id = "..."                   # optional
//!
//! [[snapshots]]
//! id     = "00000000-0000-0000-0000-000000000050"
//! vm_id  = "00000000-0000-0000-0000-000000000030"
//! type   = "regular"
//! status = "ok"                         # ok | locked | in-preview
//!
//! [[disk_vm_elements]]
//! disk_id      = "00000000-0000-0000-0000-000000000001"
//! vm_id        = "00000000-0000-0000-0000-000000000030"
//! interface    = "virtio-scsi"          # ide | virtio | virtio-scsi | sata | spapr-vscsi
//! pass_discard = true
//! ```

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, instrument, warn};
use walkdir::WalkDir;

use relocator_core::{
    application::ApplicationError,
    domain::{
        Disk, DiskContentType, DiskImage, DiskStorageType, DiskVmElement, DomainError,
        DomainValidator as validator, Guid, ImageStatus, ImageVolume, Snapshot, StorageDomain,
        Vm, VmDevice, VmEntityType, VmTemplate, VolumeFormat,
    },
    error::{RelocatorError, RelocatorResult},
};

use super::memory::InMemoryInventory;

// ── Errors ────────────────────────────────────────────────────────────────────

/// Why an inventory could not be loaded.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("inventory path not found: {path}")]
    NotFound { path: String },

    #[error("failed to read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid record in '{path}': {source}")]
    Record {
        path: String,
        #[source]
        source: RelocatorError,
    },
}

impl From<LoadError> for RelocatorError {
    fn from(err: LoadError) -> Self {
        match err {
            // Keep the record's own category (usually an inventory shape error).
            LoadError::Record { source, .. } => source,
            other => ApplicationError::InventoryLoad {
                reason: other.to_string(),
            }
            .into(),
        }
    }
}

// ── Document types ────────────────────────────────────────────────────────────

/// Deserialised representation of one inventory file.
///
/// All sections are optional; see the module-level docs for the format.
#[derive(Debug, Default, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct InventoryDocument {
    #[serde(default)]
    pub storage_domains: Vec<StorageDomain>,
    #[serde(default)]
    pub disks: Vec<DiskEntry>,
    #[serde(default)]
    pub templates: Vec<VmTemplate>,
    #[serde(default)]
    pub vms: Vec<Vm>,
    #[serde(default)]
    pub attachments: Vec<VmDevice>,
    #[serde(default)]
    pub snapshots: Vec<Snapshot>,
    #[serde(default)]
    pub disk_vm_elements: Vec<DiskVmElement>,
}

/// `[[disks]]` entry. Image fields are ignored for other kinds.
#[derive(Debug, Deserialize, Clone)]
pub struct DiskEntry {
    pub id: Guid,
    pub alias: String,
    #[serde(default = "default_kind")]
    pub kind: DiskStorageType,
    pub storage_pool_id: Option<Guid>,
    #[serde(default)]
    pub storage_ids: Vec<Guid>,
    pub size: Option<u64>,
    pub actual_size: Option<u64>,
    #[serde(default)]
    pub volume_format: VolumeFormat,
    #[serde(default)]
    pub shareable: bool,
    #[serde(default)]
    pub content_type: DiskContentType,
    #[serde(default)]
    pub image_status: ImageStatus,
    #[serde(default)]
    pub owner_type: VmEntityType,
    #[serde(default)]
    pub volumes: Vec<ImageVolume>,
}

fn default_kind() -> DiskStorageType {
    DiskStorageType::Image
}

/// What a `[[disks]]` entry becomes.
#[derive(Debug, Clone)]
enum DiskRecord {
    Image(DiskImage),
    Plain(Disk),
}

impl DiskEntry {
    fn to_record(&self) -> Result<DiskRecord, DomainError> {
        if self.kind != DiskStorageType::Image {
            let disk = Disk::new(self.id, self.alias.clone(), self.kind);
            validator::validate_disk(&disk)?;
            return Ok(DiskRecord::Plain(disk));
        }

        let storage_pool_id = self.storage_pool_id.ok_or(DomainError::MissingRequiredField {
            field: "disk.storage_pool_id",
        })?;
        let size = self
            .size
            .ok_or(DomainError::MissingRequiredField { field: "disk.size" })?;

        let image = DiskImage {
            id: self.id,
            alias: self.alias.clone(),
            shareable: self.shareable,
            content_type: self.content_type,
            image_status: self.image_status,
            owner_type: self.owner_type,
            storage_pool_id,
            storage_ids: self.storage_ids.clone(),
            size,
            actual_size: self.actual_size.unwrap_or(size),
            volume_format: self.volume_format,
            volumes: self.volumes.clone(),
        };
        let disk = Disk::new(self.id, self.alias.clone(), DiskStorageType::Image);
        validator::validate_disk(&disk)?;
        validator::validate_disk_image(&disk, &image)?;
        Ok(DiskRecord::Image(image))
    }
}

impl InventoryDocument {
    /// Parse a document from TOML text.
    pub fn parse(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }

    /// Check every record without touching any inventory.
    pub fn validate(&self) -> Result<(), DomainError> {
        for domain in &self.storage_domains {
            validator::validate_storage_domain(domain)?;
        }
        for disk in &self.disks {
            disk.to_record()?;
        }
        for template in &self.templates {
            validator::validate_template(template)?;
        }
        for vm in &self.vms {
            validator::validate_vm(vm)?;
        }
        for snapshot in &self.snapshots {
            validator::validate_snapshot(snapshot)?;
        }
        validator::validate_attachments(&self.attachments)
    }

    /// Insert every record into `inventory`.
    pub fn apply_to(&self, inventory: &InMemoryInventory) -> RelocatorResult<()> {
        for domain in &self.storage_domains {
            inventory.insert_storage_domain(domain.clone())?;
        }
        for entry in &self.disks {
            match entry.to_record().map_err(RelocatorError::Domain)? {
                DiskRecord::Image(image) => inventory.insert_disk_image(image)?,
                DiskRecord::Plain(disk) => inventory.insert_disk(disk)?,
            }
        }
        for template in &self.templates {
            inventory.insert_template(template.clone())?;
        }
        for vm in &self.vms {
            inventory.insert_vm(vm.clone())?;
        }
        for snapshot in &self.snapshots {
            inventory.insert_snapshot(snapshot.clone())?;
        }
        for device in &self.attachments {
            inventory.insert_attachment(device.clone())?;
        }
        for element in &self.disk_vm_elements {
            inventory.insert_disk_vm_element(element.clone())?;
        }
        Ok(())
    }

    /// Build a fresh inventory holding just this document.
    pub fn into_inventory(self) -> RelocatorResult<InMemoryInventory> {
        let inventory = InMemoryInventory::new();
        self.apply_to(&inventory)?;
        Ok(inventory)
    }
}

// ── Loader ────────────────────────────────────────────────────────────────────

/// Loads inventory documents from the filesystem.
///
/// ```rust,no_run
/// use relocator_adapters::InventoryLoader;
///
/// let inventory = InventoryLoader::new("./inventory").load()?;
/// println!("{:?}", inventory.summary()?);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct InventoryLoader {
    path: PathBuf,
}

impl InventoryLoader {
    /// Create a loader pointed at a file or directory.
    ///
    /// The path does not need to exist yet; [`load`](Self::load) reports it
    /// when called.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the inventory.
    ///
    /// # Errors
    ///
    /// A single file must parse and every record must be valid.
    ///
    /// In a directory, files that fail to read, parse or validate are
    /// **skipped with a `WARN` log**. Only a missing directory, or a record
    /// that conflicts with one from an earlier file, fails the whole load.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn load(&self) -> Result<InMemoryInventory, LoadError> {
        if !self.path.exists() {
            return Err(LoadError::NotFound {
                path: self.path.display().to_string(),
            });
        }

        let inventory = InMemoryInventory::new();

        if self.path.is_file() {
            let doc = read_document(&self.path)?;
            apply(&doc, &self.path, &inventory)?;
        } else {
            self.load_dir(&inventory)?;
        }

        if let Ok(summary) = inventory.summary() {
            debug!(?summary, "finished loading inventory");
        }
        Ok(inventory)
    }

    fn load_dir(&self, inventory: &InMemoryInventory) -> Result<(), LoadError> {
        for walk_entry in WalkDir::new(&self.path).sort_by_file_name() {
            let walk_entry = match walk_entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(error = %e, "skipping unreadable inventory entry");
                    continue;
                }
            };

            let path = walk_entry.path();
            let is_toml = path.extension().is_some_and(|ext| ext == "toml");
            if !walk_entry.file_type().is_file() || !is_toml {
                continue;
            }

            // One bad file must not block the others.
            match read_document(path) {
                Ok(doc) => apply(&doc, path, inventory)?,
                Err(e) => warn!(
                    file  = %path.display(),
                    error = %e,
                    "skipping inventory file due to load error"
                ),
            }
        }
        Ok(())
    }
}

/// Read, parse and validate one file.
#[instrument(fields(file = %path.display()))]
fn read_document(path: &Path) -> Result<InventoryDocument, LoadError> {
    let display = || path.display().to_string();

    let raw = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: display(),
        source,
    })?;

    let doc = InventoryDocument::parse(&raw).map_err(|source| LoadError::Parse {
        path: display(),
        source,
    })?;

    doc.validate().map_err(|e| LoadError::Record {
        path: display(),
        source: RelocatorError::Domain(e),
    })?;

    debug!(
        domains = doc.storage_domains.len(),
        disks = doc.disks.len(),
        vms = doc.vms.len(),
        "parsed inventory file"
    );
    Ok(doc)
}

fn apply(doc: &InventoryDocument, path: &Path, inventory: &InMemoryInventory) -> Result<(), LoadError> {
    doc.apply_to(inventory).map_err(|source| LoadError::Record {
        path: path.display().to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use relocator_core::application::ports::{DiskStore, StorageDomainStore, VmStore};
    use relocator_core::domain::{StorageType, VmStatus};
    use std::{fs::File, io::Write};
    use tempfile::TempDir;

    // ── helpers ───────────────────────────────────────────────────────────

    fn write(dir: &Path, rel_path: &str, content: &str) -> PathBuf {
        let full = dir.join(rel_path);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        File::create(&full)
            .unwrap()
            .write_all(content.as_bytes())
            .unwrap();
        full
    }

    const DOMAINS: &str = r#"
[[storage_domains]]
id              = "00000000-0000-0000-0000-000000000010"
name            = "nfs-a"
type            = "nfs"
status          = "active"
storage_pool_id = "00000000-0000-0000-0000-000000000100"
available_disk_size_gb = 120
used_disk_size_gb      = 80
"#;

    const DISKS: &str = r#"
[[disks]]
id              = "00000000-0000-0000-0000-000000000001"
alias           = "db-data"
storage_pool_id = "00000000-0000-0000-0000-000000000100"
storage_ids     = ["00000000-0000-0000-0000-000000000010"]
size            = 1073741824

[[disks]]
id    = "00000000-0000-0000-0000-000000000002"
alias = "san-lun"
kind  = "lun"
"#;

    const VMS: &str = r#"
[[vms]]
id     = "00000000-0000-0000-0000-000000000030"
name   = "db01"
status = "up"

[[attachments]]
vm_id   = "00000000-0000-0000-0000-000000000030"
disk_id = "00000000-0000-0000-0000-000000000001"
"#;

    fn id(n: u128) -> Guid {
        Guid::from_u128(n)
    }

    // ── document ──────────────────────────────────────────────────────────

    #[test]
    fn empty_document_is_valid() {
        let doc = InventoryDocument::parse("").unwrap();
        assert!(doc.validate().is_ok());
        assert!(doc.into_inventory().unwrap().is_empty().unwrap());
    }

    #[test]
    fn unknown_section_is_rejected() {
        assert!(InventoryDocument::parse("[[hosts]]\nid = \"x\"\n").is_err());
    }

    #[test]
    fn image_disk_without_size_is_invalid() {
        let doc = InventoryDocument::parse(
            r#"
[[disks]]
id              = "00000000-0000-0000-0000-000000000001"
alias           = "d"
storage_pool_id = "00000000-0000-0000-0000-000000000100"
"#,
        )
        .unwrap();
        assert!(matches!(
            doc.validate(),
            Err(DomainError::MissingRequiredField { field: "disk.size" })
        ));
    }

    #[test]
    fn actual_size_defaults_to_size() {
        let inv = InventoryDocument::parse(DISKS)
            .unwrap()
            .into_inventory()
            .unwrap();
        let image = inv.get_disk_image(id(1)).unwrap().unwrap();
        assert_eq!(image.actual_size, image.size);
        assert_eq!(image.storage_ids, vec![id(0x10)]);
    }

    #[test]
    fn non_image_disk_has_no_image_view() {
        let inv = InventoryDocument::parse(DISKS)
            .unwrap()
            .into_inventory()
            .unwrap();
        let disk = inv.get_disk(id(2)).unwrap().unwrap();
        assert_eq!(disk.storage_type, DiskStorageType::Lun);
        assert!(inv.get_disk_image(id(2)).unwrap().is_none());
    }

    // ── loader ────────────────────────────────────────────────────────────

    #[test]
    fn load_returns_error_for_missing_path() {
        let loader = InventoryLoader::new("/absolutely/does/not/exist");
        assert!(matches!(loader.load(), Err(LoadError::NotFound { .. })));
    }

    #[test]
    fn load_single_file() {
        let temp = TempDir::new().unwrap();
        let file = write(temp.path(), "inventory.toml", &format!("{DOMAINS}{DISKS}{VMS}"));

        let inv = InventoryLoader::new(file).load().unwrap();
        let domain = inv.get(id(0x10)).unwrap().unwrap();
        assert_eq!(domain.storage_type, StorageType::Nfs);
        assert_eq!(inv.get_vm(id(0x30)).unwrap().unwrap().status, VmStatus::Up);
        assert_eq!(inv.get_vms_with_attachment(id(1)).unwrap().len(), 1);
    }

    #[test]
    fn single_file_with_parse_error_fails() {
        let temp = TempDir::new().unwrap();
        let file = write(temp.path(), "broken.toml", "[[disks]\n");

        assert!(matches!(
            InventoryLoader::new(file).load(),
            Err(LoadError::Parse { .. })
        ));
    }

    #[test]
    fn directory_files_are_merged() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "a-domains.toml", DOMAINS);
        write(temp.path(), "b-disks.toml", DISKS);
        write(temp.path(), "cluster/vms.toml", VMS);

        let summary = InventoryLoader::new(temp.path())
            .load()
            .unwrap()
            .summary()
            .unwrap();
        assert_eq!(summary.storage_domains, 1);
        assert_eq!(summary.disks, 2);
        assert_eq!(summary.vms, 1);
        assert_eq!(summary.attachments, 1);
    }

    #[test]
    fn directory_skips_bad_and_foreign_files() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "domains.toml", DOMAINS);
        write(temp.path(), "broken.toml", "this is not toml = = =");
        write(temp.path(), "README.md", "# not inventory");

        let inv = InventoryLoader::new(temp.path()).load().unwrap();
        assert_eq!(inv.list().unwrap().len(), 1);
    }

    #[test]
    fn directory_skips_file_with_invalid_record() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "domains.toml", DOMAINS);
        write(
            temp.path(),
            "vms.toml",
            r#"
[[vms]]
id   = "00000000-0000-0000-0000-000000000000"
name = "nil"
"#,
        );

        let inv = InventoryLoader::new(temp.path()).load().unwrap();
        assert!(inv.list_vms().unwrap().is_empty());
    }

    #[test]
    fn attachment_repeated_across_files_fails_load() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "a.toml", VMS);
        write(
            temp.path(),
            "b.toml",
            r#"
[[attachments]]
vm_id   = "00000000-0000-0000-0000-000000000030"
disk_id = "00000000-0000-0000-0000-000000000001"
"#,
        );

        let err = InventoryLoader::new(temp.path()).load().unwrap_err();
        assert!(matches!(err, LoadError::Record { .. }));
        assert!(matches!(
            RelocatorError::from(err),
            RelocatorError::Domain(DomainError::DuplicateEntity { .. })
        ));
    }

    #[test]
    fn io_errors_convert_to_inventory_load() {
        let err = RelocatorError::from(LoadError::NotFound { path: "x".into() });
        assert!(matches!(
            err,
            RelocatorError::Application(ApplicationError::InventoryLoad { .. })
        ));
    }
}
