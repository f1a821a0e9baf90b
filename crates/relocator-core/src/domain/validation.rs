use std::collections::HashSet;

use crate::domain::{
    entities::{
        Disk, DiskImage, RelocationRequest, Snapshot, StorageDomain, Vm, VmDevice, VmTemplate,
    },
    error::DomainError,
};

/// Centralized domain validation.
///
/// All entity invariants are reached through here, not scattered across
/// loaders and services.
pub struct DomainValidator;

impl DomainValidator {
    pub fn validate_request(request: &RelocationRequest) -> Result<(), DomainError> {
        request.validate()
    }

    pub fn validate_disk(disk: &Disk) -> Result<(), DomainError> {
        disk.validate()
    }

    /// An image must agree with its generic disk record on identity.
    pub fn validate_disk_image(disk: &Disk, image: &DiskImage) -> Result<(), DomainError> {
        image.validate()?;
        if disk.id != image.id {
            return Err(DomainError::InvalidEntity {
                entity: "disk image",
                id: image.id.to_string(),
                reason: format!("does not match disk record {}", disk.id),
            });
        }
        Ok(())
    }

    pub fn validate_storage_domain(domain: &StorageDomain) -> Result<(), DomainError> {
        domain.validate()
    }

    pub fn validate_vm(vm: &Vm) -> Result<(), DomainError> {
        vm.validate()
    }

    pub fn validate_template(template: &VmTemplate) -> Result<(), DomainError> {
        template.validate()
    }

    pub fn validate_snapshot(snapshot: &Snapshot) -> Result<(), DomainError> {
        snapshot.validate()
    }

    /// A VM may hold at most one live attachment per disk. Snapshot
    /// attachments are keyed by snapshot as well.
    pub fn validate_attachments(devices: &[VmDevice]) -> Result<(), DomainError> {
        let mut seen = HashSet::new();
        for device in devices {
            if !seen.insert((device.vm_id, device.disk_id, device.snapshot_id)) {
                return Err(DomainError::DuplicateEntity {
                    entity: "attachment",
                    id: format!("{}/{}", device.vm_id, device.disk_id),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::{DiskStorageType, Guid, ImageOperation};

    #[test]
    fn request_with_empty_disk_is_rejected() {
        let req = RelocationRequest::new(
            Guid::EMPTY,
            Guid::from_u128(1),
            Guid::from_u128(2),
            ImageOperation::Move,
        );
        assert!(matches!(
            DomainValidator::validate_request(&req),
            Err(DomainError::InvalidRequest(_))
        ));
    }

    #[test]
    fn same_source_and_destination_is_well_formed() {
        let req = RelocationRequest::new(
            Guid::from_u128(9),
            Guid::from_u128(1),
            Guid::from_u128(1),
            ImageOperation::Copy,
        );
        assert!(DomainValidator::validate_request(&req).is_ok());
    }

    #[test]
    fn duplicate_live_attachment_is_rejected() {
        let dev = VmDevice {
            vm_id: Guid::from_u128(1),
            disk_id: Guid::from_u128(2),
            plugged: true,
            snapshot_id: None,
        };
        let mut snap_dev = dev.clone();
        snap_dev.snapshot_id = Some(Guid::from_u128(3));

        assert!(DomainValidator::validate_attachments(&[dev.clone(), snap_dev]).is_ok());
        assert!(DomainValidator::validate_attachments(&[dev.clone(), dev]).is_err());
    }

    #[test]
    fn image_must_match_disk() {
        let disk = Disk::new(Guid::from_u128(1), "d", DiskStorageType::Image);
        let image = DiskImage {
            id: Guid::from_u128(2),
            alias: "d".into(),
            shareable: false,
            content_type: Default::default(),
            image_status: Default::default(),
            owner_type: Default::default(),
            storage_pool_id: Guid::from_u128(100),
            storage_ids: vec![],
            size: 1,
            actual_size: 1,
            volume_format: Default::default(),
            volumes: vec![],
        };
        assert!(DomainValidator::validate_disk_image(&disk, &image).is_err());
    }
}
