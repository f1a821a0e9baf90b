//! Relocation Service - the move/copy validation pipeline.
//!
//! The pipeline decides whether a disk may *start* moving or copying to
//! another storage domain. It reads entity state through the store ports,
//! delegates domain, snapshot and discard checks to validators from a
//! [`ValidatorFactory`], and stops at the first refusal:
//!
//! 1. Disk exists
//! 2. Disk kind is relocatable
//! 3. Owner and operation agree (template disks copy only, and not while locked)
//! 4. Not an OVF store
//! 5. Not locked
//! 6. Shareable disks stay off domains that reject them (move only)
//! 7. Source and destination domains exist, are active and within thresholds
//! 8. Source and destination differ
//! 9. Source holds the disk
//! 10. Destination does not hold the disk
//! 11. Every attached VM is down, or the attachment's snapshot state is clean
//! 12. Destination has room for the disk and its snapshot chain
//! 13. Discard passthrough survives the destination
//!
//! Nothing is written. Two concurrent validations of one disk may both pass;
//! serializing execution is the caller's job.

use tracing::{debug, info, instrument, warn};

use crate::{
    application::{
        ApplicationError,
        ports::{EntityReaders, ValidatorFactory},
    },
    domain::{
        DiskContentType, DiskImage, DomainError, DomainValidator as validator, FailureReason,
        ImageOperation, ImageStatus, RelocationRequest, StorageDomain, ValidationFailure,
        ValidationResult, capabilities,
    },
    error::{RelocatorError, RelocatorResult},
};

/// Why the pipeline stopped early.
enum Halt {
    Rejected(ValidationFailure),
    Fault(RelocatorError),
}

impl From<ValidationFailure> for Halt {
    fn from(failure: ValidationFailure) -> Self {
        Self::Rejected(failure)
    }
}

impl From<RelocatorError> for Halt {
    fn from(err: RelocatorError) -> Self {
        Self::Fault(err)
    }
}

impl From<ApplicationError> for Halt {
    fn from(err: ApplicationError) -> Self {
        Self::Fault(err.into())
    }
}

impl From<DomainError> for Halt {
    fn from(err: DomainError) -> Self {
        Self::Fault(err.into())
    }
}

type Step<T = ()> = Result<T, Halt>;

fn reject(reason: FailureReason, detail: impl Into<String>) -> Halt {
    Halt::Rejected(ValidationFailure::with_detail(reason, detail))
}

/// Validates disk move/copy requests.
pub struct RelocationService {
    readers: EntityReaders,
    validators: Box<dyn ValidatorFactory>,
}

impl RelocationService {
    /// Create a relocation service over the given readers and validators.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use relocator_core::application::{EngineValidators, RelocationService, StorageThresholds};
    ///
    /// let validators = EngineValidators::new(readers.clone(), StorageThresholds::default());
    /// let service = RelocationService::new(readers, Box::new(validators));
    /// ```
    pub fn new(readers: EntityReaders, validators: Box<dyn ValidatorFactory>) -> Self {
        Self {
            readers,
            validators,
        }
    }

    /// Decide whether `request` may start.
    ///
    /// A refusal is `Ok(ValidationResult::Invalid(..))`. `Err` means the
    /// request was malformed or a collaborator failed.
    #[instrument(
        skip_all,
        fields(
            disk = %request.disk_id,
            operation = %request.operation,
            source = %request.source_domain_id,
            dest = %request.dest_domain_id
        )
    )]
    pub fn validate(&self, request: &RelocationRequest) -> RelocatorResult<ValidationResult> {
        validator::validate_request(request)?;

        let verdict = match self.run(request) {
            Ok(()) => ValidationResult::Valid,
            Err(Halt::Rejected(failure)) => {
                warn!(reason = %failure.reason, detail = ?failure.detail, "Relocation refused");
                ValidationResult::Invalid(failure)
            }
            Err(Halt::Fault(err)) => return Err(err),
        };

        info!(verdict = %verdict, "Relocation validated");
        Ok(verdict)
    }

    fn run(&self, request: &RelocationRequest) -> Step {
        // 1-2. Existence and kind
        let image = self.load_image(request)?;

        // 3. Ownership
        self.check_ownership(request, &image)?;

        // 4. OVF store content
        if image.content_type == DiskContentType::OvfStore {
            return Err(reject(
                FailureReason::OvfDiskNotSupported,
                format!("disk '{}' is an OVF store", image.alias),
            ));
        }

        // 5. Lock
        if image.image_status == ImageStatus::Locked {
            return Err(reject(
                FailureReason::DisksLocked,
                format!("disk '{}' is locked", image.alias),
            ));
        }
        debug!("Disk state checks passed");

        let source = self
            .readers
            .storage_domains
            .get_for_pool(image.storage_pool_id, request.source_domain_id)?;
        let dest = self
            .readers
            .storage_domains
            .get_for_pool(image.storage_pool_id, request.dest_domain_id)?;

        // 6. Shareable disks
        self.check_shareable(request, &image, dest.as_ref())?;

        // 7. Domain health
        let source_checks = self.validators.storage_domain(source);
        let dest_checks = self.validators.storage_domain(dest);
        for checks in [&source_checks, &dest_checks] {
            checks.is_domain_exist_and_active().into_result()?;
            checks.is_domain_within_thresholds().into_result()?;
        }
        debug!("Storage domains healthy");

        // 8-10. Placement
        self.check_placement(request, &image)?;

        // 11. Attached VMs
        self.check_attached_vms(request)?;

        // 12. Space
        dest_checks
            .has_space_for_disk_with_snapshots(&image)
            .into_result()?;

        // 13. Discard passthrough
        self.check_pass_discard(request, &image)?;

        Ok(())
    }

    fn load_image(&self, request: &RelocationRequest) -> Step<DiskImage> {
        let Some(disk) = self.readers.disks.get_disk(request.disk_id)? else {
            return Err(reject(
                FailureReason::DiskNotExist,
                format!("disk {}", request.disk_id),
            ));
        };

        if !capabilities::is_relocatable_disk_kind(disk.storage_type) {
            return Err(reject(
                FailureReason::NotSupportedDiskStorageType,
                format!("disk '{}' is {}", disk.alias, disk.storage_type),
            ));
        }

        let Some(image) = self.readers.disks.get_disk_image(request.disk_id)? else {
            return Err(reject(
                FailureReason::DiskNotExist,
                format!("no image for disk '{}'", disk.alias),
            ));
        };
        validator::validate_disk_image(&disk, &image)?;
        Ok(image)
    }

    fn check_ownership(&self, request: &RelocationRequest, image: &DiskImage) -> Step {
        if !image.is_template_owned() {
            return Ok(());
        }
        if request.operation == ImageOperation::Move {
            return Err(reject(
                FailureReason::IsNotVmDisk,
                format!("disk '{}' belongs to a template", image.alias),
            ));
        }

        let template = self
            .readers
            .vms
            .get_template_for_image(image.id)?
            .ok_or(ApplicationError::TemplateNotFound { disk_id: image.id })?;

        if template.is_locked() || image.image_status == ImageStatus::Locked {
            return Err(reject(
                FailureReason::VmTemplateImageIsLocked,
                format!("template '{}'", template.name),
            ));
        }
        Ok(())
    }

    fn check_shareable(
        &self,
        request: &RelocationRequest,
        image: &DiskImage,
        dest: Option<&StorageDomain>,
    ) -> Step {
        if !request.is_move() || !image.shareable {
            return Ok(());
        }
        match dest {
            Some(sd) if !capabilities::accepts_shareable_disks(sd.storage_type) => Err(reject(
                FailureReason::CantMoveShareableDiskToGlusterfs,
                format!("destination '{}' is {}", sd.name, sd.storage_type),
            )),
            // A missing destination is reported by the domain health step.
            _ => Ok(()),
        }
    }

    fn check_placement(&self, request: &RelocationRequest, image: &DiskImage) -> Step {
        if request.source_domain_id == request.dest_domain_id {
            return Err(reject(
                FailureReason::SourceAndTargetSame,
                format!("domain {}", request.source_domain_id),
            ));
        }
        if !image.is_in_domain(request.source_domain_id) {
            return Err(reject(
                FailureReason::SourceStorageDomainDoesContainsTheDisk,
                format!("domain {}", request.source_domain_id),
            ));
        }
        if image.is_in_domain(request.dest_domain_id) {
            return Err(reject(
                FailureReason::DestinationStorageDomainAlreadyContainsTheDisk,
                format!("domain {}", request.dest_domain_id),
            ));
        }
        Ok(())
    }

    fn check_attached_vms(&self, request: &RelocationRequest) -> Step {
        let attached = self.readers.vms.get_vms_with_attachment(request.disk_id)?;
        if attached.is_empty() {
            return Ok(());
        }

        let snapshots = self.validators.snapshots();
        for (vm, device) in &attached {
            // Only a live attachment needs the VM powered off.
            if !device.is_snapshot_attachment() && !vm.status.is_down() {
                return Err(reject(
                    FailureReason::VmIsNotDown,
                    format!("vm '{}' is {}", vm.name, vm.status),
                ));
            }
            snapshots.vm_not_in_preview(vm.id)?.into_result()?;
            snapshots.vm_not_during_snapshot(vm.id)?.into_result()?;
        }
        debug!(vms = attached.len(), "Attached VMs checked");
        Ok(())
    }

    fn check_pass_discard(&self, request: &RelocationRequest, image: &DiskImage) -> Step {
        if !request.is_move() && !image.is_template_owned() {
            debug!("Copy of a VM disk, discard passthrough not applicable");
            return Ok(());
        }

        let elements = self
            .readers
            .disk_vm_elements
            .get_all_for_disk(request.disk_id)?;
        if elements.is_empty() {
            debug!("Floating disk, discard passthrough not applicable");
            return Ok(());
        }

        self.validators
            .disk_vm_elements(image, elements)
            .is_pass_discard_supported_for_dest_sd(request.dest_domain_id)?
            .into_result()?;
        Ok(())
    }
}
