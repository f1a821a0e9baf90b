//! Snapshot state checks: a VM previewing or taking a snapshot blocks relocation.

use std::sync::Arc;

use crate::application::ports::{SnapshotChecks, SnapshotStore};
use crate::domain::{FailureReason, Guid, SnapshotStatus, ValidationResult};
use crate::error::RelocatorResult;

/// Snapshot state checks over a [`SnapshotStore`].
pub struct SnapshotsValidator {
    snapshots: Arc<dyn SnapshotStore>,
}

impl SnapshotsValidator {
    pub fn new(snapshots: Arc<dyn SnapshotStore>) -> Self {
        Self { snapshots }
    }

    fn any_with_status(&self, vm_id: Guid, status: SnapshotStatus) -> RelocatorResult<Option<Guid>> {
        Ok(self
            .snapshots
            .get_all_for_vm(vm_id)?
            .into_iter()
            .find(|s| s.status == status)
            .map(|s| s.id))
    }
}

impl SnapshotChecks for SnapshotsValidator {
    fn vm_not_in_preview(&self, vm_id: Guid) -> RelocatorResult<ValidationResult> {
        Ok(match self.any_with_status(vm_id, SnapshotStatus::InPreview)? {
            Some(snapshot) => ValidationResult::fail_with(
                FailureReason::VmInPreview,
                format!("vm {vm_id} is previewing snapshot {snapshot}"),
            ),
            None => ValidationResult::Valid,
        })
    }

    fn vm_not_during_snapshot(&self, vm_id: Guid) -> RelocatorResult<ValidationResult> {
        Ok(match self.any_with_status(vm_id, SnapshotStatus::Locked)? {
            Some(snapshot) => ValidationResult::fail_with(
                FailureReason::VmIsDuringSnapshot,
                format!("snapshot {snapshot} of vm {vm_id} is locked"),
            ),
            None => ValidationResult::Valid,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::output::MockSnapshotStore;
    use crate::domain::{Snapshot, SnapshotType};
    use mockall::predicate::eq;

    fn snapshot(status: SnapshotStatus) -> Snapshot {
        Snapshot {
            id: Guid::new_random(),
            vm_id: Guid::from_u128(7),
            snapshot_type: SnapshotType::Regular,
            status,
            description: String::new(),
        }
    }

    fn validator_over(snapshots: Vec<Snapshot>) -> SnapshotsValidator {
        let mut store = MockSnapshotStore::new();
        store
            .expect_get_all_for_vm()
            .with(eq(Guid::from_u128(7)))
            .returning(move |_| Ok(snapshots.clone()));
        SnapshotsValidator::new(Arc::new(store))
    }

    #[test]
    fn preview_snapshot_blocks() {
        let v = validator_over(vec![
            snapshot(SnapshotStatus::Ok),
            snapshot(SnapshotStatus::InPreview),
        ]);
        assert_eq!(
            v.vm_not_in_preview(Guid::from_u128(7)).unwrap().reason(),
            Some(FailureReason::VmInPreview)
        );
        assert!(v.vm_not_during_snapshot(Guid::from_u128(7)).unwrap().is_valid());
    }

    #[test]
    fn locked_snapshot_blocks() {
        let v = validator_over(vec![snapshot(SnapshotStatus::Locked)]);
        assert_eq!(
            v.vm_not_during_snapshot(Guid::from_u128(7)).unwrap().reason(),
            Some(FailureReason::VmIsDuringSnapshot)
        );
        assert!(v.vm_not_in_preview(Guid::from_u128(7)).unwrap().is_valid());
    }

    #[test]
    fn no_snapshots_is_valid() {
        let v = validator_over(vec![]);
        assert!(v.vm_not_in_preview(Guid::from_u128(7)).unwrap().is_valid());
        assert!(v.vm_not_during_snapshot(Guid::from_u128(7)).unwrap().is_valid());
    }
}
