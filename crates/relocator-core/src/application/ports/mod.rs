//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `relocator-adapters` implement
//! the store ports.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by application, implemented by infrastructure
//!   - `DiskStore`, `StorageDomainStore`, `VmStore`, `SnapshotStore`,
//!     `DiskVmElementStore`: read-only entity snapshots
//!
//! - **Validator Roles**: Called by the relocation pipeline, implemented in
//!   `crate::application::validators` and obtained from a `ValidatorFactory`

pub mod output;
pub mod validators;

pub use output::{
    DiskStore, DiskVmElementStore, EntityReaders, SnapshotStore, StorageDomainStore, VmStore,
};
pub use validators::{DiskVmElementChecks, SnapshotChecks, StorageDomainChecks, ValidatorFactory};
