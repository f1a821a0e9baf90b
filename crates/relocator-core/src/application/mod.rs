//! Application layer for relocator.
//!
//! This layer contains:
//! - **Services**: Use case orchestration (RelocationService, QueryService)
//! - **Ports**: Interface definitions (traits) for entity readers and validator roles
//! - **Validators**: The concrete validator roles and their default factory
//! - **Errors**: Application-specific error types
//!
//! The relocation rules themselves read domain facts through
//! `crate::domain::capabilities`; nothing here matches on storage types.

pub mod error;
pub mod ports;
pub mod services;
pub mod validators;

// Re-export main services
pub use services::{
    ExecutionContext, QueryParameters, QueryReturnValue, QueryService, QueryType, QueryValue,
    RelocationService,
};

// Re-export port traits (for adapter implementation)
pub use ports::{
    DiskStore, DiskVmElementStore, EntityReaders, SnapshotStore, StorageDomainStore,
    ValidatorFactory, VmStore,
};

pub use validators::{EngineValidators, StorageThresholds};

pub use error::ApplicationError;
