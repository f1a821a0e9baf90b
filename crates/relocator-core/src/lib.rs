//! Relocator Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for deciding
//! whether a virtual disk may be moved or copied between storage domains,
//! following hexagonal (ports and adapters) architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │          relocator-cli (CLI)            │
//! │     (Implements Driving Ports)          │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │   (RelocationService, QueryService)     │
//! │   Validators: StorageDomain, Snapshots, │
//! │            DiskVmElement                │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │  (DiskStore, StorageDomainStore, ...)   │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │   relocator-adapters (Infrastructure)   │
//! │  (InMemoryInventory, inventory loader)  │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Domain Layer (Pure Logic)       │
//! │  (DiskImage, StorageDomain, reasons,    │
//! │         capability tables)              │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use relocator_core::prelude::*;
//!
//! // 1. Wire readers (any type implementing every store port)
//! let readers = EntityReaders::from_shared(inventory);
//!
//! // 2. Build the pipeline with the default validators
//! let validators = EngineValidators::new(readers.clone(), StorageThresholds::default());
//! let service = RelocationService::new(readers, Box::new(validators));
//!
//! // 3. Ask
//! let request = RelocationRequest::new(disk, source, dest, ImageOperation::Move);
//! match service.validate(&request)? {
//!     ValidationResult::Valid => println!("ok"),
//!     ValidationResult::Invalid(why) => println!("refused: {why}"),
//! }
//! ```

// Re-export domain layer (stable, well-defined API)
pub mod domain;

// Re-export application layer (orchestration logic)
pub mod application;

// Re-export error types
pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        EngineValidators, EntityReaders, ExecutionContext, QueryParameters, QueryService,
        QueryType, RelocationService, StorageThresholds,
        ports::{DiskStore, DiskVmElementStore, SnapshotStore, StorageDomainStore, VmStore},
    };
    pub use crate::domain::{
        Disk, DiskImage, DiskVmElement, FailureReason, Guid, ImageOperation, RelocationRequest,
        Snapshot, StorageDomain, ValidationFailure, ValidationResult, Vm, VmDevice, VmTemplate,
    };
    pub use crate::error::{RelocatorError, RelocatorResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
