//! Infrastructure adapters for Relocator.
//!
//! This crate implements the store ports defined in
//! `relocator-core::application::ports`. It owns all file I/O.

pub mod inventory;

// Re-export commonly used adapters
pub use inventory::{InMemoryInventory, InventoryDocument, InventoryLoader, InventorySummary, LoadError};
