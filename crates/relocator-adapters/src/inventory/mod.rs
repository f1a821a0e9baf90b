//! Inventory adapters: where entity snapshots come from.

mod loader;
mod memory;

pub use loader::{InventoryDocument, InventoryLoader, LoadError};
pub use memory::{InMemoryInventory, InventorySummary};
