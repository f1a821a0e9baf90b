//! Command handlers. One module per subcommand.

use tracing::{debug, instrument};

use relocator_adapters::{InMemoryInventory, InventoryLoader};
use relocator_core::application::{EngineValidators, RelocationService};

use crate::{
    cli::GlobalArgs,
    config::AppConfig,
    error::{CliError, CliResult},
};

pub mod completions;
pub mod config;
pub mod init;
pub mod list;
pub mod query;
pub mod validate;

/// Load the inventory named by `--inventory`, falling back to `inventory.path`.
#[instrument(skip_all)]
pub(crate) fn load_inventory(global: &GlobalArgs, config: &AppConfig) -> CliResult<InMemoryInventory> {
    let path = global
        .inventory
        .clone()
        .or_else(|| config.inventory.path.clone())
        .ok_or_else(|| CliError::ConfigError {
            message: "no inventory configured".into(),
            source: None,
        })?;

    debug!(path = %path.display(), "Loading inventory");
    Ok(InventoryLoader::new(path).load()?)
}

/// The relocation pipeline wired to `inventory` with the configured thresholds.
pub(crate) fn relocation_service(inventory: &InMemoryInventory, config: &AppConfig) -> RelocationService {
    let readers = inventory.readers();
    let validators = EngineValidators::new(readers.clone(), config.thresholds);
    RelocationService::new(readers, Box::new(validators))
}
