//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use clap::{Args, Parser, Subcommand, ValueEnum};

use relocator_core::application::QueryType;
use relocator_core::domain::{Guid, ImageOperation};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "relocator",
    bin_name = "relocator",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Check whether a disk may be moved or copied between storage domains",
    long_about = "Relocator runs the full set of move/copy checks for a virtual disk \
                  against an inventory of storage domains, disks and VMs, and reports \
                  the first reason the relocation would be refused.",
    after_help = "EXAMPLES:\n\
        \x20 relocator -i inventory.toml validate --disk <ID> --source <ID> --dest <ID>\n\
        \x20 relocator -i inventory/ validate --disk <ID> --source <ID> --dest <ID> --operation copy\n\
        \x20 relocator -i inventory.toml list domains --format json\n\
        \x20 relocator completions bash > /usr/share/bash-completion/completions/relocator",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Validate a move or copy request.
    #[command(
        visible_alias = "v",
        about = "Validate a disk move or copy",
        after_help = "EXAMPLES:\n\
            \x20 relocator validate --disk <ID> --source <ID> --dest <ID>\n\
            \x20 relocator validate -d <ID> -s <ID> -t <ID> -o copy\n\
            \x20 relocator --output-format json validate -d <ID> -s <ID> -t <ID>"
    )]
    Validate(ValidateArgs),

    /// List inventory records.
    #[command(
        visible_alias = "ls",
        about = "List storage domains, disks or VMs",
        after_help = "EXAMPLES:\n\
            \x20 relocator list domains\n\
            \x20 relocator list disks --format csv\n\
            \x20 relocator list vms --format json"
    )]
    List(ListArgs),

    /// Run a registered query through the permission gate.
    #[command(
        about = "Run an inventory query",
        after_help = "EXAMPLES:\n\
            \x20 relocator query get-disk-by-id --id <ID> --filtered\n\
            \x20 relocator query get-all-storage-domains --admin\n\
            \x20 relocator query get-relocation-verdict --disk <ID> --source <ID> --dest <ID> --filtered"
    )]
    Query(QueryArgs),

    /// Initialise a Relocator configuration file.
    #[command(
        about = "Initialise configuration",
        after_help = "EXAMPLES:\n\
            \x20 relocator init           # default location\n\
            \x20 relocator init --local   # .relocator.toml in CWD"
    )]
    Init(InitArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 relocator completions bash > ~/.local/share/bash-completion/completions/relocator\n\
            \x20 relocator completions zsh  > ~/.zfunc/_relocator\n\
            \x20 relocator completions fish > ~/.config/fish/completions/relocator.fish"
    )]
    Completions(CompletionsArgs),

    /// Inspect the Relocator configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 relocator config get thresholds.critical_space_action_blocker_gb\n\
            \x20 relocator config list\n\
            \x20 relocator config path"
    )]
    Config(ConfigCommands),
}

// ── validate ──────────────────────────────────────────────────────────────────

/// Arguments for `relocator validate`.
#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// Disk to relocate.
    #[arg(short = 'd', long = "disk", value_name = "ID", help = "Disk id")]
    pub disk: Guid,

    /// Domain the disk currently lives on.
    #[arg(
        short = 's',
        long = "source",
        value_name = "ID",
        help = "Source storage domain id"
    )]
    pub source: Guid,

    /// Domain the disk should end up on.
    #[arg(
        short = 't',
        long = "dest",
        visible_alias = "target",
        value_name = "ID",
        help = "Destination storage domain id"
    )]
    pub dest: Guid,

    #[arg(
        short = 'o',
        long = "operation",
        value_enum,
        default_value = "move",
        help = "Move or copy"
    )]
    pub operation: Operation,
}

/// Relocation kind as typed on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Operation {
    #[value(alias = "mv")]
    Move,
    #[value(alias = "cp")]
    Copy,
}

impl From<Operation> for ImageOperation {
    fn from(op: Operation) -> Self {
        match op {
            Operation::Move => ImageOperation::Move,
            Operation::Copy => ImageOperation::Copy,
        }
    }
}

// ── list ──────────────────────────────────────────────────────────────────────

/// Arguments for `relocator list`.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// What to list.
    #[arg(value_enum, help = "Record kind to list")]
    pub resource: Resource,

    /// Output format.
    #[arg(
        long = "format",
        value_enum,
        default_value = "table",
        help = "Output format"
    )]
    pub format: ListFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Resource {
    /// Storage domains.
    #[value(alias = "sd", alias = "storage-domains")]
    Domains,
    Disks,
    Vms,
}

/// Output format for the `list` command.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ListFormat {
    /// Human-readable table.
    Table,
    /// One name per line.
    List,
    /// JSON array.
    Json,
    /// CSV rows.
    Csv,
}

// ── query ─────────────────────────────────────────────────────────────────────

/// Arguments for `relocator query`.
#[derive(Debug, Args)]
pub struct QueryArgs {
    /// Query to run, e.g. `get-disk-by-id`.
    #[arg(value_name = "QUERY", help = "Query type (kebab-case or PascalCase)")]
    pub query_type: QueryType,

    /// Subject of id-keyed queries.
    #[arg(long = "id", value_name = "ID", help = "Entity id")]
    pub id: Option<Guid>,

    #[arg(long = "disk", value_name = "ID", help = "Disk id (verdict query)")]
    pub disk: Option<Guid>,

    #[arg(
        long = "source",
        value_name = "ID",
        help = "Source storage domain id (verdict query)"
    )]
    pub source: Option<Guid>,

    #[arg(
        long = "dest",
        value_name = "ID",
        help = "Destination storage domain id (verdict query)"
    )]
    pub dest: Option<Guid>,

    #[arg(
        long = "operation",
        value_enum,
        default_value = "move",
        help = "Move or copy (verdict query)"
    )]
    pub operation: Operation,

    /// Accept results filtered to what a regular user may see.
    #[arg(long = "filtered", help = "Run as a filtered (user-level) query")]
    pub filtered: bool,

    /// Run with administrator rights.
    #[arg(long = "admin", help = "Run as an administrator")]
    pub admin: bool,

    /// Run as the engine itself.
    #[arg(long = "internal", help = "Run as an internal execution")]
    pub internal: bool,
}

// ── init ──────────────────────────────────────────────────────────────────────

/// Arguments for `relocator init`.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Write to `.relocator.toml` in the current directory.
    #[arg(
        long = "local",
        help = "Create local configuration in current directory"
    )]
    pub local: bool,

    /// Overwrite an existing config file.
    #[arg(short = 'f', long = "force", help = "Overwrite existing configuration")]
    pub force: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `relocator completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `relocator config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `output.format`.
        key: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the active configuration file.
    Path,
}

// ── tests ─────────────────────────────────────────────────────────────────────
