//! Command-line argument parsing and handling.

use clap::{Parser, ValueEnum};

/// crewdesk - A headless table engine for browsing and bulk-editing CRM records
#[derive(Parser, Debug)]
#[command(name = "crewdesk")]
#[command(version)]
#[command(about = "Browse, filter, and bulk-edit CRM records from the command line", long_about = None)]
#[allow(clippy::struct_excessive_bools)]
pub struct Args {
    /// Dashboard module whose records to load
    #[arg(short, long, value_enum, default_value_t = Module::Team)]
    pub module: Module,

    /// Free-text search over the module's searchable columns
    #[arg(short, long)]
    pub search: Option<String>,

    /// Facet filter as COLUMN=VALUE (repeatable, e.g. --facet role="Super Admin")
    #[arg(short = 'f', long = "facet")]
    pub facets: Vec<String>,

    /// Column to sort by (e.g. name, email; defaults to id)
    #[arg(long)]
    pub sort: Option<String>,

    /// Sort descending instead of ascending
    #[arg(long)]
    pub desc: bool,

    /// 1-based page to show; clamped to the last page when too large
    #[arg(short, long, default_value_t = 1)]
    pub page: usize,

    /// Rows per page (10, 25, 50 or 100)
    #[arg(long)]
    pub page_size: Option<usize>,

    /// Record ids to select (repeatable)
    #[arg(long = "select")]
    pub select: Vec<String>,

    /// Delete the selected records before listing
    #[arg(long)]
    pub delete_selected: bool,

    /// Run the outbound call batch over the selected records before listing
    #[arg(long)]
    pub call_selected: bool,

    /// Serve local records instead of contacting the backend
    #[arg(long)]
    pub offline: bool,

    /// Set the logging level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

/// Dashboard module selectable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Module {
    /// Team member roster (`team_members` table)
    Team,
    /// Task board (`tasks` table)
    Tasks,
}
