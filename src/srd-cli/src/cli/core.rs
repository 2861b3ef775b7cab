//! Core CLI definitions

use clap::{Args, Parser, Subcommand};
use srd::EntityKind;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "srd")]
#[command(about = "SRD rules data normalizer", long_about = None)]
pub struct Cli {
    /// More log output (-v debug, -vv trace). RUST_LOG takes precedence.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Database location shared by every command that touches the store
#[derive(Args, Debug, Clone, Default)]
pub struct DbArgs {
    /// Path to the SQLite database (falls back to config, then share/srd.db)
    #[arg(long, env = "SRD_DB")]
    pub db: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the database tables if they don't exist
    Init {
        #[command(flatten)]
        db: DbArgs,
    },

    /// Fetch every collection and upsert normalized rows
    #[command(visible_alias = "s")]
    Sync {
        #[command(flatten)]
        db: DbArgs,

        /// Base URL of the rules API
        #[arg(long, env = "SRD_BASE_URL")]
        base_url: Option<String>,

        /// Read documents from a local mirror instead of the API
        #[arg(long)]
        from_dir: Option<PathBuf>,

        /// Log progress every N items (0 disables)
        #[arg(long)]
        progress_every: Option<usize>,
    },

    /// Show row counts per table
    Stats {
        #[command(flatten)]
        db: DbArgs,
    },

    /// Show one stored row
    Show {
        /// Entity kind (monster, spell, class, race, weapon, armor)
        kind: EntityKind,

        /// Row slug (e.g. "goblin")
        slug: String,

        /// Print the row as JSON
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        db: DbArgs,
    },

    /// List stored rows of one kind
    #[command(visible_alias = "ls")]
    List {
        /// Entity kind (monster, spell, class, race, weapon, armor)
        kind: EntityKind,

        #[command(flatten)]
        db: DbArgs,
    },

    /// Configure default settings
    #[command(visible_alias = "c")]
    Configure {
        /// Set default API base URL
        #[arg(long)]
        base_url: Option<String>,

        /// Set default database path
        #[arg(long)]
        db: Option<PathBuf>,

        /// Set default progress interval
        #[arg(long)]
        progress_every: Option<usize>,

        /// Set HTTP timeout in seconds
        #[arg(long)]
        timeout_secs: Option<u64>,

        /// Show current configuration
        #[arg(long)]
        show: bool,
    },
}
