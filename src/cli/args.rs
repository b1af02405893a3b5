//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum, ValueHint};

/// Hierarchical quantity ledger: proportional allocation down a tree, recalculated totals up
#[derive(Parser, Debug)]
#[command(name = "alloctree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug output (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub debug: u8,

    /// Seed forest (TOML); overrides the configured seed_file
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath, env = "ALLOCTREE_SEED")]
    pub seed: Option<PathBuf>,

    /// Directory holding a local .alloctree.toml (default: cwd)
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::DirPath)]
    pub config_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the ledger with variance and grand total
    Show {
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Tree)]
        format: OutputFormat,
    },

    /// Set a node to a value, spreading it over its subtree
    Set {
        /// Node id
        id: String,
        /// New value
        #[arg(allow_hyphen_values = true)]
        value: String,
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Tree)]
        format: OutputFormat,
    },

    /// Scale a node by a percentage, spreading it over its subtree
    Percent {
        /// Node id
        id: String,
        /// Percentage (negative to shrink)
        #[arg(allow_hyphen_values = true)]
        percent: String,
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Tree)]
        format: OutputFormat,
    },

    /// Apply a sequence of edits: value:ID=AMOUNT or percent:ID=AMOUNT
    Apply {
        /// Edits, applied in order
        #[arg(num_args = 1.., required = true, allow_hyphen_values = true)]
        edits: Vec<String>,
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Tree)]
        format: OutputFormat,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,
    /// Show config paths
    Path,
    /// Print a commented config template
    Template,
}

/// How the ledger is printed.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// Indented tree with variance
    Tree,
    /// Nested TOML report
    Toml,
}
