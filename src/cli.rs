//! Command-line interface definition.
//!
//! Lives in the library so `xtask` can render the man page from it.

use std::path::PathBuf;
use std::sync::OnceLock;

use clap::{ArgAction, Args, Parser, Subcommand};
use clap_complete::Shell;

use crate::config::Config;
use crate::runner::RunOptions;

/// Short version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Version with build metadata, e.g. `0.1.0 (1a2b3c4 2026-01-31)`.
pub fn long_version() -> &'static str {
    static LONG_VERSION: OnceLock<String> = OnceLock::new();
    LONG_VERSION.get_or_init(|| {
        let date = env!("HZK_BUILD_DATE");
        match option_env!("VERGEN_GIT_SHA") {
            Some(sha) if sha != "unknown" => {
                format!("{} ({} {})", VERSION, &sha[..sha.len().min(7)], date)
            }
            _ => format!("{} ({})", VERSION, date),
        }
    })
}

#[derive(Debug, Parser)]
#[command(
    name = "hzk-compact",
    version = VERSION,
    long_version = long_version(),
    about = "Remove duplicate glyphs from a generated HZK bitmap table and renumber the rest",
    long_about = "Remove duplicate glyphs from a generated HZK bitmap table and renumber the rest.\n\n\
        Entries with the same key and the same bitmap bytes (ignoring whitespace) are\n\
        collapsed to their first occurrence. Survivors keep their order and get\n\
        sequential indices in their /*\"<key>\",<index>*/ annotations. The input is\n\
        backed up before the output is written.",
    args_conflicts_with_subcommands = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub compact: CompactArgs,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only print errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print shell completions to stdout
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Debug, Default, Args)]
pub struct CompactArgs {
    /// Generated table to compact [default: Resources/Font/src/hzk16.c]
    pub input: Option<PathBuf>,

    /// Where to write the compacted table [default: Resources/Font/src/hzk16_optimized.c]
    pub output: Option<PathBuf>,

    /// Backup location [default: hzk16_original.bak next to OUTPUT]
    #[arg(long, value_name = "PATH")]
    pub backup: Option<PathBuf>,

    /// Do not back up the input
    #[arg(long, conflicts_with = "backup")]
    pub no_backup: bool,

    /// Write the output even if the backup fails
    #[arg(long)]
    pub force: bool,

    /// Name of the table array to compact [default: first table in the file]
    #[arg(long, value_name = "NAME")]
    pub table: Option<String>,

    /// Read settings from this TOML file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Report what would change without writing anything
    #[arg(long)]
    pub dry_run: bool,
}

impl CompactArgs {
    /// Apply command-line overrides on top of a loaded config.
    pub fn apply(&self, mut config: Config) -> Config {
        if let Some(input) = &self.input {
            config.paths.input = input.clone();
        }
        if let Some(output) = &self.output {
            config.paths.output = output.clone();
        }
        if let Some(backup) = &self.backup {
            config.paths.backup = Some(backup.clone());
        }
        if self.no_backup {
            config.backup.enabled = false;
        }
        if let Some(table) = &self.table {
            config.table.name = Some(table.clone());
        }
        config
    }

    pub fn run_options(&self) -> RunOptions {
        RunOptions {
            force: self.force,
            dry_run: self.dry_run,
        }
    }
}
