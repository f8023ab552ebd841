//! hzk-compact command-line entry point.

mod commands;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use hzk_compact::cli::{Cli, Commands};
use hzk_compact::theme::error_theme;

/// Install the stderr log subscriber. `RUST_LOG` overrides the flags.
fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, _) => "debug",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("hzk_compact={}", level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Some(Commands::Completions { shell }) => commands::completions::handle(shell),
        None => commands::compact::handle(&cli.compact, cli.quiet),
    }
}

#[cfg(not(tarpaulin_include))]
fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    if let Err(e) = run(cli) {
        let theme = error_theme();
        eprintln!("{} {:#}", theme.error_text("Error:"), e);
        std::process::exit(1);
    }
}
