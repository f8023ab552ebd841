//! File-level orchestration of a compaction run.

use std::fs;
use std::path::PathBuf;

use tracing::{info, warn};

use crate::config::Config;
use crate::error::CompactError;
use crate::files::{backup, output};
use crate::pipeline::{self, Report};

/// Per-run switches that are not part of the persistent config.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Continue when the backup cannot be written
    pub force: bool,
    /// Compact in memory only; no backup, no output
    pub dry_run: bool,
}

/// Outcome of a successful run.
#[derive(Debug, Clone)]
pub struct Summary {
    pub report: Report,
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    /// Backup written during this run, if any
    pub backup_path: Option<PathBuf>,
    /// Backup that was attempted but failed (only with `force`)
    pub backup_error: Option<String>,
    pub input_bytes: usize,
    pub output_bytes: usize,
    pub written: bool,
}

impl Summary {
    /// Bytes saved by the compaction (negative if the output grew).
    pub fn saved_bytes(&self) -> i64 {
        self.input_bytes as i64 - self.output_bytes as i64
    }
}

/// Runs the pipeline against the files named in a [`Config`].
pub struct Compactor {
    config: Config,
}

impl Compactor {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Read, compact, back up and write.
    ///
    /// Nothing is written unless the input parses into a non-empty table. The
    /// output is only written after the backup succeeded, unless the backup is
    /// disabled, not required, or `force` is set.
    pub fn run(&self, options: RunOptions) -> Result<Summary, CompactError> {
        let input_path = self.config.paths.input.clone();
        let output_path = self.config.paths.output.clone();

        if !input_path.exists() {
            return Err(CompactError::InputNotFound { path: input_path });
        }

        info!("Reading {}", input_path.display());
        let source = fs::read_to_string(&input_path).map_err(|source| CompactError::ReadFailure {
            path: input_path.clone(),
            source,
        })?;

        let compaction = pipeline::compact(&source, &self.config.compact_options())?;
        info!(
            "Scanned {} entries in {}[]",
            compaction.report.original_entries, compaction.report.table_name
        );

        let mut summary = Summary {
            input_bytes: source.len(),
            output_bytes: compaction.output.len(),
            report: compaction.report,
            input_path,
            output_path,
            backup_path: None,
            backup_error: None,
            written: false,
        };

        if options.dry_run {
            info!("Dry run: {} left untouched", summary.output_path.display());
            return Ok(summary);
        }

        if self.config.backup.enabled {
            let backup_path = self.config.backup_path();
            match backup::create(&summary.input_path, &backup_path) {
                Ok(_) => {
                    info!("Backed up input to {}", backup_path.display());
                    summary.backup_path = Some(backup_path);
                }
                Err(source) if options.force || !self.config.backup.required => {
                    warn!(
                        "Backup to {} failed: {}; continuing without a backup",
                        backup_path.display(),
                        source
                    );
                    summary.backup_error = Some(source.to_string());
                }
                Err(source) => {
                    return Err(CompactError::BackupFailure {
                        path: backup_path,
                        source,
                    });
                }
            }
        }

        output::write_atomic(&summary.output_path, &compaction.output).map_err(|source| {
            CompactError::OutputWriteFailure {
                path: summary.output_path.clone(),
                source,
            }
        })?;
        summary.written = true;
        info!("Wrote {}", summary.output_path.display());

        Ok(summary)
    }
}
