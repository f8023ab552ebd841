//! Default command: compact the configured table and print a summary.

use anyhow::{Context, Result};
use humansize::{format_size, BINARY};
use unicode_width::UnicodeWidthStr;

use hzk_compact::cli::CompactArgs;
use hzk_compact::theme::{current_theme, Theme};
use hzk_compact::{Compactor, Config, Summary};

/// Width of the summary rule lines.
const RULE_WIDTH: usize = 50;

/// Run a compaction with the given arguments.
#[cfg(not(tarpaulin_include))]
pub fn handle(args: &CompactArgs, quiet: bool) -> Result<()> {
    let config = args.apply(Config::load(args.config.as_deref()).context("loading config")?);
    let input = config.paths.input.clone();
    let summary = Compactor::new(config)
        .run(args.run_options())
        .with_context(|| format!("compacting {}", input.display()))?;

    if !quiet {
        print!("{}", render_summary(&summary, &current_theme()));
    }
    Ok(())
}

/// Pad `text` with spaces to `width` terminal columns.
fn pad(text: &str, width: usize) -> String {
    let shown = UnicodeWidthStr::width(text);
    format!("{}{}", text, " ".repeat(width.saturating_sub(shown)))
}

fn render_summary(summary: &Summary, theme: &Theme) -> String {
    let report = &summary.report;
    let mut out = String::new();

    out.push_str(&theme.primary_text(&format!(
        "Scanned {} entries in {}[] from {}",
        report.original_entries,
        report.table_name,
        summary.input_path.display()
    )));
    out.push('\n');

    let key_width = report
        .duplicates
        .iter()
        .map(|d| UnicodeWidthStr::width(d.key.as_str()) + 2)
        .max()
        .unwrap_or(0);
    for dup in &report.duplicates {
        out.push_str(&theme.secondary_text(&format!(
            "  removed duplicate {} hash {}  index {:<4} line {} (same as line {})",
            pad(&format!("'{}'", dup.key), key_width),
            dup.fingerprint.short(),
            dup.old_index,
            dup.position.line,
            dup.kept_at.line
        )));
        out.push('\n');
    }

    for mismatch in &report.mismatches {
        out.push_str(&theme.warning_text(&format!(
            "  annotation mismatch: '{}' at line {} is annotated as '{}', index {} kept (expected {})",
            mismatch.key,
            mismatch.position.line,
            mismatch.annotation_key,
            mismatch.old_index,
            mismatch.new_index
        )));
        out.push('\n');
    }

    if let Some(error) = &summary.backup_error {
        out.push_str(&theme.warning_text(&format!("  backup skipped: {}", error)));
        out.push('\n');
    }

    let saved = summary.saved_bytes();
    let delta = if saved >= 0 {
        format!("saved {}", format_size(saved as u64, BINARY))
    } else {
        format!("grew by {}", format_size(saved.unsigned_abs(), BINARY))
    };

    let rule = "=".repeat(RULE_WIDTH);
    out.push_str(&rule);
    out.push('\n');
    let headline = if summary.written {
        "Compaction complete"
    } else {
        "Dry run: nothing written"
    };
    out.push_str(&theme.success_text(headline));
    out.push('\n');
    let rows = [
        (
            "Entries:",
            format!("{} -> {}", report.original_entries, report.retained_entries),
        ),
        ("Duplicates:", format!("{} removed", report.duplicates_removed())),
        (
            "Mismatches:",
            format!("{} annotation(s) left unchanged", report.mismatches.len()),
        ),
        (
            "Size:",
            format!(
                "{} -> {} ({})",
                format_size(summary.input_bytes as u64, BINARY),
                format_size(summary.output_bytes as u64, BINARY),
                delta
            ),
        ),
        ("Output:", summary.output_path.display().to_string()),
    ];
    for (label, value) in rows {
        out.push_str(&format!("{} {}\n", pad(label, 12), value));
    }
    if let (true, Some(backup)) = (summary.written, &summary.backup_path) {
        out.push_str(&format!(
            "{} diff {} {}\n",
            pad("Verify:", 12),
            backup.display(),
            summary.output_path.display()
        ));
    }
    out.push_str(&rule);
    out.push('\n');
    out
}
