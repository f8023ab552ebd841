//! Integration tests for the hzk-compact binary.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

use crate::helpers::{fixtures_dir, load_fixture};

/// hzk-compact command with colors off and logging at defaults.
fn hzk() -> Command {
    let mut cmd = Command::cargo_bin("hzk-compact").expect("binary should build");
    cmd.env("NO_COLOR", "1").env_remove("RUST_LOG");
    cmd
}

/// Copy the generated fixture into a fresh temp directory.
fn workspace() -> (TempDir, std::path::PathBuf) {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("hzk16.c");
    fs::write(&input, load_fixture("hzk16.c")).unwrap();
    (dir, input)
}

fn path_arg(path: &Path) -> &str {
    path.to_str().unwrap()
}

// ============================================================================
// Help Output Tests
// ============================================================================

#[test]
fn help_exits_0_and_shows_usage() {
    hzk()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("[INPUT]"))
        .stdout(predicate::str::contains("[OUTPUT]"))
        .stdout(predicate::str::contains("--force"))
        .stdout(predicate::str::contains("completions"));
}

#[test]
fn version_flag_prints_version() {
    hzk()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with(format!(
            "hzk-compact {}",
            env!("CARGO_PKG_VERSION")
        )));
}

#[test]
fn completions_for_bash() {
    hzk()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("hzk-compact"));
}

// ============================================================================
// Compaction Tests
// ============================================================================

#[test]
fn compacts_fixture_and_prints_summary() {
    let (dir, input) = workspace();
    let output = dir.path().join("out/hzk16_optimized.c");

    hzk()
        .args([path_arg(&input), path_arg(&output)])
        .assert()
        .success()
        .stdout(predicate::str::contains("Compaction complete"))
        .stdout(predicate::str::contains("11 -> 8"))
        .stdout(predicate::str::contains("3 removed"))
        .stdout(predicate::str::contains("removed duplicate '京'"))
        .stdout(predicate::str::contains("diff "));

    let written = fs::read_to_string(&output).unwrap();
    let expected = hzk_compact::compact(
        &load_fixture("hzk16.c"),
        &hzk_compact::CompactOptions::default(),
    )
    .unwrap()
    .output;
    assert_eq!(written, expected);

    let backup = dir.path().join("out/hzk16_original.bak");
    assert_eq!(fs::read_to_string(backup).unwrap(), load_fixture("hzk16.c"));
}

#[test]
fn custom_backup_path_is_used() {
    let (dir, input) = workspace();
    let output = dir.path().join("optimized.c");
    let backup = dir.path().join("bak/original.c");

    hzk()
        .args([path_arg(&input), path_arg(&output), "--backup", path_arg(&backup)])
        .assert()
        .success();

    assert!(backup.exists());
    assert!(!dir.path().join("hzk16_original.bak").exists());
}

#[test]
fn dry_run_writes_nothing() {
    let (dir, input) = workspace();
    let output = dir.path().join("optimized.c");

    hzk()
        .args([path_arg(&input), path_arg(&output), "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Dry run"));

    assert!(!output.exists());
    assert!(!dir.path().join("hzk16_original.bak").exists());
}

#[test]
fn quiet_prints_nothing_on_success() {
    let (dir, input) = workspace();
    let output = dir.path().join("optimized.c");

    hzk()
        .args([path_arg(&input), path_arg(&output), "--quiet"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    assert!(output.exists());
}

#[test]
fn config_file_supplies_paths() {
    let (dir, input) = workspace();
    let output = dir.path().join("from_config.c");
    let config = dir.path().join("hzk-compact.toml");
    fs::write(
        &config,
        format!(
            "[paths]\ninput = {:?}\noutput = {:?}\n\n[backup]\nenabled = false\n",
            path_arg(&input),
            path_arg(&output)
        ),
    )
    .unwrap();

    hzk()
        .args(["--config", path_arg(&config)])
        .assert()
        .success();

    assert!(output.exists());
    assert!(!dir.path().join("hzk16_original.bak").exists());
}

// ============================================================================
// Error Handling Tests
// ============================================================================

#[test]
fn missing_input_exits_1() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("out.c");

    hzk()
        .args(["/nonexistent/hzk16.c", path_arg(&output)])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Input file not found"))
        .stderr(predicate::str::contains("/nonexistent/hzk16.c"));

    assert!(!output.exists());
}

#[test]
fn empty_table_exits_1_without_output() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("empty.c");
    let output = dir.path().join("out.c");
    fs::write(&input, "const HZK_16_t HZK_16[] = {\n};\n").unwrap();

    hzk()
        .args([path_arg(&input), path_arg(&output)])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Malformed table"));

    assert!(!output.exists());
    assert!(!dir.path().join("hzk16_original.bak").exists());
}

#[test]
fn parse_error_shows_position() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("broken.c");
    let output = dir.path().join("out.c");
    fs::write(
        &input,
        "const HZK_16_t HZK_16[] = {\n    {\"a\", {0x01}, /*\"a\"*/},\n};\n",
    )
    .unwrap();

    hzk()
        .args([path_arg(&input), path_arg(&output)])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("compacting"))
        .stderr(predicate::str::contains("line 2, column 19"));

    assert!(!output.exists());
}

#[test]
fn crlf_table_with_footer_notes_is_compacted() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("hzk16.c");
    let output = dir.path().join("out.c");
    let src = load_fixture("hzk16.c").replace('\n', "\r\n")
        + "#if 0\r\nDon't edit by hand\r\n#endif\r\n";
    fs::write(&input, &src).unwrap();

    hzk()
        .args([path_arg(&input), path_arg(&output)])
        .assert()
        .success()
        .stdout(predicate::str::contains("11 -> 8"));

    let written = fs::read_to_string(&output).unwrap();
    assert_eq!(written.matches('\n').count(), written.matches("\r\n").count());
    assert!(written.ends_with("#if 0\r\nDon't edit by hand\r\n#endif\r\n"));
}

#[test]
fn backup_failure_blocks_write_unless_forced() {
    let (dir, input) = workspace();
    let output = dir.path().join("optimized.c");
    let blocker = dir.path().join("blocker");
    fs::write(&blocker, "").unwrap();
    let backup = blocker.join("original.bak");

    hzk()
        .args([path_arg(&input), path_arg(&output), "--backup", path_arg(&backup)])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to back up"));
    assert!(!output.exists());

    hzk()
        .args([
            path_arg(&input),
            path_arg(&output),
            "--backup",
            path_arg(&backup),
            "--force",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("backup skipped"));
    assert!(output.exists());
}

#[test]
fn conflicting_backup_flags_are_rejected() {
    hzk()
        .args(["--no-backup", "--backup", "x.bak"])
        .assert()
        .code(2);
}

#[test]
fn fixtures_dir_exists() {
    assert!(fixtures_dir().join("hzk16.c").exists());
}
