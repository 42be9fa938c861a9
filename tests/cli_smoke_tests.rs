//! Smoke tests for the sextant binary
//!
//! Exercise the CLI end to end: exit codes, report writing, and the
//! config-error contract (bad root -> non-zero exit, nothing emitted).

use std::fs;
use std::process::Command;
use tempfile::TempDir;

fn sextant_bin() -> String {
    env!("CARGO_BIN_EXE_sextant").to_string()
}

#[test]
fn test_scan_writes_json_report_and_exits_zero() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join("node.cpp"),
        "class Probe : public INode {};\nbus->registerListener(p);\n",
    )
    .unwrap();
    let out_path = temp_dir.path().join("report.json");

    let output = Command::new(sextant_bin())
        .arg("scan")
        .arg("--root")
        .arg(temp_dir.path())
        .arg("--format")
        .arg("json")
        .arg("--output")
        .arg(&out_path)
        .output()
        .expect("failed to run sextant");

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let report: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&out_path).unwrap()).unwrap();
    assert_eq!(report["tool"], "sextant");
    let symbols = report["graph"]["symbols"].as_array().unwrap();
    assert!(symbols.iter().any(|s| s["key"] == "Probe"));
}

#[test]
fn test_scan_missing_root_exits_nonzero() {
    let output = Command::new(sextant_bin())
        .arg("scan")
        .arg("--root")
        .arg("/nonexistent/sextant/root")
        .output()
        .expect("failed to run sextant");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("root path does not exist"));
    assert!(
        output.stdout.is_empty(),
        "nothing partial may be emitted on a config error"
    );
}

#[test]
fn test_scan_markdown_goes_to_stdout() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("a.cpp"), "// NOTE hi\n").unwrap();

    let output = Command::new(sextant_bin())
        .arg("scan")
        .arg("--root")
        .arg(temp_dir.path())
        .output()
        .expect("failed to run sextant");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("# Cross-reference report"));
    assert!(stdout.contains("## Uncorrelated matches (1)"));
}

#[test]
fn test_rules_command_lists_builtin_rules() {
    let output = Command::new(sextant_bin())
        .arg("rules")
        .output()
        .expect("failed to run sextant");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("class-decl"));
    assert!(stdout.contains("annotation-line"));
}

#[test]
fn test_unknown_command_prints_usage_and_exits_2() {
    let output = Command::new(sextant_bin())
        .arg("frobnicate")
        .output()
        .expect("failed to run sextant");

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Unknown command"));
    assert!(stderr.contains("Usage:"));
}

#[test]
fn test_version_flag() {
    let output = Command::new(sextant_bin())
        .arg("--version")
        .output()
        .expect("failed to run sextant");

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).starts_with("sextant "));
}
