//! Tests for externally configured rule sets
//!
//! The engine is rule-agnostic: these tests drive it with a rule set
//! written for a different language than the built-in one targets.

use std::fs;
use tempfile::TempDir;

use sextant::{run_scan, FacetKind, RuleSet, ScanConfig};

const RUST_RULES: &str = r#"{
    "rules": [
        {
            "name": "fn-decl",
            "facet": "declaration",
            "scope": "line",
            "pattern": "\\bfn\\s+(?P<name>[A-Za-z_]\\w*)\\s*\\(",
            "fields": ["name"],
            "key": "name"
        },
        {
            "name": "spawn-call",
            "facet": "call_site",
            "scope": "line",
            "pattern": "\\b(?P<name>[A-Za-z_]\\w*)\\s*\\.\\s*spawn\\s*\\(",
            "fields": ["name"],
            "key": "name"
        }
    ],
    "extensions": ["rs"]
}"#;

#[test]
fn test_external_rule_set_drives_the_engine() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join("worker.rs"),
        "fn run_pool() {\n    pool.spawn(job);\n}\n",
    )
    .unwrap();
    // Wrong extension for this rule set: must be ignored entirely
    fs::write(temp_dir.path().join("ignored.cpp"), "fn decoy() {}\n").unwrap();

    let rules = RuleSet::from_json_str(RUST_RULES).unwrap();
    let outcome = run_scan(&ScanConfig::with_rules(temp_dir.path(), rules)).unwrap();

    let run_pool = outcome.graph.get("run_pool").expect("fn declaration");
    assert_eq!(run_pool.facets[0].kind, FacetKind::Declaration);

    let pool = outcome.graph.get("pool").expect("spawn call site");
    assert_eq!(pool.facets[0].kind, FacetKind::CallSite);

    assert!(
        !outcome.matches.iter().any(|m| m.file.ends_with("ignored.cpp")),
        "extension allow-list comes from the rule set"
    );
}

#[test]
fn test_rules_file_round_trips_through_disk() {
    let temp_dir = TempDir::new().unwrap();
    let rules_path = temp_dir.path().join("rules.json");
    fs::write(&rules_path, RUST_RULES).unwrap();

    let from_disk = RuleSet::from_json_file(&rules_path).unwrap();
    let from_str = RuleSet::from_json_str(RUST_RULES).unwrap();
    assert_eq!(from_disk, from_str);
}

#[test]
fn test_unparseable_rules_file_is_fatal() {
    let temp_dir = TempDir::new().unwrap();
    let rules_path = temp_dir.path().join("rules.json");
    fs::write(&rules_path, "{\"rules\": oops").unwrap();

    let err = RuleSet::from_json_file(&rules_path).unwrap_err();
    assert!(err.to_string().contains("invalid rules file"));
}

#[test]
fn test_missing_rules_file_is_fatal() {
    let err = RuleSet::from_json_file(std::path::Path::new("/nonexistent/rules.json"))
        .unwrap_err();
    assert!(err.to_string().contains("cannot read rules file"));
}

#[test]
fn test_cli_accepts_external_rules_file() {
    let temp_dir = TempDir::new().unwrap();
    let rules_path = temp_dir.path().join("rules.json");
    fs::write(&rules_path, RUST_RULES).unwrap();
    fs::write(temp_dir.path().join("lib.rs"), "fn entry() {}\n").unwrap();

    let output = std::process::Command::new(env!("CARGO_BIN_EXE_sextant"))
        .arg("scan")
        .arg("--root")
        .arg(temp_dir.path())
        .arg("--rules")
        .arg(&rules_path)
        .arg("--format")
        .arg("csv")
        .output()
        .expect("failed to run sextant");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.lines().any(|l| l.contains("fn-decl")));
}
