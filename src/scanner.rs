//! Rule application over file content
//!
//! The scanner reads each candidate file with lossy UTF-8 decoding (malformed
//! bytes are replaced, never fatal) and runs every compiled rule against it:
//! line-scope rules per physical line with 1-based line numbers, file-scope
//! rules against the whole content with the line recovered from the match
//! offset. A single line may yield multiple matches of different kinds.
//!
//! Files are independent of one another, so scanning is parallelized across
//! a rayon pool; the per-file batches are rejoined in walker order before
//! aggregation so concurrency never leaks into observable ordering.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::diagnostics::ScanWarning;
use crate::graph::FacetKind;
use crate::rules::{CompiledRule, CompiledRuleSet, RuleScope};

/// One occurrence of a rule's pattern. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    /// Name of the rule that produced this match
    pub rule: String,
    pub facet: FacetKind,
    pub file: String,
    /// 1-based; 0 means the match position within the file is not derivable
    pub line: usize,
    /// Captured fields, keyed by capture name. Only captures that
    /// participated in the match are present.
    pub captured: BTreeMap<String, String>,
}

/// Scan decoded content with every rule in the set.
///
/// Pure function of its inputs; `file` is only stamped into the produced
/// matches. Matches are ordered by line, with rule order preserved within a
/// line.
pub fn scan_content(file: &str, content: &str, rules: &CompiledRuleSet) -> Vec<Match> {
    let mut matches = Vec::new();

    for compiled in rules.rules() {
        match compiled.rule.scope {
            RuleScope::Line => {
                for (idx, line) in content.lines().enumerate() {
                    collect_matches(compiled, file, idx + 1, line, &mut matches);
                }
            }
            RuleScope::File => {
                for caps in compiled.regex.captures_iter(content) {
                    let offset = caps.get(0).map(|m| m.start()).unwrap_or(0);
                    matches.push(build_match(
                        compiled,
                        file,
                        line_of_offset(content, offset),
                        &caps,
                    ));
                }
            }
        }
    }

    // Normalize to file-scan order: ascending line, rule order within a
    // line preserved by sort stability.
    matches.sort_by_key(|m| m.line);
    matches
}

fn collect_matches(
    compiled: &CompiledRule,
    file: &str,
    line_number: usize,
    line: &str,
    out: &mut Vec<Match>,
) {
    for caps in compiled.regex.captures_iter(line) {
        out.push(build_match(compiled, file, line_number, &caps));
    }
}

fn build_match(
    compiled: &CompiledRule,
    file: &str,
    line: usize,
    caps: &regex::Captures<'_>,
) -> Match {
    let mut captured = BTreeMap::new();
    for field in &compiled.rule.fields {
        if let Some(value) = caps.name(field) {
            captured.insert(field.clone(), value.as_str().to_string());
        }
    }
    Match {
        rule: compiled.rule.name.clone(),
        facet: compiled.rule.facet,
        file: file.to_string(),
        line,
        captured,
    }
}

/// 1-based line containing the given byte offset
fn line_of_offset(content: &str, offset: usize) -> usize {
    content.as_bytes()[..offset.min(content.len())]
        .iter()
        .filter(|&&b| b == b'\n')
        .count()
        + 1
}

/// Scan one file from disk.
///
/// A read failure is downgraded to a warning naming the file; the run
/// continues with the next file.
pub fn scan_file(path: &Path, rules: &CompiledRuleSet) -> (Vec<Match>, Vec<ScanWarning>) {
    let file = path.to_string_lossy().to_string();
    match std::fs::read(path) {
        Ok(bytes) => {
            let content = String::from_utf8_lossy(&bytes);
            (scan_content(&file, &content, rules), Vec::new())
        }
        Err(e) => (Vec::new(), vec![ScanWarning::new(file, e.to_string())]),
    }
}

/// Scan many files in parallel.
///
/// Each worker produces a private match batch; the batches are rejoined in
/// the input (walker) order, so output is identical to a sequential scan.
pub fn scan_files(
    paths: &[std::path::PathBuf],
    rules: &CompiledRuleSet,
) -> (Vec<Match>, Vec<ScanWarning>) {
    let batches: Vec<(Vec<Match>, Vec<ScanWarning>)> = paths
        .par_iter()
        .map(|path| scan_file(path, rules))
        .collect();

    let mut matches = Vec::new();
    let mut warnings = Vec::new();
    for (batch, batch_warnings) in batches {
        matches.extend(batch);
        warnings.extend(batch_warnings);
    }
    (matches, warnings)
}
