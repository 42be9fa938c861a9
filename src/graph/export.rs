//! Report emission for a completed scan
//!
//! Three pure views over the same outcome:
//! - Markdown: documentation-style hierarchy, symbols then facet kinds
//! - CSV: flat audit listing of every raw match
//! - JSON: lossless structured dump for downstream tooling
//!
//! Every renderer is a pure function of the outcome and produces
//! byte-identical text for identical input: no timestamps, no execution
//! ids, no unseeded randomness in the rendered body. Writing the text to a
//! destination is the caller's side effect.

use anyhow::Result;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Write as _;

use crate::diagnostics::ScanWarning;
use crate::graph::{FacetKind, SymbolGraph};
use crate::scanner::Match;
use crate::ScanOutcome;

/// JSON report schema version
pub const SEXTANT_JSON_SCHEMA_VERSION: &str = "1.0.0";

/// Report format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    /// Hierarchical documentation view
    Markdown,
    /// Flat per-match audit view
    Csv,
    /// Structured machine-consumable dump
    Json,
}

impl ReportFormat {
    /// Parse from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "markdown" | "md" => Some(ReportFormat::Markdown),
            "csv" => Some(ReportFormat::Csv),
            "json" => Some(ReportFormat::Json),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReportFormat::Markdown => "markdown",
            ReportFormat::Csv => "csv",
            ReportFormat::Json => "json",
        }
    }
}

/// Render the outcome in the requested format
pub fn render(outcome: &ScanOutcome, format: ReportFormat) -> Result<String> {
    match format {
        ReportFormat::Markdown => Ok(render_markdown(outcome)),
        ReportFormat::Csv => render_csv(outcome),
        ReportFormat::Json => render_json(outcome),
    }
}

fn render_attributes(attributes: &BTreeMap<String, String>) -> String {
    attributes
        .iter()
        .map(|(k, v)| format!("{}=`{}`", k, v))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Documentation-style view: facets grouped by symbol, then by facet kind,
/// in facet order within each group.
pub fn render_markdown(outcome: &ScanOutcome) -> String {
    let graph = &outcome.graph;
    let mut out = String::new();

    let _ = writeln!(out, "# Cross-reference report");
    let _ = writeln!(out);
    let _ = writeln!(out, "## Symbols ({})", graph.symbols().len());

    for symbol in graph.symbols() {
        let _ = writeln!(out);
        let _ = writeln!(out, "### `{}`", symbol.key);
        for kind in FacetKind::ALL {
            let facets: Vec<_> = symbol.facets.iter().filter(|f| f.kind == kind).collect();
            if facets.is_empty() {
                continue;
            }
            let _ = writeln!(out);
            let _ = writeln!(out, "#### {}", kind.as_str());
            let _ = writeln!(out);
            for facet in facets {
                let attrs = render_attributes(&facet.attributes);
                if attrs.is_empty() {
                    let _ = writeln!(out, "- {}:{} ({})", facet.file, facet.line, facet.rule);
                } else {
                    let _ = writeln!(
                        out,
                        "- {}:{} ({}) {}",
                        facet.file, facet.line, facet.rule, attrs
                    );
                }
            }
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "## Uncorrelated matches ({})", graph.unmatched.len());
    if !graph.unmatched.is_empty() {
        let _ = writeln!(out);
        for m in &graph.unmatched {
            let attrs = render_attributes(&m.captured);
            if attrs.is_empty() {
                let _ = writeln!(out, "- {}:{} ({})", m.file, m.line, m.rule);
            } else {
                let _ = writeln!(out, "- {}:{} ({}) {}", m.file, m.line, m.rule, attrs);
            }
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "## Warnings ({})", outcome.warnings.len());
    if !outcome.warnings.is_empty() {
        let _ = writeln!(out);
        for w in &outcome.warnings {
            let _ = writeln!(out, "- {}", w);
        }
    }

    out
}

fn flatten_fields(captured: &BTreeMap<String, String>) -> String {
    captured
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Audit view: one row per raw match, warnings appended as rows with the
/// `warning` kind so the CSV stays a single table.
pub fn render_csv(outcome: &ScanOutcome) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["file", "line", "rule", "kind", "fields"])?;

    for m in &outcome.matches {
        writer.write_record(&[
            m.file.clone(),
            m.line.to_string(),
            m.rule.clone(),
            m.facet.as_str().to_string(),
            flatten_fields(&m.captured),
        ])?;
    }
    for w in &outcome.warnings {
        writer.write_record(&[
            w.subject.clone(),
            "0".to_string(),
            String::new(),
            "warning".to_string(),
            w.reason.clone(),
        ])?;
    }

    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8(bytes)?)
}

#[derive(Serialize)]
struct JsonReport<'a> {
    /// Schema version for parsing stability
    schema_version: &'static str,
    tool: &'static str,
    graph: &'a SymbolGraph,
    matches: &'a [Match],
    warnings: &'a [ScanWarning],
}

/// Machine view: the whole outcome, losslessly
pub fn render_json(outcome: &ScanOutcome) -> Result<String> {
    let report = JsonReport {
        schema_version: SEXTANT_JSON_SCHEMA_VERSION,
        tool: "sextant",
        graph: &outcome.graph,
        matches: &outcome.matches,
        warnings: &outcome.warnings,
    };
    let mut text = serde_json::to_string_pretty(&report)?;
    text.push('\n');
    Ok(text)
}
