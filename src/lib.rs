//! Sextant: a dumb, deterministic source-pattern cross-referencer
//!
//! Sextant walks a source tree, runs a rule set of anchored patterns over
//! every candidate file, and correlates the resulting matches into a symbol
//! graph: where each construct is declared, implemented, registered, and
//! called. It replaces a drawer of near-duplicate ad hoc scan scripts with
//! one engine and pluggable rule configuration.
//!
//! # Position Conventions
//!
//! - Line numbers are 1-indexed (line 1 is the first line)
//! - Line 0 is reserved for matches whose position is not derivable
//!   (whole-file matches)
//!
//! # Pipeline
//!
//! `Idle -> Walking -> Scanning -> Aggregating -> Emitting -> Done`, strictly
//! linear. Only configuration errors abort the run; unreadable files and
//! uncompilable rule patterns degrade to warnings carried in the outcome.
//! The engine is purely content-heuristic: matching tolerates false
//! positives and negatives by contract, and correlation is name-based only.

pub mod config;
pub mod diagnostics;
pub mod graph;
pub mod rules;
pub mod scanner;
pub mod version;
pub mod walker;

use anyhow::Result;

pub use config::{ConfigError, ScanConfig};
pub use diagnostics::ScanWarning;
pub use graph::{
    aggregate, render_csv, render_json, render_markdown, Facet, FacetKind, ReportFormat, Symbol,
    SymbolGraph,
};
pub use rules::{CompiledRuleSet, Rule, RuleScope, RuleSet};
pub use scanner::{scan_content, scan_file, scan_files, Match};
pub use walker::walk_files;

/// The complete result of one scan run.
///
/// Soft warnings are part of the value, not an error channel: the caller
/// decides severity. Raw matches are kept alongside the graph so the audit
/// view stays lossless.
#[derive(Debug, Clone)]
pub struct ScanOutcome {
    pub graph: SymbolGraph,
    pub matches: Vec<Match>,
    pub warnings: Vec<ScanWarning>,
}

/// Run the full pipeline for one configuration.
///
/// # Behavior
/// 1. Validate the config; a bad root or empty rule set aborts here with
///    nothing partial produced
/// 2. Compile the rule set; per-rule pattern failures become warnings
/// 3. Walk the root deterministically
/// 4. Scan files in parallel, with batches rejoined in walk order
/// 5. Aggregate the match stream into the symbol graph
///
/// # Guarantees
/// Two runs over identical filesystem state and config produce identical
/// outcomes, and every match is accounted for as exactly one facet or one
/// unmatched entry.
pub fn run_scan(config: &ScanConfig) -> Result<ScanOutcome> {
    config.validate()?;
    let (compiled, mut warnings) = config.rules.compile()?;

    let (files, walk_warnings) = walk_files(&config.root, compiled.extensions());
    warnings.extend(walk_warnings);

    let (matches, scan_warnings) = scan_files(&files, &compiled);
    warnings.extend(scan_warnings);

    let graph = aggregate(&matches, &compiled);
    debug_assert!(graph.accounts_for(matches.len()));

    Ok(ScanOutcome {
        graph,
        matches,
        warnings,
    })
}
