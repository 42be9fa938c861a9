//! Symbol graph: the aggregated result of one scan run
//!
//! The graph is built fresh per run and passed explicitly through the
//! pipeline; no process-wide state survives between runs. Symbols keep
//! first-seen order, facets keep scan order, and matches that cannot be
//! correlated are preserved in `unmatched` rather than dropped.

pub mod aggregate;
pub mod export;

pub use aggregate::aggregate;
pub use export::{render_csv, render_json, render_markdown, ReportFormat};

use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::scanner::Match;

/// Facet taxonomy: the categories of evidence a rule can contribute
/// about a symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FacetKind {
    /// A type declaration (e.g. a class with a base clause)
    Declaration,
    /// An out-of-line definition qualified by a type name
    Implementation,
    /// A registration/unregistration call wiring a component up
    Registration,
    /// A call into a handler or dispatch entry point
    CallSite,
    /// A tagged comment (TODO/FIXME/NOTE)
    Annotation,
}

impl FacetKind {
    /// All kinds, in the fixed order reports group by
    pub const ALL: [FacetKind; 5] = [
        FacetKind::Declaration,
        FacetKind::Implementation,
        FacetKind::Registration,
        FacetKind::CallSite,
        FacetKind::Annotation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FacetKind::Declaration => "declaration",
            FacetKind::Implementation => "implementation",
            FacetKind::Registration => "registration",
            FacetKind::CallSite => "call_site",
            FacetKind::Annotation => "annotation",
        }
    }
}

/// One typed piece of evidence about a symbol.
///
/// Owned exclusively by its [`Symbol`]; append-only. Duplicate facets are
/// never merged: a class redeclared in two translation units keeps both
/// declaration facets, since the duplication itself is diagnostic signal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Facet {
    pub kind: FacetKind,
    /// Name of the rule that produced the underlying match
    pub rule: String,
    pub file: String,
    /// 1-based; 0 means the match covered the whole file
    pub line: usize,
    /// Captured fields from the match, keyed by capture name
    pub attributes: BTreeMap<String, String>,
}

impl Facet {
    /// Build a facet from a raw match, carrying all captures over
    pub fn from_match(m: &Match) -> Self {
        Facet {
            kind: m.facet,
            rule: m.rule.clone(),
            file: m.file.clone(),
            line: m.line,
            attributes: m.captured.clone(),
        }
    }
}

/// The aggregated identity under which related facets are grouped.
///
/// Keys are case-sensitive and derived per rule kind from captured fields.
/// Correlation is name-based only: a declaration in one file and an
/// implementation in another collapse into the same symbol purely because
/// the captured names are equal. This is a heuristic, not a semantic link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Symbol {
    pub key: String,
    pub facets: Vec<Facet>,
}

/// The complete output of one scan run: symbols in first-seen order plus
/// every match whose correlation key could not be derived.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SymbolGraph {
    symbols: Vec<Symbol>,
    pub unmatched: Vec<Match>,
    #[serde(skip)]
    index: AHashMap<String, usize>,
}

impl SymbolGraph {
    pub fn new() -> Self {
        SymbolGraph::default()
    }

    /// Symbols in the order their keys were first seen
    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    pub fn get(&self, key: &str) -> Option<&Symbol> {
        self.index.get(key).map(|&i| &self.symbols[i])
    }

    /// Append a facet to the symbol for `key`, creating the symbol on
    /// first sighting. Lookup is amortized O(1); insertion order of the
    /// symbol list is never disturbed.
    pub fn attach(&mut self, key: &str, facet: Facet) {
        let idx = match self.index.get(key) {
            Some(&i) => i,
            None => {
                let i = self.symbols.len();
                self.symbols.push(Symbol {
                    key: key.to_string(),
                    facets: Vec::new(),
                });
                self.index.insert(key.to_string(), i);
                i
            }
        };
        self.symbols[idx].facets.push(facet);
    }

    /// Route a match with no derivable key. Never dropped, never guessed.
    pub fn push_unmatched(&mut self, m: Match) {
        self.unmatched.push(m);
    }

    /// Total facets across all symbols
    pub fn facet_count(&self) -> usize {
        self.symbols.iter().map(|s| s.facets.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty() && self.unmatched.is_empty()
    }

    /// No-loss accounting: every scanner match must end up as exactly one
    /// facet or one unmatched entry.
    pub fn accounts_for(&self, match_count: usize) -> bool {
        self.facet_count() + self.unmatched.len() == match_count
    }
}
