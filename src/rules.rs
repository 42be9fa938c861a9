//! Rule definitions and compilation
//!
//! A rule is an immutable pattern definition: a name (its kind tag), the
//! facet kind it contributes, a scope (per-line or whole-file), a regex with
//! named captures, and optionally the capture used as the correlation key.
//! Rule sets are configuration data, not engine logic: the engine runs
//! whatever set it is handed. A built-in set reproduces the ad hoc scanners
//! this tool replaced; external sets load from JSON.
//!
//! Patterns are expected to be word-boundary anchored (`\b`) so that
//! `onTick` does not match inside `buttonTickHandler`. Anchoring is a
//! property of the rule, not of the engine: the matcher is a plain regex
//! search and tolerates heuristic false positives by contract.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::diagnostics::ScanWarning;
use crate::graph::FacetKind;

/// Whether a rule's pattern runs against each physical line or against the
/// whole decoded file content.
///
/// File scope exists for constructs that span lines, e.g. a class signature
/// whose base clause continues on the next line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleScope {
    Line,
    File,
}

/// One immutable pattern definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    /// Unique kind tag, e.g. "class-decl"
    pub name: String,
    /// Facet kind this rule contributes
    pub facet: FacetKind,
    pub scope: RuleScope,
    /// Regex source with named capture groups
    pub pattern: String,
    /// Capture names recorded into each match, in declaration order
    pub fields: Vec<String>,
    /// Capture whose value is the correlation key; None means every match
    /// from this rule is uncorrelated by construction
    #[serde(default, rename = "key", skip_serializing_if = "Option::is_none")]
    pub key_field: Option<String>,
}

/// A rule set plus the file extensions it applies to.
///
/// Extensions belong to the rule set, not the engine: a set written for C++
/// sources names C++ extensions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSet {
    pub rules: Vec<Rule>,
    pub extensions: Vec<String>,
}

fn rule(
    name: &str,
    facet: FacetKind,
    scope: RuleScope,
    pattern: &str,
    fields: &[&str],
    key_field: Option<&str>,
) -> Rule {
    Rule {
        name: name.to_string(),
        facet,
        scope,
        pattern: pattern.to_string(),
        fields: fields.iter().map(|f| f.to_string()).collect(),
        key_field: key_field.map(|k| k.to_string()),
    }
}

impl RuleSet {
    /// The built-in rule set.
    ///
    /// Transcribes the patterns of the five scanners this engine unified:
    /// dispatcher wiring (registerListener/unregisterListener), node
    /// declarations and their out-of-line method definitions, websocket
    /// handler/send/tree-builder touchpoints, and TODO/FIXME/NOTE tags.
    pub fn builtin() -> Self {
        let rules = vec![
            rule(
                "class-decl",
                FacetKind::Declaration,
                RuleScope::File,
                r"\bclass\s+(?P<class>[A-Za-z_]\w*)\s*(?:final\s*)?:\s*public\s+(?:\w+::)*(?P<base>[A-Za-z_]\w*)",
                &["class", "base"],
                Some("class"),
            ),
            rule(
                "method-impl",
                FacetKind::Implementation,
                RuleScope::File,
                r"\b[A-Za-z_][\w:<>&*]*\s+(?P<class>[A-Za-z_]\w*)::(?P<method>[A-Za-z_]\w*)\s*\(",
                &["class", "method"],
                Some("class"),
            ),
            rule(
                "register-listener",
                FacetKind::Registration,
                RuleScope::Line,
                r"(?:(?P<subject>[A-Za-z_]\w*)\s*(?:\.|->)\s*)?\bregisterListener\s*\(",
                &["subject"],
                Some("subject"),
            ),
            rule(
                "unregister-listener",
                FacetKind::Registration,
                RuleScope::Line,
                r"(?:(?P<subject>[A-Za-z_]\w*)\s*(?:\.|->)\s*)?\bunregisterListener\s*\(",
                &["subject"],
                Some("subject"),
            ),
            rule(
                "tick-handler",
                FacetKind::CallSite,
                RuleScope::Line,
                r"(?:(?P<subject>[A-Za-z_]\w*)\s*(?:\.|->)\s*)?\bonTick\s*\(",
                &["subject"],
                Some("subject"),
            ),
            rule(
                "message-handler",
                FacetKind::CallSite,
                RuleScope::Line,
                r"(?i)(?:(?P<subject>[A-Za-z_]\w*)\s*(?:\.|->)\s*)?\b(?P<handler>onmessage|ontext|onread|handle_message)\s*\(",
                &["subject", "handler"],
                Some("subject"),
            ),
            rule(
                "send-path",
                FacetKind::CallSite,
                RuleScope::Line,
                r"(?i)(?:(?P<subject>[A-Za-z_]\w*)\s*(?:\.|->)\s*)?(?P<call>\bsend(?:text)?|_send)\s*\(",
                &["subject", "call"],
                Some("subject"),
            ),
            rule(
                "tree-build",
                FacetKind::CallSite,
                RuleScope::Line,
                r"(?i)\b(?P<call>createtree|buildtree|treebuilder)\b",
                &["call"],
                None,
            ),
            rule(
                "annotation-line",
                FacetKind::Annotation,
                RuleScope::Line,
                r"(?i)//\s*(?P<tag>todo|fixme|note)\s*:?\s*(?P<message>.*)$",
                &["tag", "message"],
                None,
            ),
            rule(
                "annotation-block",
                FacetKind::Annotation,
                RuleScope::Line,
                r"(?i)/\*\s*(?P<tag>todo|fixme|note)\s*:?\s*(?P<message>.*?)\*/",
                &["tag", "message"],
                None,
            ),
        ];
        let extensions = ["cc", "cpp", "cxx", "h", "hh", "hpp", "json", "md"]
            .iter()
            .map(|e| e.to_string())
            .collect();
        RuleSet { rules, extensions }
    }

    /// Parse a rule set from its JSON representation
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::RulesFileInvalid {
            path: "<inline>".to_string(),
            reason: e.to_string(),
        })
    }

    /// Load a rule set from a JSON file
    pub fn from_json_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let text =
            std::fs::read_to_string(path).map_err(|e| ConfigError::RulesFileUnreadable {
                path: path.to_string_lossy().to_string(),
                reason: e.to_string(),
            })?;
        serde_json::from_str(&text).map_err(|e| ConfigError::RulesFileInvalid {
            path: path.to_string_lossy().to_string(),
            reason: e.to_string(),
        })
    }

    /// Compile every rule's pattern.
    ///
    /// A pattern that fails to compile is downgraded to a warning against
    /// that rule and the remaining rules still run. An empty input set, or
    /// a set where no pattern compiled, is a configuration error: nothing
    /// useful could ever be scanned.
    pub fn compile(&self) -> Result<(CompiledRuleSet, Vec<ScanWarning>), ConfigError> {
        if self.rules.is_empty() {
            return Err(ConfigError::EmptyRuleSet);
        }

        let mut compiled = Vec::new();
        let mut warnings = Vec::new();
        for r in &self.rules {
            match Regex::new(&r.pattern) {
                Ok(regex) => compiled.push(CompiledRule {
                    rule: r.clone(),
                    regex,
                }),
                Err(e) => warnings.push(ScanWarning::new(&r.name, e.to_string())),
            }
        }

        if compiled.is_empty() {
            return Err(ConfigError::NoUsableRules);
        }

        Ok((
            CompiledRuleSet {
                rules: compiled,
                extensions: self.extensions.clone(),
            },
            warnings,
        ))
    }
}

/// A rule with its pattern compiled
#[derive(Debug, Clone)]
pub struct CompiledRule {
    pub rule: Rule,
    pub regex: Regex,
}

/// The active, compiled rule set handed to the scanner and aggregator
#[derive(Debug, Clone)]
pub struct CompiledRuleSet {
    rules: Vec<CompiledRule>,
    extensions: Vec<String>,
}

impl CompiledRuleSet {
    pub fn rules(&self) -> &[CompiledRule] {
        &self.rules
    }

    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    /// The correlation key capture for a rule kind, if it defines one.
    /// Unknown rule names yield None, which routes the match to unmatched.
    pub fn key_field_for(&self, rule_name: &str) -> Option<&str> {
        self.rules
            .iter()
            .find(|c| c.rule.name == rule_name)
            .and_then(|c| c.rule.key_field.as_deref())
    }
}
