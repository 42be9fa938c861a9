//! Scan configuration and fatal configuration errors
//!
//! Everything here is validated before the pipeline starts Walking. A
//! configuration error aborts the run with nothing emitted; every later
//! problem (unreadable file, bad pattern) degrades to a warning instead.

use std::path::{Path, PathBuf};

use crate::rules::RuleSet;

/// Fatal configuration problems.
///
/// These are the only errors that stop the pipeline.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Root path does not exist
    #[error("root path does not exist: {0}")]
    RootMissing(String),

    /// Root path exists but is not a directory
    #[error("root path is not a directory: {0}")]
    RootNotDirectory(String),

    /// The rule set contains no rules at all
    #[error("rule set contains no rules")]
    EmptyRuleSet,

    /// Every rule pattern failed to compile
    #[error("no rule pattern compiled successfully")]
    NoUsableRules,

    /// Rules file could not be read
    #[error("cannot read rules file {path}: {reason}")]
    RulesFileUnreadable { path: String, reason: String },

    /// Rules file could not be parsed
    #[error("invalid rules file {path}: {reason}")]
    RulesFileInvalid { path: String, reason: String },
}

/// The configuration surface consumed by the engine: a root directory and
/// the active rule set (which carries its own extension allow-list).
#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub root: PathBuf,
    pub rules: RuleSet,
}

impl ScanConfig {
    /// Config with the built-in rule set
    pub fn new(root: impl Into<PathBuf>) -> Self {
        ScanConfig {
            root: root.into(),
            rules: RuleSet::builtin(),
        }
    }

    pub fn with_rules(root: impl Into<PathBuf>, rules: RuleSet) -> Self {
        ScanConfig {
            root: root.into(),
            rules,
        }
    }

    /// Validate the config before any walking starts.
    ///
    /// Checks that the root exists and is a directory. Rule compilation is
    /// validated separately by [`RuleSet::compile`] so per-rule pattern
    /// failures can be downgraded to warnings.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_root(&self.root)?;
        if self.rules.rules.is_empty() {
            return Err(ConfigError::EmptyRuleSet);
        }
        Ok(())
    }
}

/// Check a root path exists and is a directory
pub fn validate_root(root: &Path) -> Result<(), ConfigError> {
    if !root.exists() {
        return Err(ConfigError::RootMissing(root.to_string_lossy().to_string()));
    }
    if !root.is_dir() {
        return Err(ConfigError::RootNotDirectory(
            root.to_string_lossy().to_string(),
        ));
    }
    Ok(())
}
