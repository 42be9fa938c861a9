//! Soft-failure diagnostics for scan runs
//!
//! A scan never aborts on a single unreadable file or a single bad rule
//! pattern. Those problems are recorded as [`ScanWarning`] entries and
//! surfaced in the warnings section of every report, so the caller decides
//! severity instead of the engine guessing.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One recovered problem from a scan run.
///
/// `subject` names what failed: a file path for I/O warnings, a rule name
/// for pattern warnings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanWarning {
    /// File path or rule name the warning is about
    pub subject: String,
    /// Human-readable reason
    pub reason: String,
}

impl ScanWarning {
    pub fn new(subject: impl Into<String>, reason: impl Into<String>) -> Self {
        ScanWarning {
            subject: subject.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for ScanWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.subject, self.reason)
    }
}
