//! Report kinds and their files

use serde::Serialize;
use std::fmt;

/// One of the three generated reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportKind {
    /// Execution-context compatibility
    Suitability,
    /// Pairwise duplicity matrix
    Duplicity,
    /// Token cost and optimization targets
    Tokens,
}

impl ReportKind {
    /// Every kind, in generation order
    pub const ALL: [ReportKind; 3] = [
        ReportKind::Suitability,
        ReportKind::Duplicity,
        ReportKind::Tokens,
    ];

    /// Template file name inside the templates directory
    #[must_use]
    pub fn template_file(self) -> &'static str {
        match self {
            ReportKind::Suitability => "suitability-report.md",
            ReportKind::Duplicity => "duplicity-matrix.md",
            ReportKind::Tokens => "token-optimization.md",
        }
    }

    /// Output file name prefix, before the timestamp
    #[must_use]
    pub fn file_prefix(self) -> &'static str {
        match self {
            ReportKind::Suitability => "suitability_report",
            ReportKind::Duplicity => "duplicity_report",
            ReportKind::Tokens => "token_report",
        }
    }

    /// Short name
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ReportKind::Suitability => "suitability",
            ReportKind::Duplicity => "duplicity",
            ReportKind::Tokens => "tokens",
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
