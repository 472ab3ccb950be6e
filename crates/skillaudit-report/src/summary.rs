//! End-of-run summary

use crate::kind::ReportKind;
use serde::Serialize;
use skillaudit_types::Corpus;
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use uuid::Uuid;

/// A report that was written
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedReport {
    /// Report kind
    pub kind: ReportKind,
    /// Output file
    pub path: PathBuf,
}

/// A report that was not written, and why
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedReport {
    /// Report kind
    pub kind: ReportKind,
    /// Human-readable cause
    pub reason: String,
}

/// Outcome of one audit run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Identifier tagging this run's log events
    pub run_id: Uuid,
    /// Directory the corpus was read from
    pub skills_dir: PathBuf,
    /// Number of documents in the corpus
    pub documents_loaded: usize,
    /// Reports written, in generation order
    pub generated: Vec<GeneratedReport>,
    /// Reports skipped, in generation order
    pub skipped: Vec<SkippedReport>,
    /// Degradation messages per document identifier
    pub degraded: BTreeMap<String, Vec<String>>,
}

impl RunSummary {
    /// Empty summary for a freshly loaded corpus
    #[must_use]
    pub fn new(run_id: Uuid, corpus: &Corpus) -> Self {
        Self {
            run_id,
            skills_dir: corpus.root().to_path_buf(),
            documents_loaded: corpus.len(),
            generated: Vec::new(),
            skipped: Vec::new(),
            degraded: corpus
                .degraded()
                .iter()
                .map(|(id, degradations)| {
                    (
                        id.clone(),
                        degradations.iter().map(ToString::to_string).collect(),
                    )
                })
                .collect(),
        }
    }

    /// Whether every requested report was written
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }

    /// Pretty-printed JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Run {}", self.run_id)?;
        writeln!(
            f,
            "Documents loaded: {} from {}",
            self.documents_loaded,
            self.skills_dir.display()
        )?;

        writeln!(f, "Reports generated: {}", self.generated.len())?;
        for report in &self.generated {
            writeln!(f, "  {}: {}", report.kind, report.path.display())?;
        }

        writeln!(f, "Reports skipped: {}", self.skipped.len())?;
        for report in &self.skipped {
            writeln!(f, "  {}: {}", report.kind, report.reason)?;
        }

        write!(f, "Degraded documents: {}", self.degraded.len())?;
        for (id, reasons) in &self.degraded {
            write!(f, "\n  {}: {}", id, reasons.join("; "))?;
        }
        Ok(())
    }
}
