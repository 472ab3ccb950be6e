//! Audit entry points
//!
//! [`Auditor`] ties the loader, the three analyses and the renderers
//! together. Each report has its own entry point taking an already loaded
//! corpus; [`Auditor::run`] loads the corpus once and produces every
//! requested report from it.

use crate::error::Result;
use crate::kind::ReportKind;
use crate::summary::{GeneratedReport, RunSummary, SkippedReport};
use crate::template::{Placeholders, Template};
use crate::writer::write_report;
use crate::{duplicity, suitability, tokens};
use chrono::{DateTime, Local};
use skillaudit_analysis::{estimate_corpus, CompatibilityAnalyzer, SimilarityScorer};
use skillaudit_corpus::{Corpus, CorpusLoader};
use skillaudit_types::ExecutionContext;
use std::path::PathBuf;
use tracing::{info, info_span, warn};
use uuid::Uuid;

/// Directories an audit reads from and writes to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditPaths {
    /// Corpus root
    pub skills_dir: PathBuf,
    /// Directory holding the report templates
    pub templates_dir: PathBuf,
    /// Directory receiving the rendered reports
    pub output_dir: PathBuf,
}

/// Runs analyses over a skill corpus and renders their reports
#[derive(Debug, Clone)]
pub struct Auditor {
    paths: AuditPaths,
    scorer: SimilarityScorer,
    analyzer: CompatibilityAnalyzer,
}

impl Auditor {
    /// Auditor checking compatibility against `contexts`
    pub fn new(paths: AuditPaths, contexts: Vec<ExecutionContext>) -> anyhow::Result<Self> {
        Ok(Self {
            paths,
            scorer: SimilarityScorer::new(),
            analyzer: CompatibilityAnalyzer::new(contexts)?,
        })
    }

    /// Score duplicity pairs on `workers` threads
    #[must_use]
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.scorer = self.scorer.with_workers(workers);
        self
    }

    /// Configured directories
    #[must_use]
    pub fn paths(&self) -> &AuditPaths {
        &self.paths
    }

    /// Load the corpus from the skills directory
    pub fn load_corpus(&self) -> skillaudit_corpus::error::Result<Corpus> {
        CorpusLoader::new(&self.paths.skills_dir).load()
    }

    /// Render one report without writing it
    ///
    /// The template is read first, so a missing template skips the analysis too.
    pub fn render(
        &self,
        kind: ReportKind,
        corpus: &Corpus,
        at: &DateTime<Local>,
    ) -> Result<String> {
        let template = Template::load(&self.paths.templates_dir, kind)?;
        info!("Generating {} report from {}", kind, template.path().display());

        let mut values = Placeholders::common(corpus.len(), at);
        values.extend(match kind {
            ReportKind::Suitability => {
                suitability::placeholders(&self.analyzer.analyze_corpus(corpus))
            }
            ReportKind::Duplicity => duplicity::placeholders(&self.scorer.compute(corpus)),
            ReportKind::Tokens => tokens::placeholders(&estimate_corpus(corpus), at),
        });

        Ok(template.render(&values))
    }

    /// Render one report and write it to the output directory
    pub fn generate(&self, kind: ReportKind, corpus: &Corpus) -> Result<PathBuf> {
        let at = Local::now();
        let content = self.render(kind, corpus, &at)?;
        write_report(&self.paths.output_dir, kind, &content, &at)
    }

    /// Execution-context suitability report
    pub fn suitability_report(&self, corpus: &Corpus) -> Result<PathBuf> {
        self.generate(ReportKind::Suitability, corpus)
    }

    /// Duplicity matrix report
    pub fn duplicity_report(&self, corpus: &Corpus) -> Result<PathBuf> {
        self.generate(ReportKind::Duplicity, corpus)
    }

    /// Token optimization report
    pub fn token_report(&self, corpus: &Corpus) -> Result<PathBuf> {
        self.generate(ReportKind::Tokens, corpus)
    }

    /// Load the corpus once and generate every requested report
    ///
    /// Only an unreadable corpus is an error. A report that cannot be
    /// rendered or written is recorded as skipped and the rest still run.
    pub fn run(&self, kinds: &[ReportKind]) -> skillaudit_corpus::error::Result<RunSummary> {
        let run_id = Uuid::new_v4();
        let span = info_span!("audit", run_id = %run_id);
        let _guard = span.enter();

        let corpus = self.load_corpus()?;
        let mut summary = RunSummary::new(run_id, &corpus);
        for (id, reasons) in &summary.degraded {
            warn!("Degraded skill {}: {}", id, reasons.join("; "));
        }

        for kind in ReportKind::ALL.into_iter().filter(|k| kinds.contains(k)) {
            match self.generate(kind, &corpus) {
                Ok(path) => summary.generated.push(GeneratedReport { kind, path }),
                Err(e) => {
                    warn!("Skipping {} report: {}", kind, e);
                    summary.skipped.push(SkippedReport {
                        kind,
                        reason: e.to_string(),
                    });
                }
            }
        }

        info!(
            "Audit complete: {} generated, {} skipped",
            summary.generated.len(),
            summary.skipped.len()
        );
        Ok(summary)
    }
}
