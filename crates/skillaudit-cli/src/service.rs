use crate::config::Config;
use anyhow::{Context, Result};
use skillaudit_report::{Auditor, ReportKind, RunSummary};
use tracing::info;

/// Audit service - wires configuration into the auditor
pub struct AuditService {
    config: Config,
}

impl AuditService {
    /// Create a new audit service
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Run the requested analyses and return the run summary
    pub fn run(self, kinds: &[ReportKind]) -> Result<RunSummary> {
        // Initialize logging
        skillaudit_logging::init_logging(&self.config.logging.level, self.config.logging.format)?;
        info!("Starting SkillAudit");

        let contexts = self.config.execution_contexts();
        info!(
            "Analysis config: workers={}, contexts={}",
            self.config.analysis.workers,
            contexts.len()
        );

        let auditor = Auditor::new(self.config.audit_paths(), contexts)
            .context("Failed to set up compatibility analyzer")?
            .with_workers(self.config.analysis.workers);

        let paths = auditor.paths();
        info!(
            "Paths: skills={}, templates={}, output={}",
            paths.skills_dir.display(),
            paths.templates_dir.display(),
            paths.output_dir.display()
        );

        let summary = auditor.run(kinds).with_context(|| {
            format!(
                "Failed to load skills from {}",
                self.config.paths.skills_dir.display()
            )
        })?;

        Ok(summary)
    }
}
