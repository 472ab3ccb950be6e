//! `SkillAudit` Report Generator
//!
//! Renders the analysis results into markdown through `{{PLACEHOLDER}}`
//! templates and writes one timestamped file per report.
//!
//! | Report | Template | Output |
//! |--------|----------|--------|
//! | suitability | `suitability-report.md` | `suitability_report_<timestamp>.md` |
//! | duplicity | `duplicity-matrix.md` | `duplicity_report_<timestamp>.md` |
//! | tokens | `token-optimization.md` | `token_report_<timestamp>.md` |
//!
//! ## Usage
//!
//! ```no_run
//! use skillaudit_analysis::default_contexts;
//! use skillaudit_report::{AuditPaths, Auditor, ReportKind};
//!
//! # fn main() -> anyhow::Result<()> {
//! let auditor = Auditor::new(
//!     AuditPaths {
//!         skills_dir: "skills".into(),
//!         templates_dir: "templates".into(),
//!         output_dir: "reports".into(),
//!     },
//!     default_contexts(),
//! )?;
//! let summary = auditor.run(&ReportKind::ALL)?;
//! println!("{summary}");
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code, dead_code, unused_imports, unused_variables, missing_docs)]

pub mod audit;
pub mod duplicity;
pub mod error;
pub mod kind;
pub mod markdown;
pub mod suitability;
pub mod summary;
pub mod template;
pub mod tokens;
pub mod writer;

pub use audit::{AuditPaths, Auditor};
pub use error::ReportError;
pub use kind::ReportKind;
pub use summary::{GeneratedReport, RunSummary, SkippedReport};
pub use template::{substitute, Placeholders, Template};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{AuditPaths, Auditor, ReportError, ReportKind, RunSummary};
}
