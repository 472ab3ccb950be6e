//! Report output files

use crate::error::{ReportError, Result};
use crate::kind::ReportKind;
use chrono::{DateTime, Local};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// File name for a report generated at `at`: `<prefix>_<YYYYmmdd_HHMMSS>.md`
#[must_use]
pub fn report_file_name(kind: ReportKind, at: &DateTime<Local>) -> String {
    format!("{}_{}.md", kind.file_prefix(), at.format("%Y%m%d_%H%M%S"))
}

/// Write a rendered report into `output_dir`, creating the directory if needed
pub fn write_report(
    output_dir: &Path,
    kind: ReportKind,
    content: &str,
    at: &DateTime<Local>,
) -> Result<PathBuf> {
    fs::create_dir_all(output_dir).map_err(|source| ReportError::OutputDir {
        path: output_dir.to_path_buf(),
        source,
    })?;

    let path = output_dir.join(report_file_name(kind, at));
    fs::write(&path, content).map_err(|source| ReportError::OutputWrite {
        path: path.clone(),
        source,
    })?;

    info!("{} report saved to {}", kind, path.display());
    Ok(path)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_file_name_embeds_kind_and_timestamp() {
        let at = Local.with_ymd_and_hms(2026, 3, 7, 9, 5, 1).unwrap();
        assert_eq!(
            report_file_name(ReportKind::Duplicity, &at),
            "duplicity_report_20260307_090501.md"
        );
        assert_eq!(
            report_file_name(ReportKind::Tokens, &at),
            "token_report_20260307_090501.md"
        );
    }

    #[test]
    fn test_creates_missing_output_dir() {
        let temp = tempfile::tempdir().unwrap();
        let output = temp.path().join("nested").join("reports");
        let at = Local::now();

        let path = write_report(&output, ReportKind::Suitability, "# Report", &at).unwrap();

        assert!(path.starts_with(&output));
        assert_eq!(fs::read_to_string(path).unwrap(), "# Report");
    }

    #[test]
    fn test_output_dir_blocked_by_file() {
        let temp = tempfile::tempdir().unwrap();
        let blocker = temp.path().join("reports");
        fs::write(&blocker, "not a directory").unwrap();

        let err = write_report(&blocker, ReportKind::Tokens, "x", &Local::now()).unwrap_err();
        assert!(matches!(err, ReportError::OutputDir { .. }));
    }
}
