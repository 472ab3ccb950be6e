//! Full audit runs against temporary corpora and the shipped templates

use anyhow::Result;
use chrono::{Local, TimeZone};
use pretty_assertions::assert_eq;
use skillaudit_analysis::default_contexts;
use skillaudit_corpus::CorpusError;
use skillaudit_report::{AuditPaths, Auditor, ReportKind};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const LINTER: &str = "---
name: python-ruff-linter
description: Lint Python code with Ruff
---

## What I do
Runs ruff over the project.

## When to use me
Before every commit.

## Steps
```bash
ruff check .
```
";

fn shipped_templates() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../templates")
}

struct Workspace {
    _temp: TempDir,
    paths: AuditPaths,
}

fn workspace(templates_dir: PathBuf) -> Result<Workspace> {
    let temp = tempfile::tempdir()?;
    let skills = temp.path().join("skills");

    fs::create_dir_all(skills.join("python-ruff-linter"))?;
    fs::write(skills.join("python-ruff-linter").join("SKILL.md"), LINTER)?;
    fs::write(skills.join("bare-notes.md"), "Just some loose notes.\n")?;

    let paths = AuditPaths {
        skills_dir: skills,
        templates_dir,
        output_dir: temp.path().join("out").join("reports"),
    };
    Ok(Workspace { _temp: temp, paths })
}

#[test]
fn test_unstructured_document_appears_in_every_report() -> Result<()> {
    let ws = workspace(shipped_templates())?;
    let auditor = Auditor::new(ws.paths.clone(), default_contexts())?;

    let summary = auditor.run(&ReportKind::ALL)?;

    assert_eq!(summary.documents_loaded, 2);
    assert!(summary.is_complete(), "{summary}");
    assert_eq!(summary.generated.len(), 3);
    assert!(summary.degraded.contains_key("bare-notes"));
    assert!(!summary.degraded.contains_key("python-ruff-linter"));

    for report in &summary.generated {
        let content = fs::read_to_string(&report.path)?;
        assert!(content.contains("bare-notes"), "{} report", report.kind);
        assert!(!content.contains("{{"), "{} report has unfilled placeholders", report.kind);

        let name = report.path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
        assert!(name.starts_with(report.kind.file_prefix()));
        assert!(name.ends_with(".md"));
    }
    Ok(())
}

#[test]
fn test_missing_template_skips_only_that_report() -> Result<()> {
    let temp_templates = tempfile::tempdir()?;
    for kind in [ReportKind::Suitability, ReportKind::Tokens] {
        fs::copy(
            shipped_templates().join(kind.template_file()),
            temp_templates.path().join(kind.template_file()),
        )?;
    }

    let ws = workspace(temp_templates.path().to_path_buf())?;
    let auditor = Auditor::new(ws.paths.clone(), default_contexts())?;

    let summary = auditor.run(&ReportKind::ALL)?;

    let generated: Vec<_> = summary.generated.iter().map(|r| r.kind).collect();
    assert_eq!(generated, vec![ReportKind::Suitability, ReportKind::Tokens]);
    assert_eq!(summary.skipped.len(), 1);
    assert_eq!(summary.skipped[0].kind, ReportKind::Duplicity);
    assert!(summary.skipped[0].reason.contains("duplicity-matrix.md"));
    Ok(())
}

#[test]
fn test_only_requested_reports_are_written() -> Result<()> {
    let ws = workspace(shipped_templates())?;
    let auditor = Auditor::new(ws.paths.clone(), default_contexts())?.with_workers(2);

    let summary = auditor.run(&[ReportKind::Duplicity])?;

    assert_eq!(auditor.paths(), &ws.paths);
    assert_eq!(summary.skills_dir, ws.paths.skills_dir);
    assert_eq!(summary.generated.len(), 1);
    assert_eq!(fs::read_dir(&ws.paths.output_dir)?.count(), 1);
    Ok(())
}

#[test]
fn test_rendering_is_deterministic() -> Result<()> {
    let ws = workspace(shipped_templates())?;
    let auditor = Auditor::new(ws.paths.clone(), default_contexts())?;
    let at = Local.with_ymd_and_hms(2026, 5, 1, 8, 30, 0).single().unwrap_or_else(Local::now);

    let corpus = auditor.load_corpus()?;
    let reloaded = auditor.load_corpus()?;
    for kind in ReportKind::ALL {
        assert_eq!(
            auditor.render(kind, &corpus, &at)?,
            auditor.render(kind, &reloaded, &at)?,
            "{kind} report"
        );
    }
    Ok(())
}

#[test]
fn test_per_report_entry_points() -> Result<()> {
    let ws = workspace(shipped_templates())?;
    let auditor = Auditor::new(ws.paths.clone(), default_contexts())?;
    let corpus = auditor.load_corpus()?;

    let suitability = fs::read_to_string(auditor.suitability_report(&corpus)?)?;
    assert!(suitability
        .contains("| python-ruff-linter | linting-subagent | requires process-execution |"));

    let tokens = fs::read_to_string(auditor.token_report(&corpus)?)?;
    assert!(tokens.contains("| python-ruff-linter |"));

    let duplicity = fs::read_to_string(auditor.duplicity_report(&corpus)?)?;
    assert!(duplicity.contains("| Skill | bare-notes | python-ruff-linter |"));
    Ok(())
}

#[test]
fn test_missing_corpus_is_fatal() -> Result<()> {
    let temp = tempfile::tempdir()?;
    let auditor = Auditor::new(
        AuditPaths {
            skills_dir: temp.path().join("missing"),
            templates_dir: shipped_templates(),
            output_dir: temp.path().join("reports"),
        },
        default_contexts(),
    )?;

    let result = auditor.run(&ReportKind::ALL);

    assert!(matches!(result, Err(CorpusError::NotFound(_))));
    assert!(!temp.path().join("reports").exists());
    Ok(())
}
