//! Execution-context suitability report

use crate::markdown::{mark, percent, Table, NONE};
use crate::template::Placeholders;
use skillaudit_analysis::compatibility::KNOWN_SERVICES;
use skillaudit_analysis::CompatibilityReport;
use skillaudit_types::Capability;

/// Placeholder key for an identifier: upper-cased, non-alphanumerics as `_`
///
/// `git-workflow-subagent` becomes `GIT_WORKFLOW_SUBAGENT`.
#[must_use]
pub fn placeholder_key(id: &str) -> String {
    id.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect()
}

/// Placeholder values for the suitability report
#[must_use]
pub fn placeholders(report: &CompatibilityReport) -> Placeholders {
    let n = report.profiles().len();
    let mut values = Placeholders::new();

    for context in report.contexts() {
        let key = placeholder_key(&context.id);
        let compatible = report.compatible_count(&context.id);
        values
            .set(format!("{key}_COMPATIBLE"), compatible)
            .set(format!("{key}_PERCENT"), percent(compatible, n));
    }

    for capability in Capability::ALL {
        let key = placeholder_key(capability.as_str());
        let count = report.capability_count(capability);
        values
            .set(format!("{key}_COUNT"), count)
            .set(format!("{key}_PERCENT"), percent(count, n));
    }

    for service in KNOWN_SERVICES {
        let key = placeholder_key(service);
        let count = report.service_count(service);
        values
            .set(format!("{key}_COUNT"), count)
            .set(format!("{key}_PERCENT"), percent(count, n));
    }

    values
        .set("CONTEXT_TABLE", context_table(report))
        .set("SKILL_MATRIX", skill_matrix(report))
        .set("TOOL_REQUIREMENTS_TABLE", tool_requirements(report))
        .set("VIOLATIONS_TABLE", violations(report));
    values
}

fn context_table(report: &CompatibilityReport) -> String {
    let n = report.profiles().len();
    let mut table = Table::new(["Context", "Description", "Compatible Skills", "Percent"]);
    for context in report.contexts() {
        let compatible = report.compatible_count(&context.id);
        table.push([
            context.id.clone(),
            context.description.clone(),
            compatible.to_string(),
            format!("{}%", percent(compatible, n)),
        ]);
    }
    table.render_or(NONE)
}

fn skill_matrix(report: &CompatibilityReport) -> String {
    let mut table = Table::new(
        std::iter::once("Skill").chain(report.contexts().iter().map(|c| c.id.as_str())),
    );
    for id in report.profiles().keys() {
        let cells = report.contexts().iter().map(|context| {
            mark(
                report
                    .entry(id, &context.id)
                    .is_some_and(|entry| entry.compatible),
            )
        });
        table.push(std::iter::once(id.as_str()).chain(cells));
    }
    table.render_or(NONE)
}

fn tool_requirements(report: &CompatibilityReport) -> String {
    let mut table = Table::new(
        ["Skill", "Shell", "Python"]
            .into_iter()
            .chain(KNOWN_SERVICES),
    );
    for profile in report.profiles().values() {
        let cells = [
            profile.requires(Capability::ProcessExecution),
            profile.has_code_language("python"),
        ]
        .into_iter()
        .chain(KNOWN_SERVICES.iter().map(|s| profile.uses_service(s)))
        .map(|yes| mark(yes));
        table.push(std::iter::once(profile.id.as_str()).chain(cells));
    }
    table.render_or(NONE)
}

fn violations(report: &CompatibilityReport) -> String {
    let mut table = Table::new(["Skill", "Context", "Violations"]);
    for entry in report.violations() {
        let reasons: Vec<String> = entry.violations.iter().map(ToString::to_string).collect();
        table.push([
            entry.document.clone(),
            entry.context.clone(),
            reasons.join("; "),
        ]);
    }
    table.render_or(NONE)
}
