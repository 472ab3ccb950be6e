//! Skill categories derived from naming conventions

use std::fmt;

/// Functional grouping of a skill, inferred from its identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SkillCategory {
    /// `python-*`, `javascript-*`, `nextjs-*`
    LanguageSpecific,
    /// `*-linter`
    Linting,
    /// `*-test-creator`, `*-pytest`
    Testing,
    /// `git-*`, `jira-*`
    GitJira,
    /// `opentofu-*`
    OpenTofu,
    /// `opencode-*`
    OpencodeMeta,
    /// `*-setup`, `*-standard`
    ProjectSetup,
    /// `*-workflow`
    Workflow,
    /// `*-framework`
    Framework,
    /// Anything else
    Other,
}

impl SkillCategory {
    /// Classify by identifier; the first matching rule wins
    #[must_use]
    pub fn classify(id: &str) -> Self {
        let starts = |prefixes: &[&str]| prefixes.iter().any(|p| id.starts_with(p));
        let ends = |suffixes: &[&str]| suffixes.iter().any(|s| id.ends_with(s));

        if starts(&["python-", "javascript-", "nextjs-"]) {
            SkillCategory::LanguageSpecific
        } else if ends(&["-linter"]) {
            SkillCategory::Linting
        } else if ends(&["-test-creator", "-pytest"]) {
            SkillCategory::Testing
        } else if starts(&["git-", "jira-"]) {
            SkillCategory::GitJira
        } else if starts(&["opentofu-"]) {
            SkillCategory::OpenTofu
        } else if starts(&["opencode-"]) {
            SkillCategory::OpencodeMeta
        } else if ends(&["-setup", "-standard"]) {
            SkillCategory::ProjectSetup
        } else if ends(&["-workflow"]) {
            SkillCategory::Workflow
        } else if ends(&["-framework"]) {
            SkillCategory::Framework
        } else {
            SkillCategory::Other
        }
    }

    /// Label used in reports
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SkillCategory::LanguageSpecific => "language-specific",
            SkillCategory::Linting => "linting",
            SkillCategory::Testing => "testing",
            SkillCategory::GitJira => "git/jira",
            SkillCategory::OpenTofu => "opentofu",
            SkillCategory::OpencodeMeta => "opencode-meta",
            SkillCategory::ProjectSetup => "project-setup",
            SkillCategory::Workflow => "workflow",
            SkillCategory::Framework => "framework",
            SkillCategory::Other => "other",
        }
    }

    /// Average tokens per skill above which the category needs attention
    ///
    /// Workflow and OpenTofu skills get the larger budget.
    #[must_use]
    pub fn token_budget(self) -> usize {
        match self {
            SkillCategory::Workflow | SkillCategory::OpenTofu => 3000,
            _ => 1500,
        }
    }
}

impl fmt::Display for SkillCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
