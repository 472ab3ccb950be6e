//! Execution-context compatibility
//!
//! Requirement signals are detected with keyword and fence-tag patterns over
//! the raw document text. This is a heuristic for advisory reports, not a
//! static analysis and not a security boundary: a document can trivially
//! evade or trip any of these patterns.
//!
//! A document is compatible with a context when every gated capability it
//! signals is permitted there and every named service it mentions is
//! available there. Interactive prompting is detected and reported but never
//! gates compatibility.

use anyhow::{anyhow, Result};
use regex::Regex;
use skillaudit_types::{
    Capability, CapabilityProfile, CompatibilityEntry, Corpus, ExecutionContext, SkillDocument,
    Violation,
};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// External services recognized by name
pub const KNOWN_SERVICES: [&str; 3] = ["atlassian", "drawio", "zai-mcp-server"];

/// Fence tags that mark an executable shell block
pub const SHELL_LANGUAGES: [&str; 5] = ["bash", "sh", "shell", "zsh", "console"];

/// Default context table: the primary agent and the restricted subagents
#[must_use]
pub fn default_contexts() -> Vec<ExecutionContext> {
    let restricted = |id: &str, description: &str| {
        ExecutionContext::new(id).with_description(description)
    };

    let mut primary = restricted("primary", "Full access");
    for capability in Capability::ALL {
        primary = primary.with_capability(capability);
    }
    for service in KNOWN_SERVICES {
        primary = primary.with_service(service);
    }

    vec![
        primary,
        restricted("linting-subagent", "Linting specialization"),
        restricted("testing-subagent", "Testing specialization"),
        restricted("git-workflow-subagent", "Git/JIRA specialization").with_service("atlassian"),
        restricted("documentation-subagent", "Documentation specialization"),
        restricted("opentofu-explorer-subagent", "OpenTofu specialization"),
        restricted("workflow-subagent", "Workflow coordination").with_service("atlassian"),
    ]
}

/// Checks documents against a table of execution contexts
#[derive(Debug, Clone)]
pub struct CompatibilityAnalyzer {
    contexts: Vec<ExecutionContext>,
    fence: Regex,
    delegation: Regex,
    interactive: Regex,
}

impl CompatibilityAnalyzer {
    /// Analyzer over the given contexts, in the given order
    pub fn new(contexts: Vec<ExecutionContext>) -> Result<Self> {
        let fence = Regex::new(r"(?m)^[ \t]*```[ \t]*([A-Za-z0-9_+-]+)")
            .map_err(|e| anyhow!("Failed to compile fence regex: {}", e))?;
        let delegation =
            Regex::new(r"(?i)\b(delegat(?:e|es|ed|ing|ion)|sub-?agents?|sub-?tasks?|task tool)\b")
                .map_err(|e| anyhow!("Failed to compile delegation regex: {}", e))?;
        let interactive = Regex::new(
            r"(?i)\b(question tool|ask(?:s|ing)? the user|confirm(?:s|ing)? with the user|prompt(?:s|ing)? the user|wait(?:s|ing)? for (?:user )?confirmation)\b",
        )
        .map_err(|e| anyhow!("Failed to compile interactive regex: {}", e))?;

        Ok(Self {
            contexts,
            fence,
            delegation,
            interactive,
        })
    }

    /// Analyzer over [`default_contexts`]
    pub fn with_default_contexts() -> Result<Self> {
        Self::new(default_contexts())
    }

    /// Contexts checked, in report order
    #[must_use]
    pub fn contexts(&self) -> &[ExecutionContext] {
        &self.contexts
    }

    /// Detect the requirement signals of one document
    #[must_use]
    pub fn profile(&self, document: &SkillDocument) -> CapabilityProfile {
        let text = document.raw.as_str();
        let mut profile = CapabilityProfile::new(document.id.clone());

        for captures in self.fence.captures_iter(text) {
            if let Some(language) = captures.get(1) {
                profile
                    .code_languages
                    .insert(language.as_str().to_lowercase());
            }
        }
        if SHELL_LANGUAGES
            .iter()
            .any(|language| profile.has_code_language(language))
        {
            profile.capabilities.insert(Capability::ProcessExecution);
        }
        if self.delegation.is_match(text) {
            profile.capabilities.insert(Capability::TaskDelegation);
        }
        if self.interactive.is_match(text) {
            profile.capabilities.insert(Capability::InteractivePrompting);
        }

        let lowered = text.to_lowercase();
        profile.services = KNOWN_SERVICES
            .iter()
            .filter(|service| lowered.contains(*service))
            .map(|service| (*service).to_string())
            .collect();

        profile
    }

    /// Verdict of one profile in one context
    #[must_use]
    pub fn check(profile: &CapabilityProfile, context: &ExecutionContext) -> CompatibilityEntry {
        let capabilities = profile
            .capabilities
            .iter()
            .filter(|capability| capability.is_gated() && !context.permits(**capability))
            .map(|capability| Violation::Capability(*capability));
        let services = profile
            .services
            .iter()
            .filter(|service| !context.permits_service(service))
            .map(|service| Violation::Service(service.clone()));

        CompatibilityEntry::new(
            profile.id.clone(),
            context.id.clone(),
            capabilities.chain(services).collect(),
        )
    }

    /// Profile one document and check it against every context
    #[must_use]
    pub fn analyze(
        &self,
        document: &SkillDocument,
    ) -> (CapabilityProfile, Vec<CompatibilityEntry>) {
        let profile = self.profile(document);
        let entries = self
            .contexts
            .iter()
            .map(|context| Self::check(&profile, context))
            .collect();
        (profile, entries)
    }

    /// Analyze every document in the corpus
    #[must_use]
    pub fn analyze_corpus(&self, corpus: &Corpus) -> CompatibilityReport {
        info!(
            "Checking compatibility of {} skills against {} contexts",
            corpus.len(),
            self.contexts.len()
        );

        let mut profiles = BTreeMap::new();
        let mut entries = Vec::with_capacity(corpus.len() * self.contexts.len());
        for document in corpus.documents() {
            let (profile, checked) = self.analyze(document);
            debug!(
                "{}: {:?}, services {:?}",
                profile.id, profile.capabilities, profile.services
            );
            entries.extend(checked);
            profiles.insert(profile.id.clone(), profile);
        }

        info!("Compatibility checked");
        CompatibilityReport {
            contexts: self.contexts.clone(),
            profiles,
            entries,
        }
    }
}

/// Profiles and verdicts for a whole corpus
#[derive(Debug, Clone, PartialEq)]
pub struct CompatibilityReport {
    contexts: Vec<ExecutionContext>,
    profiles: BTreeMap<String, CapabilityProfile>,
    /// Document-major, contexts in table order
    entries: Vec<CompatibilityEntry>,
}

impl CompatibilityReport {
    /// Contexts checked, in table order
    #[must_use]
    pub fn contexts(&self) -> &[ExecutionContext] {
        &self.contexts
    }

    /// Profiles keyed by document identifier
    #[must_use]
    pub fn profiles(&self) -> &BTreeMap<String, CapabilityProfile> {
        &self.profiles
    }

    /// Every verdict, documents in identifier order
    #[must_use]
    pub fn entries(&self) -> &[CompatibilityEntry] {
        &self.entries
    }

    /// Verdict for one (document, context) pair
    #[must_use]
    pub fn entry(&self, document: &str, context: &str) -> Option<&CompatibilityEntry> {
        self.entries
            .iter()
            .find(|entry| entry.document == document && entry.context == context)
    }

    /// Number of documents compatible with `context`
    #[must_use]
    pub fn compatible_count(&self, context: &str) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.context == context && entry.compatible)
            .count()
    }

    /// Number of documents signalling `capability`
    #[must_use]
    pub fn capability_count(&self, capability: Capability) -> usize {
        self.profiles
            .values()
            .filter(|profile| profile.requires(capability))
            .count()
    }

    /// Number of documents mentioning `service`
    #[must_use]
    pub fn service_count(&self, service: &str) -> usize {
        self.profiles
            .values()
            .filter(|profile| profile.uses_service(service))
            .count()
    }

    /// Verdicts that broke at least one constraint
    pub fn violations(&self) -> impl Iterator<Item = &CompatibilityEntry> {
        self.entries.iter().filter(|entry| !entry.compatible)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn document(id: &str, raw: &str) -> SkillDocument {
        SkillDocument::new(id, format!("{id}.md"), raw)
    }

    fn analyzer() -> CompatibilityAnalyzer {
        CompatibilityAnalyzer::with_default_contexts().expect("patterns compile")
    }

    #[test]
    fn test_shell_block_requires_process_execution() {
        let doc = document("runner", "## Steps\n```bash\nnpm test\n```\n");
        let (profile, entries) = analyzer().analyze(&doc);

        assert!(profile.requires(Capability::ProcessExecution));
        assert!(profile.has_code_language("bash"));

        for entry in &entries {
            let context = analyzer()
                .contexts()
                .iter()
                .find(|c| c.id == entry.context)
                .cloned()
                .expect("context exists");
            assert_eq!(entry.compatible, context.permits(Capability::ProcessExecution));
            if !entry.compatible {
                assert_eq!(
                    entry.violations,
                    vec![Violation::Capability(Capability::ProcessExecution)]
                );
            }
        }
    }

    #[test]
    fn test_non_shell_fences_are_not_process_execution() {
        let doc = document("docs", "```python\nprint(1)\n```\n```\nplain\n```\n");
        let profile = analyzer().profile(&doc);
        assert!(!profile.requires(Capability::ProcessExecution));
        assert_eq!(
            profile.code_languages.iter().collect::<Vec<_>>(),
            vec!["python"]
        );
    }

    #[test]
    fn test_closing_fence_does_not_capture_next_line() {
        let doc = document("docs", "```\nplain\n```\nbash is mentioned here\n");
        let profile = analyzer().profile(&doc);
        assert!(profile.code_languages.is_empty());
    }

    #[test]
    fn test_delegation_and_interactive_vocabulary() {
        let doc = document(
            "coordinator",
            "Delegates linting to a Sub-Agent, then asks the user before merging.",
        );
        let profile = analyzer().profile(&doc);
        assert!(profile.requires(Capability::TaskDelegation));
        assert!(profile.requires(Capability::InteractivePrompting));

        // "task" alone is not delegation vocabulary
        let plain = analyzer().profile(&document("plain", "Finish the task quickly."));
        assert!(plain.capabilities.is_empty());
    }

    #[test]
    fn test_interactive_prompting_is_not_gated() {
        let doc = document("asker", "Wait for confirmation before pushing.");
        let (profile, entries) = analyzer().analyze(&doc);
        assert!(profile.requires(Capability::InteractivePrompting));
        assert!(entries.iter().all(|entry| entry.compatible));
    }

    #[test]
    fn test_services_are_checked_individually() {
        let doc = document("tickets", "Uses the Atlassian MCP and DrawIO diagrams.");
        let analyzer = analyzer();
        let (profile, _) = analyzer.analyze(&doc);
        assert_eq!(
            profile.services.iter().collect::<Vec<_>>(),
            vec!["atlassian", "drawio"]
        );

        let git = ExecutionContext::new("git").with_service("atlassian");
        let entry = CompatibilityAnalyzer::check(&profile, &git);
        assert!(!entry.compatible);
        assert_eq!(entry.violations, vec![Violation::Service("drawio".into())]);
    }

    #[test]
    fn test_wider_context_is_compatible_with_more() {
        let narrow = ExecutionContext::new("narrow").with_service("atlassian");
        let wide = ExecutionContext::new("wide")
            .with_capability(Capability::ProcessExecution)
            .with_service("atlassian")
            .with_service("drawio");
        let analyzer = CompatibilityAnalyzer::new(vec![narrow, wide]).expect("patterns compile");

        let mut corpus = Corpus::new("skills");
        for (id, raw) in [
            ("a", "```sh\nls\n```"),
            ("b", "atlassian"),
            ("c", "drawio and ```zsh\nls\n```"),
            ("d", "delegate to a subagent"),
            ("e", "nothing special"),
        ] {
            corpus.insert(document(id, raw), vec![]);
        }

        let report = analyzer.analyze_corpus(&corpus);
        for id in corpus.ids() {
            let narrow_ok = report.entry(id, "narrow").expect("entry").compatible;
            let wide_ok = report.entry(id, "wide").expect("entry").compatible;
            assert!(!narrow_ok || wide_ok, "{id}");
        }
        assert_eq!(report.compatible_count("narrow"), 2);
        assert_eq!(report.compatible_count("wide"), 4);
        assert_eq!(report.capability_count(Capability::TaskDelegation), 1);
        assert_eq!(report.service_count("drawio"), 1);
        assert_eq!(report.violations().count(), 4);
    }

    #[test]
    fn test_default_table() {
        let contexts = default_contexts();
        assert_eq!(contexts.len(), 7);
        assert_eq!(contexts[0].id, "primary");
        assert!(Capability::ALL.iter().all(|c| contexts[0].permits(*c)));
        assert!(contexts[1..].iter().all(|c| c.capabilities.is_empty()));
        assert!(contexts
            .iter()
            .find(|c| c.id == "workflow-subagent")
            .is_some_and(|c| c.permits_service("atlassian") && !c.permits_service("drawio")));
    }
}
