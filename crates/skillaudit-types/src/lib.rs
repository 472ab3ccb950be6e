//! SkillAudit Types - Core types for the skill corpus auditor
//!
//! This module defines the data model shared by the loader, the three analyses
//! and the report generator.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::{Path, PathBuf};

// ============================================================================
// Documents
// ============================================================================

/// Metadata declared in the leading `---` block of a skill document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    pub name: String,
    pub description: String,
    pub license: String,
    pub compatibility: String,
    /// Every key that is not one of the typed fields above
    pub attributes: BTreeMap<String, String>,
}

impl Metadata {
    /// Store a `key: value` pair, routing well-known keys to their typed field
    pub fn insert(&mut self, key: &str, value: &str) {
        let value = value.to_string();
        match key {
            "name" => self.name = value,
            "description" => self.description = value,
            "license" => self.license = value,
            "compatibility" => self.compatibility = value,
            _ => {
                self.attributes.insert(key.to_string(), value);
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        match key {
            "name" => Some(self.name.as_str()),
            "description" => Some(self.description.as_str()),
            "license" => Some(self.license.as_str()),
            "compatibility" => Some(self.compatibility.as_str()),
            _ => self.attributes.get(key).map(String::as_str),
        }
        .filter(|v| !v.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_empty()
            && self.description.is_empty()
            && self.license.is_empty()
            && self.compatibility.is_empty()
            && self.attributes.is_empty()
    }
}

/// Recognized section headings
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SectionLabel {
    Capabilities,
    UseCases,
    Prerequisites,
    Steps,
    BestPractices,
    Examples,
    Troubleshooting,
    RelatedSkills,
}

impl SectionLabel {
    pub const ALL: [SectionLabel; 8] = [
        SectionLabel::Capabilities,
        SectionLabel::UseCases,
        SectionLabel::Prerequisites,
        SectionLabel::Steps,
        SectionLabel::BestPractices,
        SectionLabel::Examples,
        SectionLabel::Troubleshooting,
        SectionLabel::RelatedSkills,
    ];

    /// Sections every well-formed skill is expected to carry
    pub const EXPECTED: [SectionLabel; 3] = [
        SectionLabel::Capabilities,
        SectionLabel::UseCases,
        SectionLabel::Steps,
    ];

    /// Heading title as written in skill documents
    pub fn heading(self) -> &'static str {
        match self {
            SectionLabel::Capabilities => "What I do",
            SectionLabel::UseCases => "When to use me",
            SectionLabel::Prerequisites => "Prerequisites",
            SectionLabel::Steps => "Steps",
            SectionLabel::BestPractices => "Best Practices",
            SectionLabel::Examples => "Examples",
            SectionLabel::Troubleshooting => "Troubleshooting",
            SectionLabel::RelatedSkills => "Related Skills",
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            SectionLabel::Capabilities => "capabilities",
            SectionLabel::UseCases => "use-cases",
            SectionLabel::Prerequisites => "prerequisites",
            SectionLabel::Steps => "steps",
            SectionLabel::BestPractices => "best-practices",
            SectionLabel::Examples => "examples",
            SectionLabel::Troubleshooting => "troubleshooting",
            SectionLabel::RelatedSkills => "related-skills",
        }
    }

    /// Match a heading title against the vocabulary (case-insensitive, trailing `:` ignored)
    pub fn from_heading(title: &str) -> Option<Self> {
        let title = title.trim().trim_end_matches(':').trim();
        Self::ALL
            .into_iter()
            .find(|label| label.heading().eq_ignore_ascii_case(title))
    }
}

impl fmt::Display for SectionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A parsed skill document
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkillDocument {
    /// Unique identifier within the corpus (directory name or file stem)
    pub id: String,
    pub path: PathBuf,
    /// Full file content, metadata block included
    pub raw: String,
    pub metadata: Metadata,
    /// Section text, heading line included
    pub sections: BTreeMap<SectionLabel, String>,
}

impl SkillDocument {
    pub fn new(id: impl Into<String>, path: impl Into<PathBuf>, raw: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            path: path.into(),
            raw: raw.into(),
            metadata: Metadata::default(),
            sections: BTreeMap::new(),
        }
    }

    /// Section text, or an empty string when the heading was not found
    pub fn section(&self, label: SectionLabel) -> &str {
        self.sections.get(&label).map_or("", String::as_str)
    }

    /// Raw character count (Unicode scalar values)
    pub fn char_count(&self) -> usize {
        self.raw.chars().count()
    }
}

/// A non-fatal structural defect tolerated by the loader
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Degradation {
    MissingMetadata,
    /// Opening `---` without a closing marker
    UnterminatedMetadata,
    MalformedMetadataLine { line: usize, text: String },
    MissingSection { section: SectionLabel },
    InvalidUtf8,
    /// The file could not be read; the document is kept with empty content
    Unreadable { reason: String },
}

impl fmt::Display for Degradation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Degradation::MissingMetadata => write!(f, "no metadata block"),
            Degradation::UnterminatedMetadata => write!(f, "metadata block is not terminated"),
            Degradation::MalformedMetadataLine { line, text } => {
                write!(f, "malformed metadata line {}: {:?}", line, text)
            }
            Degradation::MissingSection { section } => {
                write!(f, "missing section '{}'", section.heading())
            }
            Degradation::InvalidUtf8 => write!(f, "invalid UTF-8 replaced"),
            Degradation::Unreadable { reason } => write!(f, "unreadable: {}", reason),
        }
    }
}

/// The immutable per-run corpus, shared by reference with every analysis
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    root: PathBuf,
    documents: BTreeMap<String, SkillDocument>,
    degraded: BTreeMap<String, Vec<Degradation>>,
}

impl Corpus {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            documents: BTreeMap::new(),
            degraded: BTreeMap::new(),
        }
    }

    /// Add a document. Returns `false` and leaves the corpus untouched when the id is taken.
    pub fn insert(&mut self, document: SkillDocument, degradations: Vec<Degradation>) -> bool {
        if self.documents.contains_key(&document.id) {
            return false;
        }
        if !degradations.is_empty() {
            self.degraded.insert(document.id.clone(), degradations);
        }
        self.documents.insert(document.id.clone(), document);
        true
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn get(&self, id: &str) -> Option<&SkillDocument> {
        self.documents.get(id)
    }

    /// Documents in lexicographic identifier order
    pub fn documents(&self) -> impl Iterator<Item = &SkillDocument> {
        self.documents.values()
    }

    /// Identifiers in lexicographic order
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.documents.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Degraded documents and what was wrong with each
    pub fn degraded(&self) -> &BTreeMap<String, Vec<Degradation>> {
        &self.degraded
    }
}

// ============================================================================
// Similarity
// ============================================================================

/// A weighted field compared by the similarity scorer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SimilarityField {
    Name,
    Description,
    Capabilities,
    UseCases,
    Steps,
}

impl SimilarityField {
    /// Fields in summation order
    pub const ALL: [SimilarityField; 5] = [
        SimilarityField::Name,
        SimilarityField::Description,
        SimilarityField::Capabilities,
        SimilarityField::UseCases,
        SimilarityField::Steps,
    ];

    pub fn weight(self) -> f64 {
        match self {
            SimilarityField::Name => 0.15,
            SimilarityField::Description => 0.25,
            SimilarityField::Capabilities => 0.30,
            SimilarityField::UseCases => 0.20,
            SimilarityField::Steps => 0.10,
        }
    }

    /// Extract the raw (not yet normalized) field text from a document
    pub fn text(self, document: &SkillDocument) -> &str {
        match self {
            SimilarityField::Name => &document.metadata.name,
            SimilarityField::Description => &document.metadata.description,
            SimilarityField::Capabilities => document.section(SectionLabel::Capabilities),
            SimilarityField::UseCases => document.section(SectionLabel::UseCases),
            SimilarityField::Steps => document.section(SectionLabel::Steps),
        }
    }
}

/// Per-field similarity ratios in [0, 1], before weighting
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct FieldScores {
    pub name: f64,
    pub description: f64,
    pub capabilities: f64,
    pub use_cases: f64,
    pub steps: f64,
}

impl FieldScores {
    /// All fields identical
    pub fn identical() -> Self {
        Self {
            name: 1.0,
            description: 1.0,
            capabilities: 1.0,
            use_cases: 1.0,
            steps: 1.0,
        }
    }

    pub fn get(&self, field: SimilarityField) -> f64 {
        match field {
            SimilarityField::Name => self.name,
            SimilarityField::Description => self.description,
            SimilarityField::Capabilities => self.capabilities,
            SimilarityField::UseCases => self.use_cases,
            SimilarityField::Steps => self.steps,
        }
    }

    pub fn set(&mut self, field: SimilarityField, ratio: f64) {
        match field {
            SimilarityField::Name => self.name = ratio,
            SimilarityField::Description => self.description = ratio,
            SimilarityField::Capabilities => self.capabilities = ratio,
            SimilarityField::UseCases => self.use_cases = ratio,
            SimilarityField::Steps => self.steps = ratio,
        }
    }
}

/// Duplicity classification bands
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DuplicityBand {
    MergeCandidate,
    ConsolidationCandidate,
    ExtractionOpportunity,
    Distinct,
}

impl DuplicityBand {
    pub fn from_score(score: u8) -> Self {
        match score {
            86.. => DuplicityBand::MergeCandidate,
            71..=85 => DuplicityBand::ConsolidationCandidate,
            50..=70 => DuplicityBand::ExtractionOpportunity,
            _ => DuplicityBand::Distinct,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DuplicityBand::MergeCandidate => "merge candidate",
            DuplicityBand::ConsolidationCandidate => "consolidation candidate",
            DuplicityBand::ExtractionOpportunity => "extraction-opportunity",
            DuplicityBand::Distinct => "distinct",
        }
    }
}

impl fmt::Display for DuplicityBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Score of one unordered document pair; `first` sorts before `second`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimilarityScore {
    pub first: String,
    pub second: String,
    pub score: u8,
    pub fields: FieldScores,
}

impl SimilarityScore {
    pub fn band(&self) -> DuplicityBand {
        DuplicityBand::from_score(self.score)
    }
}

// ============================================================================
// Token cost
// ============================================================================

/// Token budget classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TokenStatus {
    Ok,
    Warning,
    Critical,
}

impl TokenStatus {
    pub const WARNING_ABOVE: usize = 2000;
    pub const CRITICAL_ABOVE: usize = 3000;

    pub fn from_tokens(tokens: usize) -> Self {
        if tokens > Self::CRITICAL_ABOVE {
            TokenStatus::Critical
        } else if tokens > Self::WARNING_ABOVE {
            TokenStatus::Warning
        } else {
            TokenStatus::Ok
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TokenStatus::Ok => "OK",
            TokenStatus::Warning => "WARNING",
            TokenStatus::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for TokenStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Estimated load cost of one document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenEstimate {
    pub id: String,
    pub char_count: usize,
    pub tokens: usize,
    pub status: TokenStatus,
    pub code_blocks: usize,
    pub line_count: usize,
    pub recommendation: Option<String>,
}

// ============================================================================
// Compatibility
// ============================================================================

/// Capability a skill may require from its execution context
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Capability {
    ProcessExecution,
    TaskDelegation,
    InteractivePrompting,
}

impl Capability {
    pub const ALL: [Capability; 3] = [
        Capability::ProcessExecution,
        Capability::TaskDelegation,
        Capability::InteractivePrompting,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Capability::ProcessExecution => "process-execution",
            Capability::TaskDelegation => "task-delegation",
            Capability::InteractivePrompting => "interactive-prompting",
        }
    }

    /// Whether a missing permission for this capability makes a skill incompatible
    pub fn is_gated(self) -> bool {
        matches!(
            self,
            Capability::ProcessExecution | Capability::TaskDelegation
        )
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Requirement signals detected in one document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CapabilityProfile {
    pub id: String,
    pub capabilities: BTreeSet<Capability>,
    /// Named external services referenced by the document
    pub services: BTreeSet<String>,
    /// Languages tagged on fenced code blocks (lower-cased)
    pub code_languages: BTreeSet<String>,
}

impl CapabilityProfile {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn requires(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }

    pub fn uses_service(&self, service: &str) -> bool {
        self.services.contains(service)
    }

    pub fn has_code_language(&self, language: &str) -> bool {
        self.code_languages.contains(language)
    }
}

/// A named profile of permitted capabilities and services
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionContext {
    pub id: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub capabilities: BTreeSet<Capability>,
    #[serde(default)]
    pub services: BTreeSet<String>,
}

impl ExecutionContext {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            description: String::new(),
            capabilities: BTreeSet::new(),
            services: BTreeSet::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_capability(mut self, capability: Capability) -> Self {
        self.capabilities.insert(capability);
        self
    }

    pub fn with_service(mut self, service: impl Into<String>) -> Self {
        self.services.insert(service.into());
        self
    }

    pub fn permits(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }

    pub fn permits_service(&self, service: &str) -> bool {
        self.services.contains(service)
    }
}

/// A constraint a document breaks in a given context
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "kebab-case")]
pub enum Violation {
    Capability(Capability),
    Service(String),
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::Capability(capability) => write!(f, "requires {}", capability),
            Violation::Service(service) => write!(f, "uses service '{}'", service),
        }
    }
}

/// Compatibility verdict of one (document, context) pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompatibilityEntry {
    pub document: String,
    pub context: String,
    pub compatible: bool,
    pub violations: Vec<Violation>,
}

impl CompatibilityEntry {
    pub fn new(
        document: impl Into<String>,
        context: impl Into<String>,
        violations: Vec<Violation>,
    ) -> Self {
        Self {
            document: document.into(),
            context: context.into(),
            compatible: violations.is_empty(),
            violations,
        }
    }
}
