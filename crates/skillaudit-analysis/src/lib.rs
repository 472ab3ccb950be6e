//! `SkillAudit` Analysis Library
//!
//! The three corpus analyses. Each one takes the immutable [`Corpus`] by
//! reference and owns its output; none depends on another.
//!
//! - [`similarity`]: weighted pairwise duplicity matrix
//! - [`tokens`]: per-document token cost estimates
//! - [`compatibility`]: capability signals checked against execution contexts
//!
//! [`Corpus`]: skillaudit_types::Corpus

#![deny(missing_docs)]

pub mod category;
pub mod compatibility;
pub mod pairs;
pub mod sequence;
pub mod similarity;
pub mod tokens;

pub use category::SkillCategory;
pub use compatibility::{default_contexts, CompatibilityAnalyzer, CompatibilityReport};
pub use pairs::UnorderedPairs;
pub use similarity::{SimilarityMatrix, SimilarityScorer};
pub use tokens::{estimate, estimate_corpus, SavingsImpact};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        CompatibilityAnalyzer, CompatibilityReport, SimilarityMatrix, SimilarityScorer,
        SkillCategory,
    };
}
