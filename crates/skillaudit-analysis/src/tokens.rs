//! Token cost estimation
//!
//! Four characters per token, plus 10% for structural overhead, rounded up.

use skillaudit_types::{Corpus, SkillDocument, TokenEstimate, TokenStatus};
use tracing::info;

/// Fenced code block delimiter
const FENCE: &str = "```";
/// More blocks than this earns an extraction recommendation
pub const CODE_BLOCK_LIMIT: usize = 6;
/// More characters than this earns a split recommendation
pub const SPLIT_CHAR_LIMIT: usize = 8000;
/// Tokens saved per extracted code block
const TOKENS_PER_EXTRACTED_BLOCK: usize = 150;

/// `ceil(chars / 4 * 1.1)` in exact integer arithmetic
#[must_use]
pub fn estimate_tokens(char_count: usize) -> usize {
    (char_count * 11).div_ceil(40)
}

/// Number of fenced code blocks (delimiters / 2)
#[must_use]
pub fn count_code_blocks(text: &str) -> usize {
    text.matches(FENCE).count() / 2
}

/// Optimization hint for oversized or code-heavy documents
#[must_use]
pub fn recommendation(code_blocks: usize, char_count: usize) -> Option<String> {
    let mut hints = Vec::new();
    if code_blocks > CODE_BLOCK_LIMIT {
        hints.push(format!(
            "Extract {} code blocks into reference files",
            code_blocks / 2
        ));
    }
    if char_count > SPLIT_CHAR_LIMIT {
        hints.push("Consider splitting into smaller skills".to_string());
    }
    (!hints.is_empty()).then(|| hints.join("; "))
}

/// Estimate the load cost of one document
#[must_use]
pub fn estimate(document: &SkillDocument) -> TokenEstimate {
    let char_count = document.char_count();
    let tokens = estimate_tokens(char_count);
    let code_blocks = count_code_blocks(&document.raw);

    TokenEstimate {
        id: document.id.clone(),
        char_count,
        tokens,
        status: TokenStatus::from_tokens(tokens),
        code_blocks,
        line_count: document.raw.lines().count(),
        recommendation: recommendation(code_blocks, char_count),
    }
}

/// Estimate every document, in identifier order
#[must_use]
pub fn estimate_corpus(corpus: &Corpus) -> Vec<TokenEstimate> {
    let estimates: Vec<_> = corpus.documents().map(estimate).collect();
    info!("Token analysis complete for {} skills", estimates.len());
    estimates
}

/// Rough number of tokens an optimization pass could save
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn estimated_savings(estimate: &TokenEstimate) -> usize {
    let mut savings = 0.0;
    if estimate.code_blocks > 3 {
        savings += ((estimate.code_blocks / 2) * TOKENS_PER_EXTRACTED_BLOCK) as f64;
    }
    if estimate.char_count > 5000 {
        savings += estimate.char_count as f64 * 0.02;
    }
    savings as usize
}

/// Priority bucket for optimization targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SavingsImpact {
    /// More than 200 tokens
    High,
    /// More than 100 tokens
    Medium,
    /// Anything above zero
    Low,
    /// Nothing to gain
    None,
}

impl SavingsImpact {
    /// Bucket for a savings figure
    #[must_use]
    pub fn from_savings(savings: usize) -> Self {
        match savings {
            201.. => SavingsImpact::High,
            101..=200 => SavingsImpact::Medium,
            1..=100 => SavingsImpact::Low,
            0 => SavingsImpact::None,
        }
    }
}
