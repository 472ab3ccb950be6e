//! Token optimization report

use crate::markdown::{list, percent, Table, NONE};
use crate::template::Placeholders;
use chrono::{DateTime, Duration, Local};
use skillaudit_analysis::tokens::estimated_savings;
use skillaudit_analysis::{SavingsImpact, SkillCategory};
use skillaudit_types::{TokenEstimate, TokenStatus};
use std::collections::BTreeMap;

/// Documents with more code blocks than this are code-block optimization targets
const CODE_BLOCK_TARGET: usize = 3;
/// Documents longer than this (in characters) are listed as verbose
const VERBOSE_CHARS: usize = 6000;
/// Share of a verbose document's characters expected to go when it is tightened
const VERBOSE_SAVINGS_PERCENT: usize = 15;
/// Days until the next suggested review
const REVIEW_INTERVAL_DAYS: i64 = 30;

/// Placeholder values for the token report
///
/// `estimates` must be in identifier order.
#[must_use]
pub fn placeholders(estimates: &[TokenEstimate], at: &DateTime<Local>) -> Placeholders {
    let n = estimates.len();
    let total: usize = estimates.iter().map(|e| e.tokens).sum();
    let critical = count_status(estimates, TokenStatus::Critical);
    let warning = count_status(estimates, TokenStatus::Warning);
    let oversized = critical + warning;
    let code_heavy: Vec<&TokenEstimate> = estimates
        .iter()
        .filter(|e| e.code_blocks > CODE_BLOCK_TARGET)
        .collect();
    let verbose: Vec<&TokenEstimate> = estimates
        .iter()
        .filter(|e| e.char_count > VERBOSE_CHARS)
        .collect();

    let mut values = Placeholders::new();
    values
        .set("TOTAL_TOKENS", total)
        .set("TOTAL_MB", millions(total))
        .set("AVG_TOKENS", if n == 0 { 0 } else { total / n })
        .set("OVERSIZED_COUNT", oversized)
        .set("OVERSIZED_PERCENT", percent(oversized, n))
        .set("WARNING_COUNT", warning)
        .set("CRITICAL_COUNT", critical)
        .set("CRITICAL_PERCENT", percent(critical, n))
        .set("SKILL_TOKEN_TABLE", skill_table(estimates))
        .set(
            "CRITICAL_SKILLS_TABLE",
            status_table(estimates, TokenStatus::Critical),
        )
        .set(
            "OVERSIZED_SKILLS_TABLE",
            status_table(estimates, TokenStatus::Warning),
        )
        .set("CATEGORY_TABLE", category_table(estimates, total))
        .set("HIGH_IMPACT_TARGETS", targets(estimates, SavingsImpact::High))
        .set(
            "MEDIUM_IMPACT_TARGETS",
            targets(estimates, SavingsImpact::Medium),
        )
        .set("LOW_IMPACT_TARGETS", targets(estimates, SavingsImpact::Low))
        .set("CODE_BLOCK_SKILLS", list(code_heavy.iter().map(|e| e.id.as_str())))
        .set("CODE_BLOCK_OPT_COUNT", code_heavy.len())
        .set(
            "CODE_BLOCK_SAVINGS",
            code_heavy
                .iter()
                .map(|e| (e.code_blocks / 2) * 150)
                .sum::<usize>(),
        )
        .set(
            "CODE_BLOCK_FILES",
            code_heavy.iter().map(|e| e.code_blocks / 2).sum::<usize>(),
        )
        .set("VERBOSE_SKILLS", list(verbose.iter().map(|e| e.id.as_str())))
        .set("VERBOSE_OPT_COUNT", verbose.len())
        .set(
            "VERBOSE_SAVINGS",
            verbose.iter().map(|e| e.char_count).sum::<usize>() * VERBOSE_SAVINGS_PERCENT / 100,
        )
        .set(
            "TOTAL_CODE_BLOCKS",
            estimates.iter().map(|e| e.code_blocks).sum::<usize>(),
        )
        .set(
            "TOTAL_LINES",
            estimates.iter().map(|e| e.line_count).sum::<usize>(),
        )
        .set("TARGET_TOTAL_TOKENS", total * 8 / 10)
        .set(
            "NEXT_REVIEW_DATE",
            (*at + Duration::days(REVIEW_INTERVAL_DAYS)).format("%Y-%m-%d"),
        );
    values
}

/// Token count in millions, two decimals
#[allow(clippy::cast_precision_loss)]
fn millions(tokens: usize) -> String {
    format!("{:.2}", tokens as f64 / 1_000_000.0)
}

fn count_status(estimates: &[TokenEstimate], status: TokenStatus) -> usize {
    estimates.iter().filter(|e| e.status == status).count()
}

fn skill_table(estimates: &[TokenEstimate]) -> String {
    let mut table = Table::new([
        "Skill",
        "Characters",
        "Tokens",
        "Status",
        "Code Blocks",
        "Category",
        "Recommendation",
    ]);
    for e in estimates {
        table.push([
            e.id.clone(),
            e.char_count.to_string(),
            e.tokens.to_string(),
            e.status.to_string(),
            e.code_blocks.to_string(),
            SkillCategory::classify(&e.id).to_string(),
            e.recommendation.clone().unwrap_or_else(|| "-".to_string()),
        ]);
    }
    table.render_or(NONE)
}

fn status_table(estimates: &[TokenEstimate], status: TokenStatus) -> String {
    let mut table = Table::new(["Skill", "Characters", "Tokens", "Code Blocks", "Category"]);
    for e in estimates.iter().filter(|e| e.status == status) {
        table.push([
            e.id.clone(),
            e.char_count.to_string(),
            e.tokens.to_string(),
            e.code_blocks.to_string(),
            SkillCategory::classify(&e.id).to_string(),
        ]);
    }
    table.render_or(NONE)
}

fn category_table(estimates: &[TokenEstimate], total: usize) -> String {
    let mut categories: BTreeMap<&'static str, (SkillCategory, usize, usize)> = BTreeMap::new();
    for e in estimates {
        let category = SkillCategory::classify(&e.id);
        let entry = categories.entry(category.as_str()).or_insert((category, 0, 0));
        entry.1 += 1;
        entry.2 += e.tokens;
    }

    let mut table = Table::new([
        "Category",
        "Skills",
        "Avg Tokens",
        "Total Tokens",
        "Share",
        "Status",
    ]);
    for (label, (category, count, tokens)) in categories {
        let average = tokens / count;
        let status = if average > category.token_budget() {
            TokenStatus::Warning
        } else {
            TokenStatus::Ok
        };
        table.push([
            label.to_string(),
            count.to_string(),
            average.to_string(),
            tokens.to_string(),
            format!("{}%", percent(tokens, total)),
            status.to_string(),
        ]);
    }
    table.render_or(NONE)
}

/// Targets in one impact bucket, largest savings first
fn targets(estimates: &[TokenEstimate], impact: SavingsImpact) -> String {
    let mut ranked: Vec<(usize, &TokenEstimate)> = estimates
        .iter()
        .map(|e| (estimated_savings(e), e))
        .filter(|(savings, _)| SavingsImpact::from_savings(*savings) == impact)
        .collect();
    ranked.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.id.cmp(&b.1.id)));

    let mut table = Table::new(["Skill", "Est. Savings", "Tokens", "Code Blocks", "Characters"]);
    for (savings, e) in ranked {
        table.push([
            e.id.clone(),
            format!("~{savings}"),
            e.tokens.to_string(),
            e.code_blocks.to_string(),
            e.char_count.to_string(),
        ]);
    }
    table.render_or(NONE)
}
