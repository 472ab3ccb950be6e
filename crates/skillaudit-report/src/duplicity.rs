//! Duplicity matrix report

use crate::markdown::{list, Table, NONE};
use crate::template::Placeholders;
use skillaudit_analysis::SimilarityMatrix;
use skillaudit_types::{DuplicityBand, SimilarityScore};
use std::cmp::Reverse;
use std::collections::BTreeMap;

/// Pairs scoring at least this much count as high duplicity
pub const HIGH_DUPLICITY: u8 = 71;
/// Pairs scoring at least this much (and below [`HIGH_DUPLICITY`]) count as moderate
pub const MODERATE_DUPLICITY: u8 = 50;

const MOST_DUPLICATED_LIMIT: usize = 10;
const DISTINCTIVE_LIMIT: usize = 5;

/// Placeholder values for the duplicity report
#[must_use]
pub fn placeholders(matrix: &SimilarityMatrix) -> Placeholders {
    let mut ranked: Vec<&SimilarityScore> = matrix.pairs().iter().collect();
    ranked.sort_by(|a, b| {
        Reverse(a.score)
            .cmp(&Reverse(b.score))
            .then_with(|| a.first.cmp(&b.first))
            .then_with(|| a.second.cmp(&b.second))
    });

    let high: Vec<_> = ranked
        .iter()
        .copied()
        .filter(|pair| pair.score >= HIGH_DUPLICITY)
        .collect();
    let moderate: Vec<_> = ranked
        .iter()
        .copied()
        .filter(|pair| (MODERATE_DUPLICITY..HIGH_DUPLICITY).contains(&pair.score))
        .collect();

    let mut values = Placeholders::new();
    values
        .set("HIGH_DUP_COUNT", high.len())
        .set("MODERATE_DUP_COUNT", moderate.len())
        .set(
            "LOW_DUP_COUNT",
            ranked.len() - high.len() - moderate.len(),
        )
        .set("AVG_SIMILARITY", average_similarity(matrix))
        .set("SIMILARITY_MATRIX", matrix_table(matrix))
        .set("HIGH_DUP_TABLE", pair_table(&high))
        .set("MODERATE_DUP_TABLE", pair_table(&moderate))
        .set("MOST_DUPLICATED_TABLE", most_duplicated(matrix, &high))
        .set(
            "MERGE_CANDIDATES",
            candidates(&ranked, DuplicityBand::MergeCandidate),
        )
        .set(
            "CONSOLIDATION_CANDIDATES",
            candidates(&ranked, DuplicityBand::ConsolidationCandidate),
        )
        .set(
            "EXTRACTION_CANDIDATES",
            candidates(&ranked, DuplicityBand::ExtractionOpportunity),
        )
        .set("UNIQUE_SKILLS_TABLE", most_distinctive(matrix));
    values
}

/// Mean over the full `n * n` matrix, diagonal included
fn average_similarity(matrix: &SimilarityMatrix) -> usize {
    let n = matrix.len();
    if n == 0 {
        return 0;
    }
    let total: usize = (0..n)
        .flat_map(|i| matrix.row(i).iter())
        .map(|&score| usize::from(score))
        .sum();
    total / (n * n)
}

fn matrix_table(matrix: &SimilarityMatrix) -> String {
    let ids = matrix.ids();
    let mut table = Table::new(std::iter::once("Skill").chain(ids.iter().map(String::as_str)));

    for (i, id) in ids.iter().enumerate() {
        let cells = matrix.row(i).iter().map(|&score| {
            if score >= HIGH_DUPLICITY {
                format!("**{score}**")
            } else if score >= MODERATE_DUPLICITY {
                format!("*{score}*")
            } else {
                score.to_string()
            }
        });
        table.push(std::iter::once(id.clone()).chain(cells));
    }

    table.render_or("No skills found.")
}

fn pair_table(pairs: &[&SimilarityScore]) -> String {
    let mut table = Table::new(["Skill A", "Skill B", "Similarity", "Classification"]);
    for pair in pairs {
        table.push([
            pair.first.clone(),
            pair.second.clone(),
            format!("{}%", pair.score),
            pair.band().label().to_string(),
        ]);
    }
    table.render_or(NONE)
}

fn most_duplicated(matrix: &SimilarityMatrix, high: &[&SimilarityScore]) -> String {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for pair in high {
        *counts.entry(pair.first.as_str()).or_default() += 1;
        *counts.entry(pair.second.as_str()).or_default() += 1;
    }

    let mut ranked: Vec<(&str, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    let mut table = Table::new(["Rank", "Skill", "High-Duplicity Pairs", "Max Similarity"]);
    for (rank, (id, count)) in ranked.into_iter().take(MOST_DUPLICATED_LIMIT).enumerate() {
        table.push([
            (rank + 1).to_string(),
            id.to_string(),
            count.to_string(),
            format!("{}%", max_against_others(matrix, id)),
        ]);
    }
    table.render_or(NONE)
}

fn max_against_others(matrix: &SimilarityMatrix, id: &str) -> u8 {
    matrix
        .index_of(id)
        .and_then(|i| {
            matrix
                .row(i)
                .iter()
                .enumerate()
                .filter(|(j, _)| *j != i)
                .map(|(_, &score)| score)
                .max()
        })
        .unwrap_or(0)
}

fn candidates(ranked: &[&SimilarityScore], band: DuplicityBand) -> String {
    list(
        ranked
            .iter()
            .filter(|pair| pair.band() == band)
            .map(|pair| format!("{}/{}", pair.first, pair.second)),
    )
}

/// Lowest mean similarity to the other documents
fn most_distinctive(matrix: &SimilarityMatrix) -> String {
    let n = matrix.len();
    let mut table = Table::new(["Rank", "Skill", "Average Similarity"]);
    if n < 2 {
        return table.render_or(NONE);
    }

    let mut averages: Vec<(&str, usize)> = matrix
        .ids()
        .iter()
        .enumerate()
        .map(|(i, id)| {
            let others: usize = matrix
                .row(i)
                .iter()
                .enumerate()
                .filter(|(j, _)| *j != i)
                .map(|(_, &score)| usize::from(score))
                .sum();
            (id.as_str(), others / (n - 1))
        })
        .collect();
    averages.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(b.0)));

    for (rank, (id, average)) in averages.into_iter().take(DISTINCTIVE_LIMIT).enumerate() {
        table.push([(rank + 1).to_string(), id.to_string(), format!("{average}%")]);
    }
    table.render_or(NONE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use skillaudit_analysis::SimilarityScorer;
    use skillaudit_types::{Corpus, SkillDocument};

    fn matrix() -> SimilarityMatrix {
        let mut corpus = Corpus::new("skills");
        for (id, name, description) in [
            ("b-skill", "pr creator", "create pull requests"),
            ("a-skill", "pr creator", "create pull requests"),
            ("c-skill", "zzz", "xxx"),
        ] {
            let mut document = SkillDocument::new(id, id, "");
            document.metadata.name = name.to_string();
            document.metadata.description = description.to_string();
            corpus.insert(document, vec![]);
        }
        SimilarityScorer::new().compute(&corpus)
    }

    #[test]
    fn test_counts_and_candidates() {
        // a/b are identical; c shares no characters, only the empty sections (60)
        let values = placeholders(&matrix());

        assert_eq!(values.get("HIGH_DUP_COUNT"), Some("1"));
        assert_eq!(values.get("MODERATE_DUP_COUNT"), Some("2"));
        assert_eq!(values.get("LOW_DUP_COUNT"), Some("0"));
        assert_eq!(values.get("MERGE_CANDIDATES"), Some("a-skill/b-skill"));
        assert_eq!(values.get("CONSOLIDATION_CANDIDATES"), Some(NONE));
        assert_eq!(
            values.get("EXTRACTION_CANDIDATES"),
            Some("a-skill/c-skill, b-skill/c-skill")
        );
        // (100 * 5 + 60 * 4) / 9
        assert_eq!(values.get("AVG_SIMILARITY"), Some("82"));
    }

    #[test]
    fn test_matrix_is_lexicographic_and_bold() {
        let values = placeholders(&matrix());
        let table = values.get("SIMILARITY_MATRIX").unwrap_or_default();
        let lines: Vec<_> = table.lines().collect();

        assert_eq!(lines[0], "| Skill | a-skill | b-skill | c-skill |");
        assert_eq!(lines[2], "| a-skill | **100** | **100** | *60* |");
        assert!(lines[4].starts_with("| c-skill |"));
    }

    #[test]
    fn test_distinctive_ranks_lowest_first() {
        let values = placeholders(&matrix());
        let table = values.get("UNIQUE_SKILLS_TABLE").unwrap_or_default();
        assert!(table.lines().nth(2).is_some_and(|line| line.contains("c-skill")));
    }

    #[test]
    fn test_empty_matrix() {
        let values = placeholders(&SimilarityScorer::new().compute(&Corpus::new("skills")));
        assert_eq!(values.get("AVG_SIMILARITY"), Some("0"));
        assert_eq!(values.get("SIMILARITY_MATRIX"), Some("No skills found."));
        assert_eq!(values.get("HIGH_DUP_TABLE"), Some(NONE));
    }
}
