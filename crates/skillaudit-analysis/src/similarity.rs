//! Duplicity scoring
//!
//! Each document is reduced once to its canonical field texts (lower-cased,
//! trimmed). Every unordered pair is then scored exactly once, with the
//! lexicographically smaller identifier as the first operand, and the result
//! is mirrored. The alignment ratio is not symmetric in general, so this
//! fixed operand order is what makes the matrix symmetric.

use crate::pairs::{pair_count, UnorderedPairs};
use crate::sequence::ratio;
use skillaudit_types::{Corpus, FieldScores, SimilarityField, SimilarityScore, SkillDocument};
use tracing::{debug, info};

/// Absorbs floating-point error so that identical fields sum to exactly 100
const SCORE_EPSILON: f64 = 1e-6;

/// `(row, column, score, detail)` of one scored pair
type ScoredPair = (usize, usize, u8, FieldScores);

/// Canonical field text of one document
#[derive(Debug, Clone)]
pub struct CanonicalFields {
    id: String,
    /// Indexed like [`SimilarityField::ALL`]
    fields: [Vec<char>; 5],
}

impl CanonicalFields {
    /// Normalize every scored field of `document`
    #[must_use]
    pub fn from_document(document: &SkillDocument) -> Self {
        Self {
            id: document.id.clone(),
            fields: SimilarityField::ALL
                .map(|field| field.text(document).trim().to_lowercase().chars().collect()),
        }
    }

    /// Document identifier
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }
}

/// Score two canonical documents in the given operand order
#[must_use]
pub fn score_fields(a: &CanonicalFields, b: &CanonicalFields) -> (u8, FieldScores) {
    let mut fields = FieldScores::default();
    let mut total = 0.0;

    for (index, field) in SimilarityField::ALL.into_iter().enumerate() {
        let r = ratio(&a.fields[index], &b.fields[index]);
        fields.set(field, r);
        total += r * field.weight();
    }

    (to_percent(total), fields)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_percent(total: f64) -> u8 {
    (total * 100.0 + SCORE_EPSILON).floor().clamp(0.0, 100.0) as u8
}

/// Dense, symmetric score matrix over a corpus
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityMatrix {
    /// Identifiers in lexicographic order
    ids: Vec<String>,
    /// Row-major `n * n` scores
    cells: Vec<u8>,
    /// One entry per unordered pair, in pair order
    pairs: Vec<SimilarityScore>,
}

impl SimilarityMatrix {
    /// Identifiers in lexicographic order; row and column order of the matrix
    #[must_use]
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    /// Number of documents
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether the matrix covers no documents
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Score at row `i`, column `j`
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    #[must_use]
    pub fn score_at(&self, i: usize, j: usize) -> u8 {
        self.cells[i * self.ids.len() + j]
    }

    /// Score between two documents by identifier
    #[must_use]
    pub fn score(&self, a: &str, b: &str) -> Option<u8> {
        let i = self.index_of(a)?;
        let j = self.index_of(b)?;
        Some(self.score_at(i, j))
    }

    /// Row of scores for the document at index `i`
    #[must_use]
    pub fn row(&self, i: usize) -> &[u8] {
        let n = self.ids.len();
        &self.cells[i * n..(i + 1) * n]
    }

    /// Position of `id` in [`ids`](Self::ids)
    #[must_use]
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.ids.binary_search_by(|probe| probe.as_str().cmp(id)).ok()
    }

    /// Every unordered pair with its per-field detail
    #[must_use]
    pub fn pairs(&self) -> &[SimilarityScore] {
        &self.pairs
    }
}

/// Pairwise duplicity scorer
#[derive(Debug, Clone)]
pub struct SimilarityScorer {
    workers: usize,
}

impl SimilarityScorer {
    /// Sequential scorer
    #[must_use]
    pub fn new() -> Self {
        Self { workers: 1 }
    }

    /// Spread pair scoring over `workers` threads (1 = sequential)
    #[must_use]
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Score a single pair of documents
    #[must_use]
    pub fn score_pair(&self, a: &SkillDocument, b: &SkillDocument) -> SimilarityScore {
        let (first, second) = if a.id <= b.id { (a, b) } else { (b, a) };

        if first.id == second.id {
            return SimilarityScore {
                first: first.id.clone(),
                second: second.id.clone(),
                score: 100,
                fields: FieldScores::identical(),
            };
        }

        let (score, fields) = score_fields(
            &CanonicalFields::from_document(first),
            &CanonicalFields::from_document(second),
        );
        SimilarityScore {
            first: first.id.clone(),
            second: second.id.clone(),
            score,
            fields,
        }
    }

    /// Score every pair in the corpus
    #[must_use]
    pub fn compute(&self, corpus: &Corpus) -> SimilarityMatrix {
        let canonical: Vec<CanonicalFields> = corpus
            .documents()
            .map(CanonicalFields::from_document)
            .collect();
        let n = canonical.len();

        info!(
            "Calculating duplicity matrix: {} skills, {} pairs, {} worker(s)",
            n,
            pair_count(n),
            self.workers
        );

        let scored: Vec<ScoredPair> = if self.workers <= 1 || pair_count(n) < 2 {
            score_range(&canonical, UnorderedPairs::new(n))
        } else {
            let ranges = UnorderedPairs::partition(n, self.workers);
            std::thread::scope(|scope| {
                let handles: Vec<_> = ranges
                    .into_iter()
                    .map(|pairs| {
                        let canonical = &canonical;
                        scope.spawn(move || score_range(canonical, pairs))
                    })
                    .collect();

                // Joining every handle is the completion barrier
                handles
                    .into_iter()
                    .flat_map(|handle| {
                        handle
                            .join()
                            .unwrap_or_else(|panic| std::panic::resume_unwind(panic))
                    })
                    .collect()
            })
        };

        let mut cells = vec![0u8; n * n];
        for i in 0..n {
            cells[i * n + i] = 100;
        }

        let mut pairs = Vec::with_capacity(scored.len());
        for (i, j, score, fields) in scored {
            cells[i * n + j] = score;
            cells[j * n + i] = score;
            pairs.push(SimilarityScore {
                first: canonical[i].id.clone(),
                second: canonical[j].id.clone(),
                score,
                fields,
            });
        }

        info!("Duplicity matrix calculated");
        SimilarityMatrix {
            ids: canonical.into_iter().map(|c| c.id).collect(),
            cells,
            pairs,
        }
    }
}

impl Default for SimilarityScorer {
    fn default() -> Self {
        Self::new()
    }
}

fn score_range(canonical: &[CanonicalFields], pairs: UnorderedPairs) -> Vec<ScoredPair> {
    pairs
        .map(|(i, j)| {
            let (score, fields) = score_fields(&canonical[i], &canonical[j]);
            debug!("{} / {}: {}", canonical[i].id, canonical[j].id, score);
            (i, j, score, fields)
        })
        .collect()
}
