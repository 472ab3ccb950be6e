//! Unordered index pairs
//!
//! The pairwise scorer walks `(i, j)` with `i < j < n` as a flat, lazily
//! produced sequence. Every pair has a linear index in `0..pair_count(n)`,
//! so the sequence can be restarted at any point and split into disjoint
//! contiguous ranges for parallel workers.

use std::iter::FusedIterator;
use std::ops::Range;

/// Number of unordered pairs over `n` items
#[must_use]
pub fn pair_count(n: usize) -> usize {
    n * n.saturating_sub(1) / 2
}

/// The pair at linear index `k` (row-major order), if in range
#[must_use]
pub fn pair_at(n: usize, k: usize) -> Option<(usize, usize)> {
    let mut k = k;
    for i in 0..n {
        let row = n - 1 - i;
        if k < row {
            return Some((i, i + 1 + k));
        }
        k -= row;
    }
    None
}

/// Lazy sequence of unordered pairs `(i, j)`, `i < j < n`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnorderedPairs {
    n: usize,
    /// Linear index of the next pair
    next: usize,
    /// Linear index one past the last pair
    end: usize,
    i: usize,
    j: usize,
}

impl UnorderedPairs {
    /// All pairs over `n` items
    #[must_use]
    pub fn new(n: usize) -> Self {
        Self::range(n, 0..pair_count(n))
    }

    /// The pairs whose linear indices fall in `range` (clamped to the valid span)
    #[must_use]
    pub fn range(n: usize, range: Range<usize>) -> Self {
        let end = range.end.min(pair_count(n));
        let next = range.start.min(end);
        let (i, j) = pair_at(n, next).unwrap_or((n, n));
        Self { n, next, end, i, j }
    }

    /// Split all pairs over `n` items into at most `parts` contiguous, disjoint ranges
    ///
    /// Together the ranges cover every pair exactly once.
    #[must_use]
    pub fn partition(n: usize, parts: usize) -> Vec<Self> {
        let total = pair_count(n);
        let chunk = total.div_ceil(parts.max(1)).max(1);

        (0..total)
            .step_by(chunk)
            .map(|start| Self::range(n, start..start + chunk))
            .collect()
    }
}

impl Iterator for UnorderedPairs {
    type Item = (usize, usize);

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.end {
            return None;
        }

        let item = (self.i, self.j);
        self.next += 1;
        self.j += 1;
        if self.j >= self.n {
            self.i += 1;
            self.j = self.i + 1;
        }

        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.end - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for UnorderedPairs {}

impl FusedIterator for UnorderedPairs {}
