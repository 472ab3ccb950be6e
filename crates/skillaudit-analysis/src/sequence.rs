//! Sequence alignment ratio
//!
//! Finds the longest matching block between two character sequences, then
//! recurses on the unmatched pieces to its left and right. The similarity
//! ratio is `2 * matched / (len(a) + len(b))`.
//!
//! When `b` has 200 or more elements, elements occurring in more than
//! `len(b) / 100 + 1` positions are "popular": they never seed a match but
//! may still extend one. This keeps long, repetitive texts from degenerating
//! into single-character matches everywhere.

use std::collections::HashMap;

/// Minimum length of `b` for the popular-element heuristic
const AUTOJUNK_MIN_LEN: usize = 200;

/// A matching block: `a[a..a + size] == b[b..b + size]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Match {
    /// Start in `a`
    pub a: usize,
    /// Start in `b`
    pub b: usize,
    /// Block length
    pub size: usize,
}

/// Matcher over two character sequences
pub struct SequenceMatcher<'a> {
    a: &'a [char],
    b: &'a [char],
    /// Positions of each non-popular element of `b`, ascending
    b2j: HashMap<char, Vec<usize>>,
}

impl<'a> SequenceMatcher<'a> {
    /// Index `b` for matching against `a`
    #[must_use]
    pub fn new(a: &'a [char], b: &'a [char]) -> Self {
        let mut b2j: HashMap<char, Vec<usize>> = HashMap::new();
        for (j, &c) in b.iter().enumerate() {
            b2j.entry(c).or_default().push(j);
        }

        if b.len() >= AUTOJUNK_MIN_LEN {
            let limit = b.len() / 100 + 1;
            b2j.retain(|_, positions| positions.len() <= limit);
        }

        Self { a, b, b2j }
    }

    /// Longest matching block in `a[alo..ahi]` and `b[blo..bhi]`
    ///
    /// Ties go to the block starting earliest in `a`, then earliest in `b`.
    /// Returns a zero-size match at `(alo, blo)` when nothing matches.
    #[must_use]
    pub fn find_longest_match(&self, alo: usize, ahi: usize, blo: usize, bhi: usize) -> Match {
        let (a, b) = (self.a, self.b);
        let (mut best_i, mut best_j, mut best_size) = (alo, blo, 0);

        // j2len[j] = length of the match ending at a[i - 1] and b[j]
        let mut j2len: HashMap<usize, usize> = HashMap::new();
        let mut next_j2len: HashMap<usize, usize> = HashMap::new();

        for i in alo..ahi {
            next_j2len.clear();
            if let Some(positions) = self.b2j.get(&a[i]) {
                for &j in positions {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }
                    let k = j
                        .checked_sub(1)
                        .and_then(|prev| j2len.get(&prev))
                        .copied()
                        .unwrap_or(0)
                        + 1;
                    next_j2len.insert(j, k);
                    if k > best_size {
                        best_i = i + 1 - k;
                        best_j = j + 1 - k;
                        best_size = k;
                    }
                }
            }
            std::mem::swap(&mut j2len, &mut next_j2len);
        }

        // Popular elements never seed a match but can extend one
        while best_i > alo && best_j > blo && a[best_i - 1] == b[best_j - 1] {
            best_i -= 1;
            best_j -= 1;
            best_size += 1;
        }
        while best_i + best_size < ahi
            && best_j + best_size < bhi
            && a[best_i + best_size] == b[best_j + best_size]
        {
            best_size += 1;
        }

        Match {
            a: best_i,
            b: best_j,
            size: best_size,
        }
    }

    /// All matching blocks, sorted by position
    #[must_use]
    pub fn matching_blocks(&self) -> Vec<Match> {
        let mut blocks = Vec::new();
        let mut queue = vec![(0, self.a.len(), 0, self.b.len())];

        while let Some((alo, ahi, blo, bhi)) = queue.pop() {
            let m = self.find_longest_match(alo, ahi, blo, bhi);
            if m.size == 0 {
                continue;
            }

            blocks.push(m);
            if alo < m.a && blo < m.b {
                queue.push((alo, m.a, blo, m.b));
            }
            if m.a + m.size < ahi && m.b + m.size < bhi {
                queue.push((m.a + m.size, ahi, m.b + m.size, bhi));
            }
        }

        blocks.sort_unstable();
        blocks
    }

    /// Similarity ratio in [0, 1]; two empty sequences are identical
    #[must_use]
    pub fn ratio(&self) -> f64 {
        let total = self.a.len() + self.b.len();
        if total == 0 {
            return 1.0;
        }
        let matched: usize = self.matching_blocks().iter().map(|m| m.size).sum();
        2.0 * matched as f64 / total as f64
    }
}

/// Similarity ratio of two character sequences
#[must_use]
pub fn ratio(a: &[char], b: &[char]) -> f64 {
    SequenceMatcher::new(a, b).ratio()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn test_identical_and_empty() {
        assert!((ratio(&chars("abc"), &chars("abc")) - 1.0).abs() < f64::EPSILON);
        assert!((ratio(&[], &[]) - 1.0).abs() < f64::EPSILON);
        assert!(ratio(&chars("abc"), &[]).abs() < f64::EPSILON);
    }

    #[test]
    fn test_disjoint_alphabets() {
        assert!(ratio(&chars("eslint"), &chars("ruff")).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shared_suffix() {
        // "-linter" is the only common block
        let r = ratio(&chars("eslint-linter"), &chars("ruff-linter"));
        assert!((r - 14.0 / 24.0).abs() < 1e-12);
    }

    #[test]
    fn test_longest_match_prefers_earliest() {
        let a = chars("abxab");
        let b = chars("ab");
        let matcher = SequenceMatcher::new(&a, &b);
        assert_eq!(
            matcher.find_longest_match(0, a.len(), 0, b.len()),
            Match { a: 0, b: 0, size: 2 }
        );
    }

    #[test]
    fn test_matching_blocks_recurse_both_sides() {
        let a = chars("abcd-wxyz");
        let b = chars("abcd+wxyz");
        let matcher = SequenceMatcher::new(&a, &b);
        assert_eq!(
            matcher.matching_blocks(),
            vec![Match { a: 0, b: 0, size: 4 }, Match { a: 5, b: 5, size: 4 }]
        );
    }

    #[test]
    fn test_popular_elements_still_extend() {
        // 'a' is popular in b (well over 1% of 250 positions); the unique
        // 'z' seeds the match and the surrounding 'a's extend it
        let mut b = vec!['a'; 249];
        b.insert(100, 'z');
        let a = chars("aaazaaa");
        let matcher = SequenceMatcher::new(&a, &b);
        let m = matcher.find_longest_match(0, a.len(), 0, b.len());
        assert_eq!(m, Match { a: 0, b: 97, size: 7 });
    }
}
