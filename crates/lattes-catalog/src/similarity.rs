//! String similarity used for fuzzy journal-name matching.
//!
//! Scores are bounded to `[0, 1]`; higher is more similar. Thresholds in
//! configuration are expressed on this scale, so swapping the scorer means
//! recalibrating the threshold.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A bounded similarity over two strings.
pub trait SimilarityScorer: Send + Sync + fmt::Debug {
    /// Similarity of `candidate` (catalog side) to `query` (input side).
    fn similarity(&self, candidate: &str, query: &str) -> f64;

    /// Cheap upper bound on [`similarity`](Self::similarity). Candidates whose
    /// bound is under the threshold are never fully scored.
    fn upper_bound(&self, _candidate: &str, _query: &str) -> f64 {
        1.0
    }

    fn name(&self) -> &'static str;
}

/// Ratcliff–Obershelp "gestalt" ratio: `2·M / T` where `M` is the number of
/// characters in matching blocks found by recursively taking the longest
/// common substring, and `T` the total length of both strings.
///
/// Among equally long common substrings the one starting earliest in the
/// candidate, then earliest in the query, is taken.
#[derive(Debug, Clone, Copy, Default)]
pub struct SequenceRatio;

impl SequenceRatio {
    pub fn ratio(a: &str, b: &str) -> f64 {
        let a: Vec<char> = a.chars().collect();
        let b: Vec<char> = b.chars().collect();
        let total = a.len() + b.len();
        if total == 0 {
            return 1.0;
        }
        let matched = matching_chars(&a, &b);
        2.0 * matched as f64 / total as f64
    }

    /// Bound from lengths alone.
    pub fn real_quick_ratio(a: &str, b: &str) -> f64 {
        let la = a.chars().count();
        let lb = b.chars().count();
        if la + lb == 0 {
            return 1.0;
        }
        2.0 * la.min(lb) as f64 / (la + lb) as f64
    }

    /// Bound from the multiset intersection of characters.
    pub fn quick_ratio(a: &str, b: &str) -> f64 {
        let mut avail = std::collections::HashMap::<char, isize>::new();
        for c in b.chars() {
            *avail.entry(c).or_default() += 1;
        }
        let mut la = 0usize;
        let mut matches = 0usize;
        for c in a.chars() {
            la += 1;
            let n = avail.entry(c).or_default();
            if *n > 0 {
                matches += 1;
            }
            *n -= 1;
        }
        let total = la + b.chars().count();
        if total == 0 {
            return 1.0;
        }
        2.0 * matches as f64 / total as f64
    }
}

impl SimilarityScorer for SequenceRatio {
    fn similarity(&self, candidate: &str, query: &str) -> f64 {
        Self::ratio(candidate, query)
    }

    fn upper_bound(&self, candidate: &str, query: &str) -> f64 {
        let rq = Self::real_quick_ratio(candidate, query);
        if rq == 0.0 {
            return rq;
        }
        rq.min(Self::quick_ratio(candidate, query))
    }

    fn name(&self) -> &'static str {
        "sequence"
    }
}

/// Longest common block of `a[alo..ahi]` and `b[blo..bhi]` as
/// `(i, j, size)`.
fn longest_match(a: &[char], b: &[char], alo: usize, ahi: usize, blo: usize, bhi: usize) -> (usize, usize, usize) {
    let width = bhi - blo;
    let mut prev = vec![0usize; width + 1];
    let mut curr = vec![0usize; width + 1];
    let (mut best_i, mut best_j, mut best_size) = (alo, blo, 0usize);

    for i in alo..ahi {
        for j in blo..bhi {
            let col = j - blo + 1;
            if a[i] == b[j] {
                let k = prev[col - 1] + 1;
                curr[col] = k;
                if k > best_size {
                    best_i = i + 1 - k;
                    best_j = j + 1 - k;
                    best_size = k;
                }
            } else {
                curr[col] = 0;
            }
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    (best_i, best_j, best_size)
}

/// Total size of all matching blocks.
fn matching_chars(a: &[char], b: &[char]) -> usize {
    let mut matched = 0;
    let mut queue = vec![(0, a.len(), 0, b.len())];
    while let Some((alo, ahi, blo, bhi)) = queue.pop() {
        if alo >= ahi || blo >= bhi {
            continue;
        }
        let (i, j, k) = longest_match(a, b, alo, ahi, blo, bhi);
        if k == 0 {
            continue;
        }
        matched += k;
        queue.push((alo, i, blo, j));
        queue.push((i + k, ahi, j + k, bhi));
    }
    matched
}

/// Levenshtein distance normalised by the longer string, as `1 - d/len`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NormalizedLevenshtein;

impl SimilarityScorer for NormalizedLevenshtein {
    fn similarity(&self, candidate: &str, query: &str) -> f64 {
        strsim::normalized_levenshtein(candidate, query)
    }

    fn upper_bound(&self, candidate: &str, query: &str) -> f64 {
        let la = candidate.chars().count();
        let lb = query.chars().count();
        let longest = la.max(lb);
        if longest == 0 {
            return 1.0;
        }
        1.0 - la.abs_diff(lb) as f64 / longest as f64
    }

    fn name(&self) -> &'static str {
        "levenshtein"
    }
}

/// Scorer selection as it appears in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScorerKind {
    #[default]
    Sequence,
    Levenshtein,
}

impl ScorerKind {
    pub fn build(self) -> Box<dyn SimilarityScorer> {
        match self {
            ScorerKind::Sequence    => Box::new(SequenceRatio),
            ScorerKind::Levenshtein => Box::new(NormalizedLevenshtein),
        }
    }
}
