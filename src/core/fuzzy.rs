//! String-similarity strategies behind the [`FuzzyMatcher`] port.
//!
//! [`SequenceRatio`] is the default: the Ratcliff/Obershelp "gestalt" ratio
//! `2*M / (|a| + |b|)`, where `M` is the number of characters in the
//! recursively found longest common blocks. [`JaroWinkler`] is an
//! alternative for deployments that prefer prefix-weighted scores.

use crate::domain::ports::FuzzyMatcher;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Second sequences at least this long drop "popular" characters from the
/// block index, mirroring the classic sequence-matcher heuristic.
const AUTOJUNK_MIN_LEN: usize = 200;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchAlgorithm {
    #[default]
    SequenceRatio,
    JaroWinkler,
}

impl MatchAlgorithm {
    pub fn build(self) -> Box<dyn FuzzyMatcher> {
        match self {
            MatchAlgorithm::SequenceRatio => Box::new(SequenceRatio),
            MatchAlgorithm::JaroWinkler => Box::new(JaroWinkler),
        }
    }
}

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
        2.0 * matching_characters(&a, &b) as f64 / total as f64
    }
}

impl FuzzyMatcher for SequenceRatio {
    fn similarity(&self, a: &str, b: &str) -> f64 {
        Self::ratio(a, b)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct JaroWinkler;

impl FuzzyMatcher for JaroWinkler {
    fn similarity(&self, a: &str, b: &str) -> f64 {
        strsim::jaro_winkler(a, b)
    }
}

/// Whole-string match first, then every run of query tokens as long as the
/// candidate's token count. Lets a name be found inside a sentence.
pub fn contains_close_phrase(
    matcher: &dyn FuzzyMatcher,
    query: &str,
    candidate: &str,
    threshold: f64,
) -> bool {
    if candidate.trim().is_empty() {
        return false;
    }
    if matcher.is_close_match(query, &[candidate], threshold) {
        return true;
    }

    let width = candidate.split_whitespace().count();
    let tokens: Vec<&str> = query.split_whitespace().collect();
    if tokens.len() <= width {
        return false;
    }
    tokens
        .windows(width)
        .any(|window| matcher.is_close_match(&window.join(" "), &[candidate], threshold))
}

fn index_positions(b: &[char]) -> HashMap<char, Vec<usize>> {
    let mut b2j: HashMap<char, Vec<usize>> = HashMap::new();
    for (j, &c) in b.iter().enumerate() {
        b2j.entry(c).or_default().push(j);
    }

    if b.len() >= AUTOJUNK_MIN_LEN {
        let ntest = b.len() / 100 + 1;
        b2j.retain(|_, positions| positions.len() <= ntest);
    }
    b2j
}

fn find_longest_match(
    a: &[char],
    b: &[char],
    b2j: &HashMap<char, Vec<usize>>,
    (alo, ahi, blo, bhi): (usize, usize, usize, usize),
) -> (usize, usize, usize) {
    let (mut best_i, mut best_j, mut best_size) = (alo, blo, 0);

    // j2len[j] = length of the longest block ending at a[i-1], b[j]
    let mut j2len: HashMap<usize, usize> = HashMap::new();
    for (i, c) in a.iter().enumerate().take(ahi).skip(alo) {
        let mut next_j2len = HashMap::new();
        if let Some(positions) = b2j.get(c) {
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
        j2len = next_j2len;
    }

    // Popular characters are missing from the index; grow across them.
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

    (best_i, best_j, best_size)
}

fn matching_characters(a: &[char], b: &[char]) -> usize {
    let b2j = index_positions(b);
    let mut pending = vec![(0, a.len(), 0, b.len())];
    let mut matched = 0;

    while let Some(bounds) = pending.pop() {
        let (alo, ahi, blo, bhi) = bounds;
        let (i, j, k) = find_longest_match(a, b, &b2j, bounds);
        if k == 0 {
            continue;
        }
        matched += k;
        if alo < i && blo < j {
            pending.push((alo, i, blo, j));
        }
        if i + k < ahi && j + k < bhi {
            pending.push((i + k, ahi, j + k, bhi));
        }
    }
    matched
}
