//! Table resolution.
//!
//! An entity term found in the query names the table outright. Otherwise
//! every table is scored against the query tokens:
//!
//! ```text
//! score = 0.6 * |tokens ∩ keywords| / |keywords|
//!       + 0.4 * Σ similarity(token, keyword)   for pairs with similarity > 0.7
//! ```
//!
//! Chinese has no word boundaries, so each CJK character is its own token;
//! ASCII letters, digits and underscores form run tokens.

use regex::Regex;
use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::LazyLock;
use tracing::debug;

use crate::config::EntityMapping;
use crate::metadata::SchemaProvider;

static ASCII_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[a-z0-9_]+").unwrap());

const OVERLAP_WEIGHT: f64 = 0.6;
const SIMILARITY_WEIGHT: f64 = 0.4;
const SIMILARITY_THRESHOLD: f64 = 0.7;

/// A candidate table and how well it matched.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableMatch {
    pub table: String,
    /// In `[0, 1]`; 1.0 for an entity override.
    pub score: f64,
}

impl TableMatch {
    pub fn new(table: &str, score: f64) -> Self {
        Self {
            table: table.to_string(),
            score,
        }
    }
}

/// Resolves a question to ranked candidate tables.
pub struct TableResolver<'a, P: SchemaProvider + ?Sized> {
    entities: &'a EntityMapping,
    provider: &'a P,
}

impl<'a, P: SchemaProvider + ?Sized> TableResolver<'a, P> {
    pub fn new(entities: &'a EntityMapping, provider: &'a P) -> Self {
        Self { entities, provider }
    }

    /// Candidate tables, best first. Empty when nothing matches.
    pub fn resolve(&self, query: &str) -> Vec<TableMatch> {
        if let Some(table) = self.entities.lookup(query) {
            debug!(table, "entity override");
            return vec![TableMatch::new(table, 1.0)];
        }
        self.fuzzy_matches(query)
    }

    /// Score every table against the query, ignoring entity overrides.
    pub fn fuzzy_matches(&self, query: &str) -> Vec<TableMatch> {
        let tokens = tokenize(query);

        let mut scored: Vec<(&str, f64)> = self
            .provider
            .table_keywords()
            .iter()
            .map(|entry| (entry.table.as_str(), score(&tokens, &entry.keywords)))
            .filter(|(_, score)| *score > 0.0)
            .collect();

        // Stable: ties keep discovery order.
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));

        debug!(candidates = scored.len(), "fuzzy table matching");
        scored
            .into_iter()
            .map(|(table, score)| TableMatch::new(table, score.min(1.0)))
            .collect()
    }
}

/// Query tokens: each CJK character plus each ASCII word run, lowercased.
pub fn tokenize(query: &str) -> BTreeSet<String> {
    let lowered = query.to_lowercase();

    let cjk = lowered
        .chars()
        .filter(|c| ('\u{4e00}'..='\u{9fff}').contains(c))
        .map(String::from);
    let words = ASCII_RUN.find_iter(&lowered).map(|m| m.as_str().to_string());

    cjk.chain(words).collect()
}

/// Raw match score of one table; may exceed 1.0.
pub fn score(tokens: &BTreeSet<String>, keywords: &BTreeSet<String>) -> f64 {
    if keywords.is_empty() {
        return 0.0;
    }

    let overlap = tokens.intersection(keywords).count();
    let mut score = OVERLAP_WEIGHT * overlap as f64 / keywords.len() as f64;

    for token in tokens {
        for keyword in keywords {
            let similarity = similarity(token, keyword);
            if similarity > SIMILARITY_THRESHOLD {
                score += SIMILARITY_WEIGHT * similarity;
            }
        }
    }

    score
}

/// Ratcliff/Obershelp similarity: `2 * matched / (|a| + |b|)`, where
/// `matched` counts the characters of the longest common block plus,
/// recursively, those of the blocks to its left and right.
///
/// Two empty strings are identical.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }

    let mut matched = 0;
    let mut pending = vec![(0, a.len(), 0, b.len())];
    while let Some((alo, ahi, blo, bhi)) = pending.pop() {
        let (i, j, size) = longest_block(&a, &b, alo, ahi, blo, bhi);
        if size == 0 {
            continue;
        }
        matched += size;
        if alo < i && blo < j {
            pending.push((alo, i, blo, j));
        }
        if i + size < ahi && j + size < bhi {
            pending.push((i + size, ahi, j + size, bhi));
        }
    }

    2.0 * matched as f64 / total as f64
}

/// Longest common block of `a[alo..ahi]` and `b[blo..bhi]` as
/// `(start in a, start in b, length)`. Ties go to the earliest start in `a`,
/// then in `b`.
fn longest_block(
    a: &[char],
    b: &[char],
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> (usize, usize, usize) {
    let mut best = (alo, blo, 0);
    // run[k] is the length of the block ending at b[blo + k - 1]
    let mut run = vec![0usize; bhi - blo + 1];

    for i in alo..ahi {
        let mut next = vec![0usize; run.len()];
        for j in blo..bhi {
            if a[i] != b[j] {
                continue;
            }
            let k = run[j - blo] + 1;
            next[j - blo + 1] = k;
            if k > best.2 {
                best = (i + 1 - k, j + 1 - k, k);
            }
        }
        run = next;
    }

    best
}
