// Summaries derived from a fitted model's gamma and beta matrices.
//
// All functions here are pure: they read the matrices and return new
// tables. Tie-breaks are fixed (lowest topic index, then vocabulary order)
// so the same model always summarizes the same way.

pub mod distribution;
pub mod projection;

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::Serialize;

use crate::text::dtm::Vocabulary;

/// One row of a topic's top-terms table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopTerm {
    pub topic: usize,
    pub term: String,
    pub beta: f64,
}

/// Index of the largest value in each row. Ties go to the lowest index.
pub fn dominant_topics(gamma: &[Vec<f64>]) -> Vec<usize> {
    gamma.iter().map(|row| argmax(row)).collect()
}

fn argmax(row: &[f64]) -> usize {
    let mut best = 0;
    for (i, &p) in row.iter().enumerate().skip(1) {
        if p > row[best] {
            best = i;
        }
    }
    best
}

/// Number of documents whose dominant topic is each topic.
pub fn topic_sizes(dominant: &[usize], k: usize) -> Vec<usize> {
    let mut sizes = vec![0usize; k];
    for &t in dominant {
        if t < k {
            sizes[t] += 1;
        }
    }
    sizes
}

/// Top `n` terms of every topic by descending beta.
///
/// Each list has exactly `min(n, vocabulary size)` entries. Equal betas
/// keep vocabulary order.
pub fn top_terms(beta: &[Vec<f64>], vocabulary: &Vocabulary, n: usize) -> Vec<Vec<TopTerm>> {
    beta.iter()
        .enumerate()
        .map(|(topic, row)| {
            let mut order: Vec<usize> = (0..row.len()).collect();
            // Stable sort keeps vocabulary order among ties
            order.sort_by(|&a, &b| row[b].total_cmp(&row[a]));
            order
                .into_iter()
                .take(n)
                .map(|w| TopTerm {
                    topic,
                    term: vocabulary.term(w).unwrap_or_default().to_string(),
                    beta: row[w],
                })
                .collect()
        })
        .collect()
}

/// Sum of beta for every term that made some topic's top-terms list,
/// over the topics where it made the list. Terms outside every list are
/// absent, not zero.
pub fn term_importance(top_terms: &[Vec<TopTerm>]) -> BTreeMap<String, f64> {
    let mut weights = BTreeMap::new();
    for entry in top_terms.iter().flatten() {
        *weights.entry(entry.term.clone()).or_insert(0.0) += entry.beta;
    }
    weights
}

/// Word-cloud selection: terms with weight at least `min_weight`, heaviest
/// first (ties alphabetical), capped at `max_words`.
pub fn word_cloud(
    importance: &BTreeMap<String, f64>,
    min_weight: f64,
    max_words: usize,
) -> Vec<(String, f64)> {
    let mut words: Vec<(String, f64)> = importance
        .iter()
        .filter(|(_, w)| **w >= min_weight)
        .map(|(t, &w)| (t.clone(), w))
        .collect();
    // BTreeMap iteration is alphabetical, so a stable sort settles ties
    words.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    words.truncate(max_words);
    words
}
