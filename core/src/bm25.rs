//! Okapi BM25 scoring over the in-memory postings.
//!
//! Each query term occurrence contributes
//! `idf * tf * (K1 + 1) / (tf + K1 * (1 - B + B * dl / avgdl))` to every
//! document in its postings list; contributions are summed per document and
//! the sums ranked descending.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::doc_id::cmp_doc_ids;
use crate::index::{DocId, IndexStore};

pub const K1: f64 = 1.5;
pub const B: f64 = 0.75;

/// Smoothed inverse document frequency: `ln((N - df + 0.5) / (df + 0.5) + 1)`.
///
/// Non-negative whenever `df <= n`.
pub fn idf(n: usize, df: usize) -> f64 {
    let n = n as f64;
    let df = df as f64;
    ((n - df + 0.5) / (df + 0.5) + 1.0).ln()
}

/// Length-normalized term frequency component.
pub fn tf_norm(tf: u32, dl: f64, avg_dl: f64) -> f64 {
    let tf = f64::from(tf);
    (tf * (K1 + 1.0)) / (tf + K1 * (1.0 - B + B * (dl / avg_dl)))
}

/// Accumulate BM25 scores for every document touched by `terms`.
///
/// Repeated terms are scored once per occurrence. Unknown terms contribute
/// nothing.
pub fn score_documents<S: AsRef<str>>(index: &IndexStore, terms: &[S]) -> HashMap<DocId, f64> {
    let mut scores: HashMap<DocId, f64> = HashMap::new();
    if index.is_empty() {
        return scores;
    }

    let n = index.collection_size();
    let avg_dl = index.average_length();

    for term in terms {
        let Some(postings) = index.postings_for(term.as_ref()) else {
            continue;
        };
        let term_idf = idf(n, postings.len());
        for (doc_id, &tf) in postings {
            let contrib = term_idf * tf_norm(tf, index.length_of(doc_id), avg_dl);
            *scores.entry(doc_id.clone()).or_insert(0.0) += contrib;
        }
    }
    scores
}

/// Sort by descending score, ties by ascending doc id, and keep `top_k`.
pub fn top_k(scores: HashMap<DocId, f64>, top_k: usize) -> Vec<(DocId, f64)> {
    if top_k == 0 {
        return Vec::new();
    }
    let mut ranked: Vec<(DocId, f64)> = scores.into_iter().collect();
    let by_rank = |a: &(DocId, f64), b: &(DocId, f64)| -> Ordering {
        b.1.total_cmp(&a.1).then_with(|| cmp_doc_ids(&a.0, &b.0))
    };
    if ranked.len() > top_k {
        ranked.select_nth_unstable_by(top_k - 1, by_rank);
        ranked.truncate(top_k);
    }
    ranked.sort_unstable_by(by_rank);
    ranked
}

/// Score and rank in one step.
pub fn rank<S: AsRef<str>>(index: &IndexStore, terms: &[S], k: usize) -> Vec<(DocId, f64)> {
    top_k(score_documents(index, terms), k)
}
