use std::collections::{HashMap, HashSet};

/// Canonical document identifier.
pub type DocId = String;

/// Raw term frequencies for one term, keyed by document. Every stored
/// frequency is at least 1.
pub type Postings = HashMap<DocId, u32>;

/// Average length used when no document lengths are known at all.
pub const FALLBACK_DOC_LEN: f64 = 300.0;

/// Immutable inverted index plus the statistics BM25 needs.
#[derive(Debug, Default)]
pub struct IndexStore {
    postings: HashMap<String, Postings>,
    doc_lengths: HashMap<DocId, u32>,
    avg_doc_len: f64,
    num_docs: usize,
}

impl IndexStore {
    /// Build the store.
    ///
    /// `known_docs` is the size of the metadata table. When it is zero the
    /// collection size falls back to the number of distinct documents seen
    /// across all postings lists, and is never below 1.
    pub fn new(
        mut postings: HashMap<String, Postings>,
        doc_lengths: HashMap<DocId, u32>,
        known_docs: usize,
    ) -> Self {
        for plist in postings.values_mut() {
            plist.retain(|_, tf| *tf > 0);
        }
        postings.retain(|_, plist| !plist.is_empty());

        let avg_doc_len = if doc_lengths.is_empty() {
            FALLBACK_DOC_LEN
        } else {
            doc_lengths.values().map(|&l| f64::from(l)).sum::<f64>() / doc_lengths.len() as f64
        };

        let num_docs = if known_docs > 0 {
            known_docs
        } else {
            postings
                .values()
                .flat_map(|plist| plist.keys())
                .collect::<HashSet<_>>()
                .len()
        };

        Self { postings, doc_lengths, avg_doc_len, num_docs: num_docs.max(1) }
    }

    pub fn postings_for(&self, term: &str) -> Option<&Postings> {
        self.postings.get(term)
    }

    /// Token count of a document, or the average length when unknown.
    pub fn length_of(&self, doc_id: &str) -> f64 {
        self.doc_lengths
            .get(doc_id)
            .map(|&l| f64::from(l))
            .unwrap_or(self.avg_doc_len)
    }

    pub fn average_length(&self) -> f64 {
        self.avg_doc_len
    }

    /// Collection size N, always at least 1.
    pub fn collection_size(&self) -> usize {
        self.num_docs
    }

    pub fn num_terms(&self) -> usize {
        self.postings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.postings.is_empty()
    }
}
