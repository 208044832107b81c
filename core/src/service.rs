//! Query/detail facade over the index and catalog.
//!
//! [`SearchEngine`] composes the stores with the BM25 ranker.
//! [`SearchService`] wraps the outcome of startup: either a ready engine or
//! the initialization error, which is then reported for every request.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

use crate::bm25;
use crate::catalog::{DocumentCatalog, UNTITLED};
use crate::doc_id::canonical_doc_id;
use crate::error::{Result, SearchError};
use crate::index::{IndexStore, Postings};
use crate::tokenizer::query_terms;

pub const DEFAULT_TOP_K: i64 = 20;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub doc_id: String,
    pub title: String,
    pub url: String,
    pub image_url: String,
    /// `None` when the document has no metadata.
    pub doc_len: Option<u32>,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub query: String,
    pub count: usize,
    pub results: Vec<SearchHit>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentDetail {
    pub doc_id: String,
    pub title: String,
    pub url: String,
    pub image_url: String,
    pub doc_len: Option<u32>,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SearchOutcome {
    Search(SearchResponse),
    Detail(DocumentDetail),
}

/// One request as it arrives from the transport. `doc_id` wins over `q`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub doc_id: Option<String>,
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub top_k: Option<String>,
}

impl SearchRequest {
    /// Build a request from raw query-string pairs. The first occurrence of
    /// each key wins; unknown keys are ignored.
    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        K: AsRef<str>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut req = SearchRequest::default();
        for (key, value) in pairs {
            let slot = match key.as_ref() {
                "doc_id" => &mut req.doc_id,
                "q" => &mut req.q,
                "top_k" => &mut req.top_k,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into());
            }
        }
        req
    }
}

/// Parse a caller-supplied `top_k`; absent or non-integer input yields
/// [`DEFAULT_TOP_K`].
pub fn parse_top_k(raw: Option<&str>) -> i64 {
    raw.and_then(|s| s.trim().parse::<i64>().ok()).unwrap_or(DEFAULT_TOP_K)
}

#[derive(Debug, Default)]
pub struct SearchEngine {
    index: IndexStore,
    catalog: DocumentCatalog,
}

impl SearchEngine {
    /// Build the index store from raw postings, taking document lengths and
    /// the collection size from the catalog's metadata table.
    pub fn new(postings: HashMap<String, Postings>, catalog: DocumentCatalog) -> Self {
        let index = IndexStore::new(postings, catalog.doc_lengths(), catalog.num_metadata());
        Self { index, catalog }
    }

    pub fn index(&self) -> &IndexStore {
        &self.index
    }

    pub fn catalog(&self) -> &DocumentCatalog {
        &self.catalog
    }

    /// Rank documents for already-split query terms and attach metadata.
    pub fn rank<S: AsRef<str>>(&self, terms: &[S], top_k: usize) -> Vec<SearchHit> {
        bm25::rank(&self.index, terms, top_k)
            .into_iter()
            .map(|(doc_id, score)| {
                let meta = self.catalog.metadata_for(&doc_id);
                SearchHit {
                    title: meta.map_or_else(|| UNTITLED.to_string(), |m| m.title.clone()),
                    url: meta.map(|m| m.url.clone()).unwrap_or_default(),
                    image_url: meta.map(|m| m.image_url.clone()).unwrap_or_default(),
                    doc_len: meta.map(|m| m.doc_len),
                    doc_id,
                    score,
                }
            })
            .collect()
    }

    pub fn search(&self, query: &str, top_k: i64) -> Result<SearchResponse> {
        let query = query.trim();
        if query.is_empty() {
            return Err(SearchError::MissingQuery);
        }
        let terms = query_terms(query);
        let k = usize::try_from(top_k).unwrap_or(0);
        let results = self.rank(&terms, k);
        tracing::debug!(query, terms = terms.len(), top_k, hits = results.len(), "search");
        Ok(SearchResponse { query: query.to_string(), count: results.len(), results })
    }

    pub fn detail(&self, raw_id: &str) -> Result<DocumentDetail> {
        let doc_id = canonical_doc_id(raw_id);
        if !self.catalog.exists(&doc_id) {
            return Err(SearchError::DocumentNotFound { requested_id: doc_id });
        }
        let meta = self.catalog.metadata_for(&doc_id);
        Ok(DocumentDetail {
            title: meta.map_or_else(|| UNTITLED.to_string(), |m| m.title.clone()),
            url: meta.map(|m| m.url.clone()).unwrap_or_default(),
            image_url: meta.map(|m| m.image_url.clone()).unwrap_or_default(),
            doc_len: meta.map(|m| m.doc_len),
            content: self.catalog.content_for(&doc_id).to_string(),
            doc_id,
        })
    }
}

#[derive(Debug)]
enum ServiceState {
    Ready(SearchEngine),
    Failed(String),
}

/// Shared handle to the engine, or to the reason it could not be built.
#[derive(Debug, Clone)]
pub struct SearchService {
    state: Arc<ServiceState>,
}

impl SearchService {
    pub fn ready(engine: SearchEngine) -> Self {
        Self { state: Arc::new(ServiceState::Ready(engine)) }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self { state: Arc::new(ServiceState::Failed(message.into())) }
    }

    pub fn init_error(&self) -> Option<&str> {
        match self.state.as_ref() {
            ServiceState::Ready(_) => None,
            ServiceState::Failed(msg) => Some(msg),
        }
    }

    pub fn engine(&self) -> Result<&SearchEngine> {
        match self.state.as_ref() {
            ServiceState::Ready(engine) => Ok(engine),
            ServiceState::Failed(msg) => Err(SearchError::Init { message: msg.clone() }),
        }
    }

    pub fn search(&self, query: &str, top_k: i64) -> Result<SearchResponse> {
        self.engine()?.search(query, top_k)
    }

    pub fn detail(&self, doc_id: &str) -> Result<DocumentDetail> {
        self.engine()?.detail(doc_id)
    }

    /// Route a transport request: detail lookup when `doc_id` is given,
    /// search otherwise. Empty parameter values count as absent.
    pub fn handle(&self, req: &SearchRequest) -> Result<SearchOutcome> {
        let engine = self.engine()?;
        if let Some(doc_id) = req.doc_id.as_deref().filter(|s| !s.is_empty()) {
            return engine.detail(doc_id).map(SearchOutcome::Detail);
        }
        let top_k = parse_top_k(req.top_k.as_deref().filter(|s| !s.is_empty()));
        engine
            .search(req.q.as_deref().unwrap_or(""), top_k)
            .map(SearchOutcome::Search)
    }
}
