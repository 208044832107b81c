//! BM25 keyword search over a fixed, pre-built corpus.
//!
//! The crate holds the read-only stores ([`IndexStore`], [`DocumentCatalog`]),
//! the [`bm25`] ranker, and the [`SearchService`] facade that the HTTP server
//! wraps. [`persist`] turns the on-disk corpus files into a ready service.

pub mod bm25;
pub mod catalog;
pub mod doc_id;
pub mod error;
pub mod index;
pub mod persist;
pub mod service;
pub mod tokenizer;

pub use catalog::{DocMeta, DocumentCatalog};
pub use doc_id::canonical_doc_id;
pub use error::{Result, SearchError};
pub use index::{IndexStore, Postings};
pub use service::{
    DocumentDetail, SearchEngine, SearchHit, SearchOutcome, SearchRequest, SearchResponse,
    SearchService, DEFAULT_TOP_K,
};
