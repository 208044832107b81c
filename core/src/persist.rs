//! Loading the pre-built corpus files from a data directory.
//!
//! The loader never panics and never aborts the process: a fatal problem
//! yields a [`SearchService`] in the failed state, which then reports the
//! error for every request.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};

use crate::catalog::{DocMeta, DocumentCatalog, UNTITLED};
use crate::doc_id::canonical_doc_id;
use crate::index::{DocId, Postings};
use crate::service::{SearchEngine, SearchService};

pub const INVERTED_INDEX_FILE: &str = "inverted_index.json";
pub const DOC_META_FILE: &str = "doc_meta.csv";
pub const CORPUS_FILE: &str = "corpus_clean_v2.csv";

pub struct DataPaths {
    pub root: PathBuf,
}

impl DataPaths {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self { root: root.as_ref().to_path_buf() }
    }
    pub fn inverted_index(&self) -> PathBuf { self.root.join(INVERTED_INDEX_FILE) }
    pub fn doc_meta(&self) -> PathBuf { self.root.join(DOC_META_FILE) }
    pub fn corpus(&self) -> PathBuf { self.root.join(CORPUS_FILE) }
}

#[derive(Debug, Deserialize)]
struct MetaRow {
    #[serde(default)]
    doc_id: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    image_url: Option<String>,
    #[serde(default)]
    doc_len: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ContentRow {
    #[serde(default)]
    content_final: Option<String>,
}

/// Load `{ term: { doc_id: freq } }`. Doc ids are canonicalized; entries that
/// collapse to the same id are summed and frequencies below 1 dropped.
pub fn load_inverted_index(paths: &DataPaths) -> Result<HashMap<String, Postings>> {
    let path = paths.inverted_index();
    let f = File::open(&path).with_context(|| format!("opening {}", path.display()))?;
    parse_inverted_index(BufReader::new(f))
}

fn parse_inverted_index<R: Read>(reader: R) -> Result<HashMap<String, Postings>> {
    // frequencies may be written as floats (`3.0`); they are truncated
    let raw: HashMap<String, HashMap<String, f64>> =
        serde_json::from_reader(reader).context("parsing inverted index")?;

    let mut index = HashMap::with_capacity(raw.len());
    for (term, plist) in raw {
        let mut postings = Postings::with_capacity(plist.len());
        for (doc_id, freq) in plist {
            let tf = freq.trunc() as u32;
            if tf == 0 {
                continue;
            }
            *postings.entry(canonical_doc_id(&doc_id)).or_insert(0) += tf;
        }
        if !postings.is_empty() {
            index.insert(term, postings);
        }
    }
    Ok(index)
}

/// Load `doc_id,url,title,image_url,doc_len` rows keyed by canonical doc id.
pub fn load_doc_meta(paths: &DataPaths) -> Result<HashMap<DocId, DocMeta>> {
    let path = paths.doc_meta();
    let f = File::open(&path).with_context(|| format!("opening {}", path.display()))?;
    parse_doc_meta(BufReader::new(f))
}

fn parse_doc_meta<R: Read>(reader: R) -> Result<HashMap<DocId, DocMeta>> {
    let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let mut docs = HashMap::new();
    for (line, row) in rdr.deserialize::<MetaRow>().enumerate() {
        let row = row.with_context(|| format!("reading metadata row {}", line + 1))?;
        let Some(raw_id) = row.doc_id.filter(|s| !s.trim().is_empty()) else {
            continue;
        };
        let doc_len = match row.doc_len.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            Some(s) => s
                .parse::<u32>()
                .with_context(|| format!("invalid doc_len {s:?} for doc {raw_id}"))?
                .max(1),
            None => 1,
        };
        let meta = DocMeta {
            title: row.title.filter(|t| !t.is_empty()).unwrap_or_else(|| UNTITLED.to_string()),
            url: row.url.unwrap_or_default(),
            image_url: row.image_url.unwrap_or_default(),
            doc_len,
        };
        docs.insert(canonical_doc_id(&raw_id), meta);
    }
    Ok(docs)
}

/// Load `content_final` per row; the 0-based row index is the doc id.
pub fn load_corpus_content(paths: &DataPaths) -> Result<HashMap<DocId, String>> {
    let path = paths.corpus();
    let f = File::open(&path).with_context(|| format!("opening {}", path.display()))?;
    parse_corpus_content(BufReader::new(f))
}

fn parse_corpus_content<R: Read>(reader: R) -> Result<HashMap<DocId, String>> {
    let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let mut content = HashMap::new();
    for (idx, row) in rdr.deserialize::<ContentRow>().enumerate() {
        let row = row.with_context(|| format!("reading corpus row {}", idx + 1))?;
        let text = row.content_final.unwrap_or_default();
        content.insert(idx.to_string(), text.trim().to_string());
    }
    Ok(content)
}

fn is_not_found(err: &anyhow::Error) -> bool {
    err.chain()
        .any(|e| e.downcast_ref::<io::Error>().is_some_and(|io| io.kind() == io::ErrorKind::NotFound))
}

/// Load all three files and build the service.
///
/// The inverted index is mandatory. A missing metadata file degrades to an
/// empty table, a malformed one is fatal. Content problems are only logged.
pub fn load_corpus(paths: &DataPaths) -> SearchService {
    let mut init_error: Option<String> = None;

    tracing::info!(path = %paths.inverted_index().display(), "loading inverted index");
    let postings = match load_inverted_index(paths) {
        Ok(p) => {
            tracing::info!(terms = p.len(), "inverted index loaded");
            p
        }
        Err(e) => {
            let msg = format!("Failed to load {INVERTED_INDEX_FILE}: {e:#}");
            tracing::error!(error = %msg, "inverted index load failed");
            init_error.get_or_insert(msg);
            HashMap::new()
        }
    };

    tracing::info!(path = %paths.doc_meta().display(), "loading document metadata");
    let metadata = match load_doc_meta(paths) {
        Ok(m) => {
            tracing::info!(docs = m.len(), "document metadata loaded");
            m
        }
        Err(e) if is_not_found(&e) => {
            tracing::warn!("{DOC_META_FILE} not found, metadata is empty");
            HashMap::new()
        }
        Err(e) => {
            let msg = format!("Failed to load {DOC_META_FILE}: {e:#}");
            tracing::error!(error = %msg, "document metadata load failed");
            init_error.get_or_insert(msg);
            HashMap::new()
        }
    };

    tracing::info!(path = %paths.corpus().display(), "loading corpus content");
    let content = match load_corpus_content(paths) {
        Ok(c) => {
            tracing::info!(docs = c.len(), "corpus content loaded");
            c
        }
        Err(e) if is_not_found(&e) => {
            tracing::warn!("{CORPUS_FILE} not found, detail view will have no content");
            HashMap::new()
        }
        Err(e) => {
            tracing::warn!(error = %format!("{e:#}"), "corpus content load failed, content is empty");
            HashMap::new()
        }
    };

    if let Some(msg) = init_error {
        return SearchService::failed(msg);
    }
    let engine = SearchEngine::new(postings, DocumentCatalog::new(metadata, content));
    tracing::info!(
        terms = engine.index().num_terms(),
        collection_size = engine.index().collection_size(),
        content_docs = engine.catalog().num_content(),
        avg_doc_len = engine.index().average_length(),
        "search engine ready"
    );
    SearchService::ready(engine)
}
