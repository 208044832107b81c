use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::index::DocId;

pub const UNTITLED: &str = "Untitled";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocMeta {
    pub title: String,
    pub url: String,
    pub image_url: String,
    /// Token count, at least 1.
    pub doc_len: u32,
}

impl Default for DocMeta {
    fn default() -> Self {
        Self { title: UNTITLED.to_string(), url: String::new(), image_url: String::new(), doc_len: 1 }
    }
}

/// Read-only document metadata and full text, keyed by canonical doc id.
///
/// The two tables are sourced independently: a document may have either,
/// both, or neither.
#[derive(Debug, Default)]
pub struct DocumentCatalog {
    metadata: HashMap<DocId, DocMeta>,
    content: HashMap<DocId, String>,
}

impl DocumentCatalog {
    pub fn new(metadata: HashMap<DocId, DocMeta>, content: HashMap<DocId, String>) -> Self {
        Self { metadata, content }
    }

    pub fn metadata_for(&self, doc_id: &str) -> Option<&DocMeta> {
        self.metadata.get(doc_id)
    }

    /// Full text, or `""` when none was loaded.
    pub fn content_for(&self, doc_id: &str) -> &str {
        self.content.get(doc_id).map(String::as_str).unwrap_or("")
    }

    pub fn exists(&self, doc_id: &str) -> bool {
        self.metadata.contains_key(doc_id) || !self.content_for(doc_id).is_empty()
    }

    /// Per-document lengths taken from the metadata table.
    pub fn doc_lengths(&self) -> HashMap<DocId, u32> {
        self.metadata.iter().map(|(id, m)| (id.clone(), m.doc_len)).collect()
    }

    pub fn num_metadata(&self) -> usize {
        self.metadata.len()
    }

    pub fn num_content(&self) -> usize {
        self.content.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> DocumentCatalog {
        let mut meta = HashMap::new();
        meta.insert("1".to_string(), DocMeta { title: "One".into(), doc_len: 12, ..DocMeta::default() });
        meta.insert("2".to_string(), DocMeta::default());
        let mut content = HashMap::new();
        content.insert("2".to_string(), "second body".to_string());
        content.insert("3".to_string(), "orphan body".to_string());
        content.insert("4".to_string(), String::new());
        DocumentCatalog::new(meta, content)
    }

    #[test]
    fn lookups() {
        let c = catalog();
        assert_eq!(c.metadata_for("1").map(|m| m.title.as_str()), Some("One"));
        assert!(c.metadata_for("3").is_none());
        assert_eq!(c.content_for("1"), "");
        assert_eq!(c.content_for("3"), "orphan body");
    }

    #[test]
    fn existence_needs_metadata_or_content() {
        let c = catalog();
        assert!(c.exists("1"));
        assert!(c.exists("2"));
        assert!(c.exists("3"));
        // empty content counts as absent
        assert!(!c.exists("4"));
        assert!(!c.exists("5"));
    }

    #[test]
    fn lengths_come_from_metadata() {
        let lengths = catalog().doc_lengths();
        assert_eq!(lengths.len(), 2);
        assert_eq!(lengths.get("1"), Some(&12));
        assert_eq!(lengths.get("2"), Some(&1));
    }
}
