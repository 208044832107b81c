//! Error taxonomy surfaced by the search facade.
//!
//! Every failure leaving [`crate::SearchService`] is one of these kinds; the
//! transport maps them to a status code and a JSON body without further
//! interpretation.

use serde_json::{json, Value};
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum SearchError {
    /// The corpus failed to load at startup. Reported for every request.
    #[error("initialization failed: {message}")]
    Init { message: String },

    #[error("query parameter q is required")]
    MissingQuery,

    #[error("document not found: {requested_id}")]
    DocumentNotFound { requested_id: String },

    /// Unexpected failure while serving a request.
    #[error("runtime error: {message}")]
    Runtime { message: String },
}

impl SearchError {
    pub fn code(&self) -> &'static str {
        match self {
            SearchError::Init { .. } => "INIT_ERROR",
            SearchError::MissingQuery => "MISSING_QUERY",
            SearchError::DocumentNotFound { .. } => "DOCUMENT_NOT_FOUND",
            SearchError::Runtime { .. } => "RUNTIME_ERROR",
        }
    }

    pub fn status_code(&self) -> u16 {
        match self {
            SearchError::MissingQuery => 400,
            SearchError::DocumentNotFound { .. } => 404,
            SearchError::Init { .. } | SearchError::Runtime { .. } => 500,
        }
    }

    /// JSON payload returned to clients.
    pub fn to_body(&self) -> Value {
        match self {
            SearchError::Init { message } | SearchError::Runtime { message } => json!({
                "error": self.code(),
                "message": message,
            }),
            SearchError::MissingQuery => json!({
                "error": self.code(),
                "message": "Query parameter q is required",
                "results": [],
            }),
            SearchError::DocumentNotFound { requested_id } => json!({
                "error": self.code(),
                "requested_id": requested_id,
            }),
        }
    }
}

pub type Result<T> = std::result::Result<T, SearchError>;
