//! VectorStore trait: abstract interface for similarity-search backends.
//!
//! The retrieval router only needs a single `find` call: a hard pre-filter,
//! a text to vectorize server-side, and a result cap. The production
//! implementation is `AstraStore` in the `astra` module.

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::core::errors::ApiError;

/// Parameters of one similarity search.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorQuery {
    /// Exact-match pre-filter applied before ranking.
    pub filter: Map<String, Value>,
    /// Text the store embeds and ranks against.
    pub vectorize: String,
    pub limit: usize,
    /// Project the stored `$vectorize` text into each result.
    pub include_vectorize: bool,
    /// Annotate each result with `$similarity`.
    pub include_similarity: bool,
}

impl VectorQuery {
    pub fn new(filter: Map<String, Value>, vectorize: impl Into<String>, limit: usize) -> Self {
        Self {
            filter,
            vectorize: vectorize.into(),
            limit,
            include_vectorize: true,
            include_similarity: true,
        }
    }
}

#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Backend name for logs.
    fn name(&self) -> &str;

    /// Runs a similarity search, returning record-shaped documents ordered by
    /// descending similarity.
    async fn find(&self, query: VectorQuery) -> Result<Vec<Map<String, Value>>, ApiError>;
}
