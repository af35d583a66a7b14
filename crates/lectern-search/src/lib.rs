//! Lectern Search Library
//!
//! Relevance ranking, exact-match routing, snippets, facets and filtered
//! browsing over the in-memory document index.
//!
//! # Modules
//!
//! - [`scorer`] - Field-weighted substring scoring
//! - [`router`] - Author and tag exact-match short-circuits
//! - [`snippet`] - Context window around the first query occurrence
//! - [`facets`] - Distinct tags, authors and domains across courses
//! - [`filter`] - Faceted filters and cursor pagination
//! - [`engine`] - Query entry points backed by the index store
//!
//! # Example
//!
//! ```no_run
//! use lectern_core::Config;
//! use lectern_search::{SearchEngine, SearchRequest};
//!
//! # async fn run() -> lectern_search::Result<()> {
//! let engine = SearchEngine::from_config(&Config::default());
//! let hits = engine
//!     .search(&SearchRequest {
//!         query: "networking".into(),
//!         ..Default::default()
//!     })
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod engine;
pub mod facets;
pub mod filter;
pub mod router;
pub mod scorer;
pub mod snippet;

pub use engine::{BrowseRequest, CardsRequest, SearchEngine, SearchRequest, SearchResultItem, rank};
pub use facets::FacetCatalog;
pub use filter::{FilterOptions, Page};
use lectern_index::IndexError;
use thiserror::Error;

/// Search-related errors.
#[derive(Debug, Error)]
pub enum SearchError {
    /// The index could not be built or read.
    #[error("index unavailable: {0}")]
    Index(#[from] IndexError),

    /// The request is malformed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl SearchError {
    /// Create a new invalid request error.
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }
}

/// Result type for search operations.
pub type Result<T> = std::result::Result<T, SearchError>;
