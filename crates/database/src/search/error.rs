//! Error types for search operations

/// Result type for search operations
pub type SearchResult<T> = std::result::Result<T, SearchError>;

/// Errors that can occur while maintaining or querying the course index
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// The index directory could not be opened or created
    #[error("Index initialization failed: {0}")]
    IndexInitFailed(String),

    /// Adding, replacing or deleting documents failed
    #[error("Document indexing failed: {0}")]
    IndexingFailed(String),

    /// Running a query against the index failed
    #[error("Search execution failed: {0}")]
    SearchFailed(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
