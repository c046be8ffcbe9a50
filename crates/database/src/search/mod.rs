//! Full-text search over course names and descriptions
//!
//! The index is a secondary store: the relational database stays the source of
//! truth and the index is refreshed whenever a course is saved.

mod error;
mod index;

pub use error::{SearchError, SearchResult};
pub use index::{SearchConfig, TantivyCourseIndex, fuzzy_distance};

use crate::entities::course;
use async_trait::async_trait;

/// A searchable store of course documents
#[async_trait]
pub trait CourseSearchIndex: Send + Sync {
    /// Add or replace the document for a course
    async fn index_course(&self, course: &course::Model) -> SearchResult<()>;

    async fn remove_course(&self, course_id: i64) -> SearchResult<()>;

    /// Drop every document and index the given courses from scratch
    async fn rebuild(&self, courses: &[course::Model]) -> SearchResult<usize>;

    /// Ids of the courses matching `query`, most relevant first
    async fn search(&self, query: &str, limit: usize) -> SearchResult<Vec<i64>>;
}
