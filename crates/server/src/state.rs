use database::{
    repositories::CourseRepository,
    search::{CourseSearchIndex, TantivyCourseIndex},
};
use sea_orm::DatabaseConnection;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub search: Arc<TantivyCourseIndex>,
    pub search_limit: usize,
}

impl AppState {
    /// Course repository backed by the search index, annotated for `viewer`
    pub fn courses(&self, viewer: Option<i64>) -> CourseRepository<'_, DatabaseConnection> {
        CourseRepository::new(&self.db)
            .with_search(self.search.as_ref() as &dyn CourseSearchIndex, self.search_limit)
            .for_viewer(viewer)
    }
}
