use super::{CourseSearchIndex, SearchError, SearchResult};
use crate::entities::course;
use async_trait::async_trait;
use log::debug;
use std::path::PathBuf;
use tantivy::{
    Index, IndexReader, IndexWriter, ReloadPolicy, TantivyDocument, Term,
    collector::TopDocs,
    directory::MmapDirectory,
    doc,
    query::{BooleanQuery, FuzzyTermQuery, Occur, Query},
    schema::{Field, INDEXED, STORED, Schema, TEXT, Value},
    tokenizer::TokenStream,
};
use tokio::sync::Mutex;

/// Configuration of the course search index
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Directory holding the index, kept in memory when unset
    pub index_path: Option<PathBuf>,

    /// Index writer heap size in bytes
    pub writer_heap_size: usize,

    /// Maximum number of hits a search returns
    pub result_limit: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            index_path: None,
            writer_heap_size: 50_000_000, // 50MB
            result_limit: 100,
        }
    }
}

/// Edit distance allowed when matching a query token, following the
/// `AUTO:2,4` fuzziness rule: exact below 2 characters, one edit below 4,
/// two edits otherwise
pub fn fuzzy_distance(token: &str) -> u8 {
    match token.chars().count() {
        0..=1 => 0,
        2..=3 => 1,
        _ => 2,
    }
}

#[derive(Debug, Clone, Copy)]
struct CourseFields {
    id: Field,
    name: Field,
    description: Field,
}

/// Course index backed by tantivy
pub struct TantivyCourseIndex {
    index: Index,
    fields: CourseFields,
    writer: Mutex<IndexWriter>,
    reader: IndexReader,
}

impl TantivyCourseIndex {
    pub fn open(config: &SearchConfig) -> SearchResult<Self> {
        let (schema, fields) = Self::build_schema();

        let index = match &config.index_path {
            Some(path) => {
                std::fs::create_dir_all(path)?;
                let directory = MmapDirectory::open(path).map_err(|e| {
                    SearchError::IndexInitFailed(format!("Failed to open index directory: {e}"))
                })?;
                Index::open_or_create(directory, schema).map_err(|e| {
                    SearchError::IndexInitFailed(format!("Failed to open index: {e}"))
                })?
            }
            None => Index::create_in_ram(schema),
        };

        let writer = index
            .writer(config.writer_heap_size)
            .map_err(|e| SearchError::IndexInitFailed(format!("Failed to create writer: {e}")))?;

        // Reloaded by hand after every commit so writes are visible right away
        let reader = index
            .reader_builder()
            .reload_policy(ReloadPolicy::Manual)
            .try_into()
            .map_err(|e| SearchError::IndexInitFailed(format!("Failed to create reader: {e}")))?;

        Ok(Self {
            index,
            fields,
            writer: Mutex::new(writer),
            reader,
        })
    }

    /// In-memory index with default settings
    pub fn in_memory() -> SearchResult<Self> {
        Self::open(&SearchConfig::default())
    }

    fn build_schema() -> (Schema, CourseFields) {
        let mut builder = Schema::builder();
        let id = builder.add_i64_field("id", INDEXED | STORED);
        let name = builder.add_text_field("name", TEXT);
        let description = builder.add_text_field("description", TEXT);

        (
            builder.build(),
            CourseFields {
                id,
                name,
                description,
            },
        )
    }

    fn to_document(&self, course: &course::Model) -> TantivyDocument {
        doc!(
            self.fields.id => course.id,
            self.fields.name => course.name.as_str(),
            self.fields.description => course.description.as_str(),
        )
    }

    fn commit(&self, writer: &mut IndexWriter) -> SearchResult<()> {
        writer
            .commit()
            .map_err(|e| SearchError::IndexingFailed(format!("Failed to commit: {e}")))?;
        self.reader
            .reload()
            .map_err(|e| SearchError::IndexingFailed(format!("Failed to reload reader: {e}")))?;
        Ok(())
    }

    /// Fuzzy multi-field query: every token may match either field
    fn build_query(&self, text: &str) -> SearchResult<Option<BooleanQuery>> {
        let mut analyzer = self
            .index
            .tokenizer_for_field(self.fields.name)
            .map_err(|e| SearchError::SearchFailed(format!("Failed to load tokenizer: {e}")))?;

        let mut clauses: Vec<(Occur, Box<dyn Query>)> = Vec::new();
        let mut stream = analyzer.token_stream(text);
        while stream.advance() {
            let token = stream.token().text.clone();
            let distance = fuzzy_distance(&token);

            for field in [self.fields.name, self.fields.description] {
                let term = Term::from_field_text(field, &token);
                clauses.push((
                    Occur::Should,
                    Box::new(FuzzyTermQuery::new(term, distance, true)),
                ));
            }
        }

        if clauses.is_empty() {
            Ok(None)
        } else {
            Ok(Some(BooleanQuery::new(clauses)))
        }
    }
}

#[async_trait]
impl CourseSearchIndex for TantivyCourseIndex {
    async fn index_course(&self, course: &course::Model) -> SearchResult<()> {
        let mut writer = self.writer.lock().await;

        // Replace the previous version of the document
        writer.delete_term(Term::from_field_i64(self.fields.id, course.id));
        writer
            .add_document(self.to_document(course))
            .map_err(|e| SearchError::IndexingFailed(format!("Failed to add course: {e}")))?;

        self.commit(&mut writer)?;
        debug!("Indexed course {}", course.id);
        Ok(())
    }

    async fn remove_course(&self, course_id: i64) -> SearchResult<()> {
        let mut writer = self.writer.lock().await;
        writer.delete_term(Term::from_field_i64(self.fields.id, course_id));
        self.commit(&mut writer)?;
        debug!("Removed course {course_id} from the index");
        Ok(())
    }

    async fn rebuild(&self, courses: &[course::Model]) -> SearchResult<usize> {
        let mut writer = self.writer.lock().await;
        writer
            .delete_all_documents()
            .map_err(|e| SearchError::IndexingFailed(format!("Failed to clear index: {e}")))?;

        for course in courses {
            writer.add_document(self.to_document(course)).map_err(|e| {
                SearchError::IndexingFailed(format!("Failed to add course {}: {e}", course.id))
            })?;
        }

        self.commit(&mut writer)?;
        Ok(courses.len())
    }

    async fn search(&self, query: &str, limit: usize) -> SearchResult<Vec<i64>> {
        let Some(query) = self.build_query(query)? else {
            return Ok(vec![]);
        };

        let searcher = self.reader.searcher();
        let top_docs = searcher
            .search(&query, &TopDocs::with_limit(limit.max(1)))
            .map_err(|e| SearchError::SearchFailed(e.to_string()))?;

        let mut ids = Vec::with_capacity(top_docs.len());
        for (_score, address) in top_docs {
            let document: TantivyDocument = searcher
                .doc(address)
                .map_err(|e| SearchError::SearchFailed(format!("Failed to load document: {e}")))?;

            if let Some(id) = document
                .get_first(self.fields.id)
                .and_then(|value| value.as_i64())
            {
                ids.push(id);
            }
        }

        Ok(ids)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::{TimeZone, Utc};
    use models::complexity::Complexity;

    fn course(id: i64, name: &str, description: &str) -> course::Model {
        let start = Utc.with_ymd_and_hms(2023, 3, 1, 10, 0, 0).unwrap();
        course::Model {
            id,
            teacher_id: 1,
            name: name.to_owned(),
            description: description.to_owned(),
            price: Some(1000.0),
            complexity: Complexity::Easy,
            start_datetime: start,
            duration: 3600,
            created_at: start,
            updated_at: start,
        }
    }

    async fn seeded_index() -> TantivyCourseIndex {
        let index = TantivyCourseIndex::in_memory().unwrap();
        let courses = vec![
            course(1, "Python for beginners", "Variables, loops and functions"),
            course(2, "Watercolor painting", "Landscapes with soft brushes"),
            course(3, "Advanced Rust", "Ownership, lifetimes and async programming"),
        ];
        assert_eq!(index.rebuild(&courses).await.unwrap(), 3);
        index
    }

    #[test]
    fn test_fuzzy_distance_follows_auto_2_4() {
        assert_eq!(fuzzy_distance("a"), 0);
        assert_eq!(fuzzy_distance("go"), 1);
        assert_eq!(fuzzy_distance("art"), 1);
        assert_eq!(fuzzy_distance("rust"), 2);
        assert_eq!(fuzzy_distance("живопись"), 2);
    }

    #[tokio::test]
    async fn test_search_matches_name_and_description() {
        let index = seeded_index().await;

        assert_eq!(index.search("python", 10).await.unwrap(), vec![1]);
        assert_eq!(index.search("landscapes", 10).await.unwrap(), vec![2]);
    }

    #[tokio::test]
    async fn test_search_tolerates_typos() {
        let index = seeded_index().await;

        // two edits on a long token
        assert_eq!(index.search("pyhtno", 10).await.unwrap(), vec![1]);
        assert_eq!(index.search("ownrship", 10).await.unwrap(), vec![3]);
    }

    #[tokio::test]
    async fn test_search_without_hits() {
        let index = seeded_index().await;

        assert!(index.search("kubernetes", 10).await.unwrap().is_empty());
        assert!(index.search("   ", 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_index_course_replaces_document() {
        let index = seeded_index().await;

        index
            .index_course(&course(2, "Oil painting", "Still life"))
            .await
            .unwrap();
        assert!(index.search("landscapes", 10).await.unwrap().is_empty());
        assert_eq!(index.search("still", 10).await.unwrap(), vec![2]);

        index.remove_course(2).await.unwrap();
        assert!(index.search("painting", 10).await.unwrap().is_empty());
    }
}
