use crate::{
    entities::{
        comment, course, course_favorite, lesson, lesson_participant, questionnaire_teacher,
        review, user,
    },
    error::{RepositoryError, RepositoryResult},
    search::CourseSearchIndex,
};
use futures::try_join;
use log::{debug, warn};
use models::{
    course_filter::CourseFilter, questionnaire_status::QuestionnaireStatus,
    validation::validate_price,
};
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait, Select, TryIntoModel,
    prelude::Expr,
    sea_query::{OnConflict, SimpleExpr},
};
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// A teacher together with their accepted teacher profiles
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeacherDetails {
    pub user: user::Model,
    pub profiles: Vec<questionnaire_teacher::Model>,
}

/// A course with its relations and aggregates loaded
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourseDetails {
    pub course: course::Model,
    pub teacher: Option<TeacherDetails>,
    /// The first lessons of the course by id
    pub lessons: Vec<lesson::Model>,
    pub reviews_count: u64,
    pub comments_count: u64,
    /// Average star rating, `None` without reviews
    pub rate: Option<f64>,
    /// Whether the viewer takes part in a lesson of the course, `None` without a viewer
    pub participant: Option<bool>,
    /// Whether the viewer favorited the course, `None` without a viewer
    pub favorite: Option<bool>,
}

/// How free text narrows the course list
#[derive(Debug, Clone, PartialEq)]
enum TextMatch {
    /// Courses found by the search index
    Indexed(Vec<i64>),
    /// Case-insensitive substring of the name or description
    Substring(String),
}

pub struct CourseRepository<'a, C: ConnectionTrait> {
    conn: &'a C,
    viewer: Option<i64>,
    search: Option<&'a dyn CourseSearchIndex>,
    search_limit: usize,
}

impl<'a, C: ConnectionTrait> CourseRepository<'a, C> {
    /// The number of lessons loaded with a course
    pub const LESSONS_PREVIEW_LIMIT: usize = 15;

    pub fn new(conn: &'a C) -> Self {
        Self {
            conn,
            viewer: None,
            search: None,
            search_limit: 100,
        }
    }

    /// Per-user annotations are computed for this user
    pub fn for_viewer(mut self, user_id: Option<i64>) -> Self {
        self.viewer = user_id;
        self
    }

    pub fn with_search(mut self, index: &'a dyn CourseSearchIndex, limit: usize) -> Self {
        self.search = Some(index);
        self.search_limit = limit;
        self
    }

    /// Inserts a new course or updates an existing one, then refreshes its search document
    pub async fn store(&self, course: course::ActiveModel) -> RepositoryResult<course::Model> {
        if let ActiveValue::Set(price) = &course.price {
            validate_price(*price)?;
        }

        let course = course.save(self.conn).await?.try_into_model()?;

        // The index catches up on the next save or rebuild
        if let Some(index) = self.search
            && let Err(e) = index.index_course(&course).await
        {
            warn!("Failed to index course {}: {e}", course.id);
        }

        Ok(course)
    }

    /// Replaces the search index contents with every stored course
    pub async fn rebuild_search_index(&self) -> RepositoryResult<usize> {
        let Some(index) = self.search else {
            return Ok(0);
        };

        let courses = course::Entity::find().all(self.conn).await?;
        Ok(index.rebuild(&courses).await?)
    }

    pub async fn find_by_id(
        &self,
        id: i64,
        raise_exception: bool,
    ) -> RepositoryResult<Option<course::Model>> {
        let course = course::Entity::find_by_id(id).one(self.conn).await?;
        if course.is_none() && raise_exception {
            return Err(Self::not_found(id));
        }

        Ok(course)
    }

    pub async fn find_by_id_with_relations(
        &self,
        id: i64,
        raise_exception: bool,
    ) -> RepositoryResult<Option<CourseDetails>> {
        let Some(course) = self.find_by_id(id, raise_exception).await? else {
            return Ok(None);
        };

        Ok(self.fetch_relations(vec![course]).await?.pop())
    }

    /// The course, provided it is taught by `teacher_id`
    pub async fn find_by_id_teacher(
        &self,
        id: i64,
        teacher_id: i64,
    ) -> RepositoryResult<Option<course::Model>> {
        Ok(Self::teacher_course_query(id, teacher_id)
            .one(self.conn)
            .await?)
    }

    pub async fn find_user_favorite_courses(
        &self,
        user_id: i64,
    ) -> RepositoryResult<Vec<course::Model>> {
        Ok(Self::favorite_courses_query(user_id).all(self.conn).await?)
    }

    /// Adding a course that is already a favorite changes nothing
    pub async fn add_user_favorite_course(
        &self,
        user_id: i64,
        course_id: i64,
    ) -> RepositoryResult<()> {
        let favorite = course_favorite::ActiveModel {
            user_id: ActiveValue::Set(user_id),
            course_id: ActiveValue::Set(course_id),
        };

        course_favorite::Entity::insert(favorite)
            .on_conflict(
                OnConflict::columns([
                    course_favorite::Column::UserId,
                    course_favorite::Column::CourseId,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(self.conn)
            .await?;

        Ok(())
    }

    pub async fn remove_user_favorite_course(
        &self,
        user_id: i64,
        course_id: i64,
    ) -> RepositoryResult<()> {
        course_favorite::Entity::delete_many()
            .filter(course_favorite::Column::UserId.eq(user_id))
            .filter(course_favorite::Column::CourseId.eq(course_id))
            .exec(self.conn)
            .await?;

        Ok(())
    }

    /// Courses matching every criterion of the filter, newest first
    pub async fn filter(&self, filter: &CourseFilter) -> RepositoryResult<Vec<course::Model>> {
        let text_match = match filter.search_text() {
            Some(text) => Some(self.match_text(text).await?),
            None => None,
        };

        Ok(Self::filter_query(filter, text_match.as_ref())
            .all(self.conn)
            .await?)
    }

    /// Asks the search index first and falls back to substring matching when it finds nothing
    async fn match_text(&self, text: &str) -> Result<TextMatch, DbErr> {
        let Some(index) = self.search else {
            return Ok(TextMatch::Substring(text.to_owned()));
        };

        let ids = match index.search(text, self.search_limit).await {
            Ok(ids) => ids,
            Err(e) => {
                warn!("Course search failed, falling back to substring matching: {e}");
                vec![]
            }
        };

        if ids.is_empty() {
            return Ok(TextMatch::Substring(text.to_owned()));
        }

        // The index may still hold courses that were deleted since
        let existing: Vec<i64> = course::Entity::find()
            .select_only()
            .column(course::Column::Id)
            .filter(course::Column::Id.is_in(ids))
            .into_tuple()
            .all(self.conn)
            .await?;

        debug!("Search index matched {} courses for {text:?}", existing.len());
        if existing.is_empty() {
            Ok(TextMatch::Substring(text.to_owned()))
        } else {
            Ok(TextMatch::Indexed(existing))
        }
    }

    fn filter_query(filter: &CourseFilter, text_match: Option<&TextMatch>) -> Select<course::Entity> {
        let mut condition = Condition::all();

        match text_match {
            Some(TextMatch::Indexed(ids)) => {
                condition = condition.add(course::Column::Id.is_in(ids.iter().copied()));
            }
            Some(TextMatch::Substring(text)) => {
                let pattern = format!("%{}%", escape_like(text));
                condition = condition.add(
                    Condition::any()
                        .add(Expr::cust_with_values(
                            r#""courses"."name" ILIKE $1"#,
                            [pattern.clone()],
                        ))
                        .add(Expr::cust_with_values(
                            r#""courses"."description" ILIKE $1"#,
                            [pattern],
                        )),
                );
            }
            None => {}
        }

        if let Some(complexity) = filter.complexity {
            condition = condition.add(course::Column::Complexity.eq(complexity));
        }

        if let Some(date) = filter.start_date() {
            condition = condition.add(Expr::cust_with_values(
                r#"CAST("courses"."start_datetime" AT TIME ZONE 'UTC' AS DATE) = $1"#,
                [date],
            ));
        }

        // Sunday is 0 for Postgres and 1 for WeekDay
        if let Some(day) = filter.day {
            condition = condition.add(Expr::cust_with_values(
                r#"CAST(EXTRACT(DOW FROM "courses"."start_datetime" AT TIME ZONE 'UTC') AS INTEGER) + 1 = $1"#,
                [i32::from(day.number())],
            ));
        }

        if let Some(end_datetime) = filter.end_datetime {
            condition = condition.add(Self::end_datetime_expr().lte(end_datetime));
        }

        course::Entity::find()
            .filter(condition)
            .order_by_desc(course::Column::Id)
    }

    fn end_datetime_expr() -> Expr {
        Expr::expr(Expr::cust(
            r#""courses"."start_datetime" + make_interval(secs => "courses"."duration")"#,
        ))
    }

    fn teacher_course_query(id: i64, teacher_id: i64) -> Select<course::Entity> {
        course::Entity::find_by_id(id).filter(course::Column::TeacherId.eq(teacher_id))
    }

    fn favorite_courses_query(user_id: i64) -> Select<course::Entity> {
        course::Entity::find()
            .join(
                sea_orm::JoinType::InnerJoin,
                course::Relation::Favorites.def(),
            )
            .filter(course_favorite::Column::UserId.eq(user_id))
            .order_by_desc(course::Column::Id)
    }

    /// Loads teachers, lesson previews, review and comment aggregates and the
    /// viewer's participation and favorite flags for a batch of courses
    pub async fn fetch_relations(
        &self,
        courses: Vec<course::Model>,
    ) -> RepositoryResult<Vec<CourseDetails>> {
        if courses.is_empty() {
            return Ok(vec![]);
        }

        let course_ids: Vec<i64> = courses.iter().map(|c| c.id).collect();
        let teacher_ids: Vec<i64> = courses
            .iter()
            .map(|c| c.teacher_id)
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();

        let (teachers, lessons, review_stats, comment_counts, participating, favorites) = try_join!(
            self.load_teachers(&teacher_ids),
            self.load_lessons(&course_ids),
            self.load_review_stats(&course_ids),
            self.load_comment_counts(&course_ids),
            self.load_participating(&course_ids),
            self.load_favorites(&course_ids),
        )?;

        let relations = RelationData {
            teachers,
            lessons,
            review_stats,
            comment_counts,
            participating,
            favorites,
        };

        Ok(relations.attach(courses))
    }

    async fn load_teachers(
        &self,
        teacher_ids: &[i64],
    ) -> Result<HashMap<i64, TeacherDetails>, DbErr> {
        let users = user::Entity::find()
            .filter(user::Column::Id.is_in(teacher_ids.iter().copied()))
            .all(self.conn)
            .await?;

        let profiles = questionnaire_teacher::Entity::find()
            .filter(questionnaire_teacher::Column::UserId.is_in(teacher_ids.iter().copied()))
            .filter(questionnaire_teacher::Column::Status.eq(QuestionnaireStatus::Accepted))
            .order_by_asc(questionnaire_teacher::Column::Id)
            .all(self.conn)
            .await?;

        let mut profiles_by_user: HashMap<i64, Vec<questionnaire_teacher::Model>> = HashMap::new();
        for profile in profiles {
            profiles_by_user
                .entry(profile.user_id)
                .or_default()
                .push(profile);
        }

        Ok(users
            .into_iter()
            .map(|user| {
                let profiles = profiles_by_user.remove(&user.id).unwrap_or_default();
                (user.id, TeacherDetails { user, profiles })
            })
            .collect())
    }

    async fn load_lessons(&self, course_ids: &[i64]) -> Result<HashMap<i64, Vec<lesson::Model>>, DbErr> {
        let lessons = lesson::Entity::find()
            .filter(lesson::Column::CourseId.is_in(course_ids.iter().copied()))
            .order_by_asc(lesson::Column::Id)
            .all(self.conn)
            .await?;

        let mut lessons_by_course: HashMap<i64, Vec<lesson::Model>> = HashMap::new();
        for lesson in lessons {
            let course_lessons = lessons_by_course.entry(lesson.course_id).or_default();
            if course_lessons.len() < Self::LESSONS_PREVIEW_LIMIT {
                course_lessons.push(lesson);
            }
        }

        Ok(lessons_by_course)
    }

    async fn load_review_stats(
        &self,
        course_ids: &[i64],
    ) -> Result<HashMap<i64, (u64, Option<f64>)>, DbErr> {
        let rows: Vec<(i64, i64, Option<f64>)> = review::Entity::find()
            .select_only()
            .column(review::Column::CourseId)
            .column_as(
                Expr::col((review::Entity, review::Column::Id)).count(),
                "reviews_count",
            )
            .column_as(average_star_rating(), "rate")
            .filter(review::Column::CourseId.is_in(course_ids.iter().copied()))
            .group_by(review::Column::CourseId)
            .into_tuple()
            .all(self.conn)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(course_id, count, rate)| (course_id, (count as u64, rate)))
            .collect())
    }

    async fn load_comment_counts(&self, course_ids: &[i64]) -> Result<HashMap<i64, u64>, DbErr> {
        let rows: Vec<(i64, i64)> = comment::Entity::find()
            .select_only()
            .column(comment::Column::CourseId)
            .column_as(
                Expr::col((comment::Entity, comment::Column::Id)).count(),
                "comments_count",
            )
            .filter(comment::Column::CourseId.is_in(course_ids.iter().copied()))
            .group_by(comment::Column::CourseId)
            .into_tuple()
            .all(self.conn)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(course_id, count)| (course_id, count as u64))
            .collect())
    }

    async fn load_participating(&self, course_ids: &[i64]) -> Result<Option<HashSet<i64>>, DbErr> {
        let Some(viewer) = self.viewer else {
            return Ok(None);
        };

        let ids: Vec<i64> = lesson_participant::Entity::find()
            .select_only()
            .column(lesson::Column::CourseId)
            .inner_join(lesson::Entity)
            .filter(lesson_participant::Column::UserId.eq(viewer))
            .filter(lesson::Column::CourseId.is_in(course_ids.iter().copied()))
            .distinct()
            .into_tuple()
            .all(self.conn)
            .await?;

        Ok(Some(ids.into_iter().collect()))
    }

    async fn load_favorites(&self, course_ids: &[i64]) -> Result<Option<HashSet<i64>>, DbErr> {
        let Some(viewer) = self.viewer else {
            return Ok(None);
        };

        let ids: Vec<i64> = course_favorite::Entity::find()
            .select_only()
            .column(course_favorite::Column::CourseId)
            .filter(course_favorite::Column::UserId.eq(viewer))
            .filter(course_favorite::Column::CourseId.is_in(course_ids.iter().copied()))
            .into_tuple()
            .all(self.conn)
            .await?;

        Ok(Some(ids.into_iter().collect()))
    }

    fn not_found(id: i64) -> RepositoryError {
        RepositoryError::NotFound(format!("Undefined course with id {id}"))
    }
}

/// AVG over a smallint is numeric in Postgres, cast so it decodes as f64
pub(crate) fn average_star_rating() -> SimpleExpr {
    Expr::cust(r#"CAST(AVG("reviews"."star_rating") AS DOUBLE PRECISION)"#)
}

/// Escapes LIKE wildcards so user input only matches literally
fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[derive(Debug, Default)]
struct RelationData {
    teachers: HashMap<i64, TeacherDetails>,
    lessons: HashMap<i64, Vec<lesson::Model>>,
    review_stats: HashMap<i64, (u64, Option<f64>)>,
    comment_counts: HashMap<i64, u64>,
    participating: Option<HashSet<i64>>,
    favorites: Option<HashSet<i64>>,
}

impl RelationData {
    fn attach(mut self, courses: Vec<course::Model>) -> Vec<CourseDetails> {
        courses
            .into_iter()
            .map(|course| {
                let (reviews_count, rate) = self
                    .review_stats
                    .get(&course.id)
                    .copied()
                    .unwrap_or((0, None));

                CourseDetails {
                    teacher: self.teachers.get(&course.teacher_id).cloned(),
                    lessons: self.lessons.remove(&course.id).unwrap_or_default(),
                    reviews_count,
                    comments_count: self.comment_counts.get(&course.id).copied().unwrap_or(0),
                    rate,
                    participant: self
                        .participating
                        .as_ref()
                        .map(|ids| ids.contains(&course.id)),
                    favorite: self.favorites.as_ref().map(|ids| ids.contains(&course.id)),
                    course,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::search::TantivyCourseIndex;
    use chrono::{TimeZone, Utc};
    use models::{complexity::Complexity, week_day::WeekDay};
    use sea_orm::{
        DatabaseBackend, DatabaseConnection, MockDatabase, MockExecResult, QueryTrait, Value,
    };
    use std::collections::BTreeMap;

    type Repository<'a> = CourseRepository<'a, DatabaseConnection>;

    fn course(id: i64, teacher_id: i64) -> course::Model {
        let start = Utc.with_ymd_and_hms(2023, 2, 14, 18, 0, 0).unwrap();
        course::Model {
            id,
            teacher_id,
            name: format!("Course {id}"),
            description: "Drawing basics".to_owned(),
            price: Some(2500.0),
            complexity: Complexity::Medium,
            start_datetime: start,
            duration: 5400,
            created_at: start,
            updated_at: start,
        }
    }

    fn id_rows(ids: &[i64]) -> Vec<BTreeMap<&'static str, Value>> {
        ids.iter()
            .map(|id| BTreeMap::from([("id", Value::BigInt(Some(*id)))]))
            .collect()
    }

    /// Statements the mock connection received, in order
    fn statements(db: DatabaseConnection) -> Vec<String> {
        db.into_transaction_log()
            .iter()
            .map(|transaction| format!("{transaction:?}"))
            .collect()
    }

    async fn seeded_index(courses: &[course::Model]) -> TantivyCourseIndex {
        let index = TantivyCourseIndex::in_memory().unwrap();
        index.rebuild(courses).await.unwrap();
        index
    }

    fn sql(filter: &CourseFilter, text_match: Option<&TextMatch>) -> String {
        Repository::filter_query(filter, text_match)
            .build(DatabaseBackend::Postgres)
            .to_string()
    }

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("100%_off\\"), "100\\%\\_off\\\\");
        assert_eq!(escape_like("python"), "python");
    }

    #[test]
    fn test_empty_filter_orders_newest_first() {
        let sql = sql(&CourseFilter::new(), None);
        assert!(sql.contains("WHERE TRUE"));
        assert!(sql.ends_with(r#"ORDER BY "courses"."id" DESC"#));
    }

    #[test]
    fn test_filter_by_complexity() {
        let sql = sql(&CourseFilter::new().complexity(Complexity::Hard), None);
        assert!(sql.contains(r#""courses"."complexity" = 'hard'"#));
    }

    #[test]
    fn test_filter_by_substring_matches_name_or_description() {
        let text_match = TextMatch::Substring("draw".to_owned());
        let sql = sql(&CourseFilter::new().query("draw"), Some(&text_match));
        assert!(sql.contains(r#""courses"."name" ILIKE '%draw%'"#));
        assert!(sql.contains(r#""courses"."description" ILIKE '%draw%'"#));
        assert!(sql.contains(" OR "));
    }

    #[test]
    fn test_filter_by_indexed_ids() {
        let text_match = TextMatch::Indexed(vec![7, 3]);
        let sql = sql(&CourseFilter::new().query("rust"), Some(&text_match));
        assert!(sql.contains(r#""courses"."id" IN (7, 3)"#));
        assert!(!sql.contains("ILIKE"));
    }

    #[test]
    fn test_filter_by_dates_and_day() {
        let start = Utc.with_ymd_and_hms(2023, 2, 14, 9, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2023, 3, 1, 0, 0, 0).unwrap();
        let filter = CourseFilter::new()
            .start_datetime(start)
            .day(WeekDay::TUESDAY)
            .end_datetime(end);

        let sql = sql(&filter, None);
        assert!(sql.contains("AS DATE) = '2023-02-14'"));
        assert!(sql.contains("AS INTEGER) + 1 = 3"));
        assert!(sql.contains(r#"make_interval(secs => "courses"."duration")) <="#));
        assert!(sql.contains(" AND "));
    }

    #[test]
    fn test_teacher_course_query() {
        let sql = Repository::teacher_course_query(4, 9)
            .build(DatabaseBackend::Postgres)
            .to_string();
        assert!(sql.contains(r#""courses"."id" = 4"#));
        assert!(sql.contains(r#""courses"."teacher_id" = 9"#));
    }

    #[test]
    fn test_favorite_courses_join() {
        let sql = Repository::favorite_courses_query(42)
            .build(DatabaseBackend::Postgres)
            .to_string();
        assert!(sql.contains(r#"INNER JOIN "course_favorites""#));
        assert!(sql.contains(r#""course_favorites"."user_id" = 42"#));
    }

    #[test]
    fn test_attach_relations_with_viewer() {
        let teacher = TeacherDetails {
            user: user::Model {
                id: 9,
                email: "teacher@example.com".to_owned(),
                first_name: "Anna".to_owned(),
                last_name: "Petrova".to_owned(),
                is_active: true,
                rate: Some(4.5),
                register_confirm_token: None,
                created_at: Utc.with_ymd_and_hms(2022, 12, 1, 0, 0, 0).unwrap(),
            },
            profiles: vec![],
        };

        let relations = RelationData {
            teachers: HashMap::from([(9, teacher.clone())]),
            review_stats: HashMap::from([(1, (2, Some(4.5)))]),
            comment_counts: HashMap::from([(2, 7)]),
            participating: Some(HashSet::from([1])),
            favorites: Some(HashSet::from([2])),
            ..Default::default()
        };

        let details = relations.attach(vec![course(1, 9), course(2, 9)]);
        assert_eq!(details.len(), 2);

        assert_eq!(details[0].teacher, Some(teacher));
        assert_eq!(details[0].reviews_count, 2);
        assert_eq!(details[0].rate, Some(4.5));
        assert_eq!(details[0].comments_count, 0);
        assert_eq!(details[0].participant, Some(true));
        assert_eq!(details[0].favorite, Some(false));

        assert_eq!(details[1].reviews_count, 0);
        assert_eq!(details[1].rate, None);
        assert_eq!(details[1].comments_count, 7);
        assert_eq!(details[1].participant, Some(false));
        assert_eq!(details[1].favorite, Some(true));
    }

    #[test]
    fn test_attach_relations_without_viewer() {
        let details = RelationData::default().attach(vec![course(1, 9)]);
        assert_eq!(details[0].teacher, None);
        assert_eq!(details[0].participant, None);
        assert_eq!(details[0].favorite, None);

        let json = serde_json::to_value(&details[0]).unwrap();
        assert_eq!(json["course"]["complexity"], "medium");
        assert!(json["favorite"].is_null());
    }

    #[tokio::test]
    async fn test_find_by_id() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![course(1, 9)]])
            .into_connection();

        let found = Repository::new(&db).find_by_id(1, true).await.unwrap();
        assert_eq!(found, Some(course(1, 9)));
    }

    #[tokio::test]
    async fn test_find_missing_course() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<course::Model>::new(), Vec::new()])
            .into_connection();
        let repository = Repository::new(&db);

        assert_eq!(repository.find_by_id(5, false).await.unwrap(), None);

        match repository.find_by_id(5, true).await {
            Err(RepositoryError::NotFound(message)) => {
                assert_eq!(message, "Undefined course with id 5")
            }
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_filter_without_index_uses_substring_matching() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![course(3, 9)]])
            .into_connection();

        let courses = Repository::new(&db)
            .filter(&CourseFilter::new().query("draw"))
            .await
            .unwrap();
        assert_eq!(courses, vec![course(3, 9)]);
    }

    #[tokio::test]
    async fn test_store_rejects_negative_price() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let course = course::ActiveModel {
            price: ActiveValue::Set(Some(-1.0)),
            ..Default::default()
        };

        let result = Repository::new(&db).store(course).await;
        assert!(matches!(result, Err(RepositoryError::Validation(_))));
    }

    #[tokio::test]
    async fn test_filter_uses_search_index_hits() {
        let index = seeded_index(&[course(1, 9), course(2, 9)]).await;
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([id_rows(&[1, 2])])
            .append_query_results([vec![course(2, 9), course(1, 9)]])
            .into_connection();

        let courses = Repository::new(&db)
            .with_search(&index, 10)
            .filter(&CourseFilter::new().query("drawing"))
            .await
            .unwrap();
        assert_eq!(courses, vec![course(2, 9), course(1, 9)]);

        let log = statements(db);
        assert_eq!(log.len(), 2);
        assert!(log[1].contains("IN ($1, $2)"));
        assert!(log[1].contains("ORDER BY"));
        assert!(!log[1].contains("ILIKE"));
    }

    #[tokio::test]
    async fn test_filter_falls_back_without_index_hits() {
        let index = seeded_index(&[course(1, 9)]).await;
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<course::Model>::new()])
            .into_connection();

        let courses = Repository::new(&db)
            .with_search(&index, 10)
            .filter(&CourseFilter::new().query("kubernetes"))
            .await
            .unwrap();
        assert!(courses.is_empty());

        let log = statements(db);
        assert_eq!(log.len(), 1);
        assert!(log[0].contains("ILIKE"));
    }

    #[tokio::test]
    async fn test_filter_falls_back_when_hits_were_deleted() {
        let index = seeded_index(&[course(7, 9)]).await;
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([id_rows(&[])])
            .append_query_results([vec![course(3, 9)]])
            .into_connection();

        let courses = Repository::new(&db)
            .with_search(&index, 10)
            .filter(&CourseFilter::new().query("drawing"))
            .await
            .unwrap();
        assert_eq!(courses, vec![course(3, 9)]);

        let log = statements(db);
        assert_eq!(log.len(), 2);
        assert!(log[0].contains("IN ($1)"));
        assert!(!log[0].contains("ILIKE"));
        assert!(log[1].contains("ILIKE"));
    }

    #[tokio::test]
    async fn test_favorite_changes_are_idempotent() {
        let unchanged = || MockExecResult {
            last_insert_id: 0,
            rows_affected: 0,
        };
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([unchanged(), unchanged()])
            .into_connection();
        let repository = Repository::new(&db);

        repository.add_user_favorite_course(4, 2).await.unwrap();
        repository.remove_user_favorite_course(4, 2).await.unwrap();

        let log = statements(db);
        assert!(log[0].contains("ON CONFLICT"));
        assert!(log[0].contains("DO NOTHING"));
        assert!(log[1].contains("DELETE FROM"));
    }

    #[tokio::test]
    async fn test_store_indexes_saved_course() {
        let index = TantivyCourseIndex::in_memory().unwrap();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![course(5, 9)]])
            .into_connection();

        let saved = course(5, 9);
        let new_course = course::ActiveModel {
            teacher_id: ActiveValue::Set(saved.teacher_id),
            name: ActiveValue::Set(saved.name.clone()),
            description: ActiveValue::Set(saved.description.clone()),
            price: ActiveValue::Set(saved.price),
            complexity: ActiveValue::Set(saved.complexity),
            start_datetime: ActiveValue::Set(saved.start_datetime),
            duration: ActiveValue::Set(saved.duration),
            created_at: ActiveValue::Set(saved.created_at),
            ..Default::default()
        };

        let stored = Repository::new(&db)
            .with_search(&index, 10)
            .store(new_course)
            .await
            .unwrap();
        assert_eq!(stored, saved);
        assert_eq!(index.search("drawing", 10).await.unwrap(), vec![5]);
    }
}
