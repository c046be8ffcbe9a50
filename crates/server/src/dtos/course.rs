use crate::error::AppError;
use chrono::{DateTime, Utc};
use database::{
    entities::{course, lesson, questionnaire_teacher},
    repositories::{CourseDetails, TeacherDetails},
};
use models::{complexity::Complexity, course_filter::CourseFilter, week_day::WeekDay};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Serialize, ToSchema)]
pub struct CourseResponse {
    pub id: i64,
    pub teacher_id: i64,
    pub name: String,
    pub description: String,
    pub price: Option<f64>,
    #[schema(value_type = String, example = "medium")]
    pub complexity: Complexity,
    pub start_datetime: DateTime<Utc>,
    /// Length of the course in seconds
    pub duration: i64,
    pub end_datetime: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TeacherProfileResponse {
    pub id: i64,
    pub name: String,
    pub surname: String,
    pub about_me: Option<String>,
    pub work_experience: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TeacherResponse {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub rate: Option<f64>,
    pub profiles: Vec<TeacherProfileResponse>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LessonResponse {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub start_datetime: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CourseDetailsResponse {
    #[serde(flatten)]
    pub course: CourseResponse,
    pub teacher: Option<TeacherResponse>,
    pub lessons: Vec<LessonResponse>,
    pub reviews_count: u64,
    pub comments_count: u64,
    pub rate: Option<f64>,
    /// Absent for anonymous requests
    pub participant: Option<bool>,
    /// Absent for anonymous requests
    pub favorite: Option<bool>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct CourseQueryParams {
    /// Text matched against course names and descriptions
    pub search: Option<String>,
    #[param(value_type = Option<String>, example = "easy")]
    pub complexity: Option<Complexity>,
    /// Courses starting on the same day
    pub start_datetime: Option<DateTime<Utc>>,
    /// Day of the week from 1 (Sunday) to 7 (Saturday)
    pub day: Option<u8>,
    /// Courses ending no later than this
    pub end_datetime: Option<DateTime<Utc>>,
}

impl TryFrom<CourseQueryParams> for CourseFilter {
    type Error = AppError;

    fn try_from(params: CourseQueryParams) -> Result<Self, Self::Error> {
        let day = params
            .day
            .map(WeekDay::try_from)
            .transpose()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        Ok(CourseFilter {
            query: params.search,
            complexity: params.complexity,
            start_datetime: params.start_datetime,
            day,
            end_datetime: params.end_datetime,
        })
    }
}

impl From<course::Model> for CourseResponse {
    fn from(course: course::Model) -> Self {
        Self {
            end_datetime: course.end_datetime(),
            id: course.id,
            teacher_id: course.teacher_id,
            name: course.name,
            description: course.description,
            price: course.price,
            complexity: course.complexity,
            start_datetime: course.start_datetime,
            duration: course.duration,
            created_at: course.created_at,
            updated_at: course.updated_at,
        }
    }
}

impl From<questionnaire_teacher::Model> for TeacherProfileResponse {
    fn from(profile: questionnaire_teacher::Model) -> Self {
        Self {
            id: profile.id,
            name: profile.name,
            surname: profile.surname,
            about_me: profile.about_me,
            work_experience: profile.work_experience,
        }
    }
}

impl From<TeacherDetails> for TeacherResponse {
    fn from(teacher: TeacherDetails) -> Self {
        Self {
            id: teacher.user.id,
            first_name: teacher.user.first_name,
            last_name: teacher.user.last_name,
            rate: teacher.user.rate,
            profiles: teacher.profiles.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<lesson::Model> for LessonResponse {
    fn from(lesson: lesson::Model) -> Self {
        Self {
            id: lesson.id,
            name: lesson.name,
            description: lesson.description,
            start_datetime: lesson.start_datetime,
        }
    }
}

impl From<CourseDetails> for CourseDetailsResponse {
    fn from(details: CourseDetails) -> Self {
        Self {
            course: details.course.into(),
            teacher: details.teacher.map(Into::into),
            lessons: details.lessons.into_iter().map(Into::into).collect(),
            reviews_count: details.reviews_count,
            comments_count: details.comments_count,
            rate: details.rate,
            participant: details.participant,
            favorite: details.favorite,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_query_params_into_filter() {
        let params = CourseQueryParams {
            search: Some("python".to_owned()),
            complexity: Some(Complexity::Hard),
            day: Some(1),
            ..Default::default()
        };

        let filter = CourseFilter::try_from(params).unwrap();
        assert_eq!(filter.search_text(), Some("python"));
        assert_eq!(filter.complexity, Some(Complexity::Hard));
        assert_eq!(filter.day, Some(WeekDay::SUNDAY));
    }

    #[test]
    fn test_invalid_day_is_rejected() {
        let params = CourseQueryParams {
            day: Some(8),
            ..Default::default()
        };

        assert!(matches!(
            CourseFilter::try_from(params),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_course_response_includes_end() {
        let start = Utc.with_ymd_and_hms(2023, 2, 14, 18, 0, 0).unwrap();
        let course = course::Model {
            id: 1,
            teacher_id: 2,
            name: "Sketching".to_owned(),
            description: "Pencil and ink".to_owned(),
            price: None,
            complexity: Complexity::Easy,
            start_datetime: start,
            duration: 5400,
            created_at: start,
            updated_at: start,
        };

        let response = CourseResponse::from(course);
        assert_eq!(
            response.end_datetime,
            Utc.with_ymd_and_hms(2023, 2, 14, 19, 30, 0).unwrap()
        );

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["complexity"], "easy");
        assert!(json["price"].is_null());
    }
}
