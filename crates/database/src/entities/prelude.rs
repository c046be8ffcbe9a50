pub use super::comment::Entity as Comment;
pub use super::course::Entity as Course;
pub use super::course_favorite::Entity as CourseFavorite;
pub use super::lesson::Entity as Lesson;
pub use super::lesson_participant::Entity as LessonParticipant;
pub use super::questionnaire_teacher::Entity as QuestionnaireTeacher;
pub use super::review::Entity as Review;
pub use super::ticket::Entity as Ticket;
pub use super::user::Entity as User;
