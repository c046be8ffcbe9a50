pub mod prelude;

pub mod comment;
pub mod course;
pub mod course_favorite;
pub mod lesson;
pub mod lesson_participant;
pub mod questionnaire_teacher;
pub mod review;
pub mod ticket;
pub mod user;
