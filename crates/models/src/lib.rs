pub mod complexity;
pub mod course_filter;
pub mod questionnaire_status;
pub mod ticket_status;
pub mod validation;
pub mod week_day;
