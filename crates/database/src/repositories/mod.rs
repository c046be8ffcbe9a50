//! Data access over any SeaORM connection or transaction

pub mod course;
pub mod ticket;
pub mod user;

pub use course::{CourseDetails, CourseRepository, TeacherDetails};
pub use ticket::TicketRepository;
pub use user::UserRepository;
