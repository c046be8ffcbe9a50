pub mod course;
pub mod ticket;
pub mod user;
