pub mod enrollment;

pub use enrollment::EnrollmentService;
