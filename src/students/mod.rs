pub mod dto;
pub mod handlers;
mod repo;
pub mod search;

pub use dto::{PaymentSummary, Student, StudentFee, StudentForm};
pub use handlers::{StudentProfile, StudentsPage};
pub use search::filter_students;
