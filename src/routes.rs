pub mod edit_student;
pub mod index;
pub mod login;
pub mod student_in_detail;
pub mod students;
