// Course catalog data model and the file-based ingestion adapter

pub mod course;
pub mod loader;
pub mod term;

// Re-exports
pub use course::{CourseRecord, Instructor, Section};
pub use loader::{discover_term_files, load_courses, LoadedCourses, TermFile};
pub use term::TermKey;
