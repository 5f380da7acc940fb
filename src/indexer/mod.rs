// Term-partitioned course search: one tantivy index per term, built once at
// startup and queried read-only afterwards.

pub mod query;
pub mod schema;
pub mod search;
pub mod store;

// Re-exports
pub use query::prefix_terms;
pub use schema::CourseSchema;
pub use search::{BuildOutcome, BuildPolicy, IndexOptions, TermIndex};
pub use store::TermIndexStore;
