pub mod config;
pub mod error;

// Catalog data and ingestion
pub mod catalog;

// Search and prerequisite graphs
pub mod graph;
pub mod indexer;
pub mod service;

// Outer surfaces
pub mod api;
pub mod cli;

// Re-exports
pub use config::Settings;
pub use error::{Error, Result};
pub use service::CatalogService;
