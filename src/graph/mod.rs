// Prerequisite graphs: one directed graph per department per term, built once at
// startup and materialized per request without touching the shared copy.

pub mod builder;
pub mod digraph;
pub mod normalize;
pub mod prereq;
pub mod render;

// Re-exports
pub use builder::{build_graphs, DepartmentGraphs, MajorGraphMap};
pub use digraph::DepartmentGraph;
pub use normalize::{normalize_code, CODE_SEPARATOR};
pub use prereq::extract_prerequisites;
pub use render::{render, RenderedEdge, RenderedGraph, RenderedNode};
