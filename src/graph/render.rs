use crate::catalog::TermKey;
use crate::graph::{normalize_code, DepartmentGraph, MajorGraphMap};
use serde::Serialize;
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedNode {
    pub id: String,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedEdge {
    pub source: String,
    pub target: String,
}

/// Render-ready snapshot of a department graph
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RenderedGraph {
    pub nodes: Vec<RenderedNode>,
    pub edges: Vec<RenderedEdge>,
}

/// Materialize `base` for a student who has completed `completed`.
///
/// Works on a private copy: completed courses missing from the graph are added
/// as isolated nodes there, never in `base`. A missing graph renders as if empty.
pub fn render(base: Option<&DepartmentGraph>, completed: &[String]) -> RenderedGraph {
    let mut graph = base.cloned().unwrap_or_default();

    let completed: Vec<String> = completed
        .iter()
        .map(|code| normalize_code(code))
        .filter(|code| !code.is_empty())
        .collect();

    for code in &completed {
        graph.add_node(code);
    }

    let selected: HashSet<&str> = completed.iter().map(String::as_str).collect();

    RenderedGraph {
        nodes: graph
            .nodes()
            .map(|id| RenderedNode {
                id: id.to_string(),
                selected: selected.contains(id),
            })
            .collect(),
        edges: graph
            .edges()
            .map(|(source, target)| RenderedEdge {
                source: source.to_string(),
                target: target.to_string(),
            })
            .collect(),
    }
}

impl MajorGraphMap {
    /// Materialize the graph of `department` in `term`
    pub fn render(&self, term: &TermKey, department: &str, completed: &[String]) -> RenderedGraph {
        render(self.get(term, department), completed)
    }
}
