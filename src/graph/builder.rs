use crate::catalog::{CourseRecord, TermKey};
use crate::graph::{extract_prerequisites, normalize_code, DepartmentGraph};
use std::collections::HashMap;
use tracing::debug;

/// Department name -> prerequisite graph, for a single term.
/// Courses without sections share the `""` department.
pub type DepartmentGraphs = HashMap<String, DepartmentGraph>;

/// Build one prerequisite graph per department from a term's course records.
///
/// An edge `prereq -> course` is added for every course code found in the
/// course's prerequisite text, both sides normalized, unless they are the same
/// node. When a code appears in several records only the last one is used.
pub fn build_graphs(courses: &[CourseRecord]) -> DepartmentGraphs {
    let mut last_seen: HashMap<&str, usize> = HashMap::new();
    for (position, course) in courses.iter().enumerate() {
        last_seen.insert(course.code.as_str(), position);
    }

    let mut graphs = DepartmentGraphs::new();
    for (position, course) in courses.iter().enumerate() {
        if last_seen.get(course.code.as_str()) != Some(&position) {
            continue;
        }

        let graph = graphs.entry(course.department().to_string()).or_default();
        let course_node = normalize_code(&course.code);

        for prereq in extract_prerequisites(&course.prerequisites) {
            let prereq_node = normalize_code(prereq);
            if prereq_node != course_node {
                graph.add_edge(&prereq_node, &course_node);
            }
        }
    }

    graphs
}

/// Every term's department graphs.
///
/// Populated during initialization and only read afterwards; requests get their
/// own copies through [`crate::graph::render`].
#[derive(Debug, Clone, Default)]
pub struct MajorGraphMap {
    terms: HashMap<TermKey, DepartmentGraphs>,
}

impl MajorGraphMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build and store the graphs for one term, replacing any previous ones
    pub fn build_term(&mut self, term: TermKey, courses: &[CourseRecord]) -> &DepartmentGraphs {
        let graphs = build_graphs(courses);

        debug!(
            "Built {} department graph(s) with {} edge(s) for {}",
            graphs.len(),
            graphs.values().map(DepartmentGraph::edge_count).sum::<usize>(),
            term
        );

        self.terms.insert(term.clone(), graphs);
        &self.terms[&term]
    }

    pub fn get(&self, term: &TermKey, department: &str) -> Option<&DepartmentGraph> {
        self.terms.get(term)?.get(department)
    }

    pub fn contains_term(&self, term: &TermKey) -> bool {
        self.terms.contains_key(term)
    }

    /// Department names of a term, sorted
    pub fn departments(&self, term: &TermKey) -> Vec<&str> {
        let mut departments: Vec<&str> = self
            .terms
            .get(term)
            .map(|graphs| graphs.keys().map(String::as_str).collect())
            .unwrap_or_default();
        departments.sort_unstable();
        departments
    }
}
