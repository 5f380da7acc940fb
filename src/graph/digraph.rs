use std::collections::HashMap;

/// Small directed graph over normalized course codes.
///
/// Nodes live in an arena in insertion order with per-node outgoing edge lists,
/// so iteration order is a pure function of the order edges were added.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DepartmentGraph {
    nodes: Vec<String>,
    lookup: HashMap<String, usize>,
    outgoing: Vec<Vec<usize>>,
    edge_count: usize,
}

impl DepartmentGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node if absent and return its arena index
    pub fn add_node(&mut self, id: &str) -> usize {
        if let Some(&index) = self.lookup.get(id) {
            return index;
        }

        let index = self.nodes.len();
        self.nodes.push(id.to_string());
        self.outgoing.push(Vec::new());
        self.lookup.insert(id.to_string(), index);
        index
    }

    /// Add the edge `from -> to`, creating missing nodes.
    /// Returns false if the edge was already present.
    pub fn add_edge(&mut self, from: &str, to: &str) -> bool {
        let source = self.add_node(from);
        let target = self.add_node(to);

        if self.outgoing[source].contains(&target) {
            return false;
        }

        self.outgoing[source].push(target);
        self.edge_count += 1;
        true
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.lookup.contains_key(id)
    }

    pub fn has_edge(&self, from: &str, to: &str) -> bool {
        match (self.lookup.get(from), self.lookup.get(to)) {
            (Some(&source), Some(&target)) => self.outgoing[source].contains(&target),
            _ => false,
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(String::as_str)
    }

    /// Edges grouped by source node, both in insertion order
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str)> {
        self.outgoing.iter().enumerate().flat_map(move |(source, targets)| {
            targets
                .iter()
                .map(move |&target| (self.nodes[source].as_str(), self.nodes[target].as_str()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_edge_creates_nodes_once() {
        let mut graph = DepartmentGraph::new();
        assert!(graph.add_edge("COP\n3502", "COP\n3503"));
        assert!(graph.add_edge("COP\n3503", "COP\n3530"));
        assert!(!graph.add_edge("COP\n3502", "COP\n3503"));

        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 2);
        assert!(graph.has_edge("COP\n3502", "COP\n3503"));
        assert!(!graph.has_edge("COP\n3503", "COP\n3502"));
    }

    #[test]
    fn test_iteration_order_is_insertion_order() {
        let mut graph = DepartmentGraph::new();
        graph.add_edge("B", "C");
        graph.add_edge("A", "C");
        graph.add_edge("B", "A");

        let nodes: Vec<_> = graph.nodes().collect();
        assert_eq!(nodes, vec!["B", "C", "A"]);

        let edges: Vec<_> = graph.edges().collect();
        assert_eq!(edges, vec![("B", "C"), ("B", "A"), ("A", "C")]);
    }

    #[test]
    fn test_clone_is_independent() {
        let mut base = DepartmentGraph::new();
        base.add_edge("A", "B");

        let mut copy = base.clone();
        copy.add_node("C");
        copy.add_edge("B", "C");

        assert_eq!(base.node_count(), 2);
        assert_eq!(base.edge_count(), 1);
        assert!(!base.contains_node("C"));
        assert_eq!(copy.node_count(), 3);
    }
}
