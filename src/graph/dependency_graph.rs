use indexmap::IndexMap;

#[derive(Debug, Clone, PartialEq)]
pub struct GraphNode {
    pub duration_hours: f64,
    /// Set when the node exists only because another task depends on it.
    pub implicit: bool,
    /// Indices of direct dependencies, in edge insertion order.
    pub predecessors: Vec<usize>,
    /// Indices of direct dependents, in edge insertion order.
    pub successors: Vec<usize>,
}

/// Directed dependency graph keyed by task name.
///
/// Nodes keep the position of the first time their name was seen, which is
/// what makes topological ordering reproducible. Edges point from a
/// dependency to its dependent and are stored by node index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DependencyGraph {
    nodes: IndexMap<String, GraphNode>,
    edge_count: usize,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node or overwrite the duration of an existing one.
    pub fn upsert_node(&mut self, name: &str, duration_hours: f64) -> usize {
        match self.nodes.get_index_of(name) {
            Some(idx) => {
                let node = &mut self.nodes[idx];
                node.duration_hours = duration_hours;
                node.implicit = false;
                idx
            }
            None => {
                let (idx, _) = self.nodes.insert_full(
                    name.to_string(),
                    GraphNode {
                        duration_hours,
                        implicit: false,
                        predecessors: Vec::new(),
                        successors: Vec::new(),
                    },
                );
                idx
            }
        }
    }

    /// Index of `name`, creating an implicit node if it does not exist yet.
    pub fn ensure_node(&mut self, name: &str, default_duration_hours: f64) -> usize {
        if let Some(idx) = self.nodes.get_index_of(name) {
            return idx;
        }
        let (idx, _) = self.nodes.insert_full(
            name.to_string(),
            GraphNode {
                duration_hours: default_duration_hours,
                implicit: true,
                predecessors: Vec::new(),
                successors: Vec::new(),
            },
        );
        idx
    }

    /// Add `from -> to`. Returns `false` if the edge already existed.
    pub fn add_edge(&mut self, from: usize, to: usize) -> bool {
        if self.nodes[from].successors.contains(&to) {
            return false;
        }
        self.nodes[from].successors.push(to);
        self.nodes[to].predecessors.push(from);
        self.edge_count += 1;
        true
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.nodes.get_index_of(name)
    }

    pub fn name(&self, idx: usize) -> &str {
        self.nodes
            .get_index(idx)
            .map(|(name, _)| name.as_str())
            .unwrap_or_default()
    }

    pub fn node(&self, idx: usize) -> &GraphNode {
        &self.nodes[idx]
    }

    pub fn get(&self, name: &str) -> Option<&GraphNode> {
        self.nodes.get(name)
    }

    pub fn contains_edge(&self, from: &str, to: &str) -> bool {
        match (self.index_of(from), self.index_of(to)) {
            (Some(u), Some(v)) => self.nodes[u].successors.contains(&v),
            _ => false,
        }
    }

    /// Names of the direct dependencies of `name`.
    pub fn predecessors_of(&self, name: &str) -> Vec<&str> {
        self.get(name)
            .map(|node| node.predecessors.iter().map(|&p| self.name(p)).collect())
            .unwrap_or_default()
    }

    /// Names of the direct dependents of `name`.
    pub fn successors_of(&self, name: &str) -> Vec<&str> {
        self.get(name)
            .map(|node| node.successors.iter().map(|&s| self.name(s)).collect())
            .unwrap_or_default()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upsert_overwrites_duration_but_keeps_position() {
        let mut graph = DependencyGraph::new();
        let a = graph.upsert_node("A", 2.0);
        graph.upsert_node("B", 1.0);
        let a_again = graph.upsert_node("A", 5.0);

        assert_eq!(a, a_again);
        assert_eq!(graph.len(), 2);
        assert_eq!(graph.node(a).duration_hours, 5.0);
        assert_eq!(graph.names().collect::<Vec<_>>(), vec!["A", "B"]);
    }

    #[test]
    fn duplicate_edges_are_ignored() {
        let mut graph = DependencyGraph::new();
        let a = graph.upsert_node("A", 1.0);
        let b = graph.upsert_node("B", 1.0);
        assert!(graph.add_edge(a, b));
        assert!(!graph.add_edge(a, b));
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.predecessors_of("B"), vec!["A"]);
        assert_eq!(graph.successors_of("A"), vec!["B"]);
    }

    #[test]
    fn implicit_node_becomes_explicit_when_upserted() {
        let mut graph = DependencyGraph::new();
        let ghost = graph.ensure_node("Ghost", 1.0);
        assert!(graph.node(ghost).implicit);
        graph.upsert_node("Ghost", 3.0);
        assert!(!graph.node(ghost).implicit);
        assert_eq!(graph.node(ghost).duration_hours, 3.0);
    }
}
