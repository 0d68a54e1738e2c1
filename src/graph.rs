pub type Node = u32;

pub type Edge = [Node; 2];

use indexmap::set::IndexSet;

pub trait DirectedGraph: Sync {
    fn has_edge(&self, from: Node, to: Node) -> bool;
    fn add_edge(&mut self, from: Node, to: Node);
    fn nnodes(&self) -> usize;
    fn iter_nodes(&self) -> std::ops::Range<Node> {
        0..(self.nnodes() as Node)
    }

    fn edges(&self) -> Vec<Edge> {
        let mut edges = vec![];
        for from in self.iter_nodes() {
            for to in self.iter_nodes() {
                if self.has_edge(from, to) {
                    edges.push([from, to]);
                }
            }
        }
        return edges
    }

    fn edges_from(&self, from: Node) -> Vec<Node>{
        let mut res = vec![];
        for to in self.iter_nodes() {
            if self.has_edge(from, to) {
                res.push(to);
            }
        }
        return res;
    }
}

/// Graph whose nodes carry unique names and keep the order they were added in.
///
/// Edges are stored as arcs. An undirected edge is the pair of arcs in both directions,
/// so `has_edge` answers the same question for both kinds of graph.
#[derive(Clone, Default)]
pub struct LabeledGraph {
    names: IndexSet<String>,
    successors: Vec<IndexSet<Node>>,
    directed: bool,
}

impl std::fmt::Debug for LabeledGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let kind = if self.directed { "Directed" } else { "Undirected" };
        return write!(f, "{} graph with nodes {:?} and the following edges: {:?}", kind, self.names, self.edges());
    }
}

impl LabeledGraph {
    pub fn new(directed: bool) -> Self {
        LabeledGraph { directed, ..Default::default() }
    }

    pub fn is_directed(&self) -> bool {
        self.directed
    }

    pub fn set_directed(&mut self, directed: bool) {
        self.directed = directed;
    }

    /// adds a node unless one with this name exists; returns its index either way
    /// ```
    /// use graph2tsv::graph::*;
    /// let mut g = LabeledGraph::new(false);
    /// assert_eq!(g.add_node("a"), 0);
    /// assert_eq!(g.add_node("b"), 1);
    /// assert_eq!(g.add_node("a"), 0);
    /// assert_eq!(g.nnodes(), 2);
    /// ```
    pub fn add_node(&mut self, name: impl Into<String>) -> Node {
        let (index, inserted) = self.names.insert_full(name.into());
        if inserted {
            self.successors.push(IndexSet::new());
        }
        index as Node
    }

    pub fn node(&self, name: &str) -> Option<Node> {
        self.names.get_index_of(name).map(|i| i as Node)
    }

    pub fn name(&self, v: Node) -> &str {
        match self.names.get_index(v as usize) {
            Some(name) => name,
            None => panic!("node out of bounds: {} >= {}", v, self.nnodes()),
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn add_undirected_edge(&mut self, a: Node, b: Node) {
        self.add_edge(a, b);
        self.add_edge(b, a);
    }

    /// adds an arc in a directed graph, an edge otherwise
    /// ```
    /// use graph2tsv::graph::*;
    /// let mut g = LabeledGraph::new(false);
    /// let (a, b) = (g.add_node("a"), g.add_node("b"));
    /// g.connect(a, b);
    /// assert!(g.has_edge(b, a));
    /// ```
    pub fn connect(&mut self, from: Node, to: Node) {
        if self.directed {
            self.add_edge(from, to);
        }
        else {
            self.add_undirected_edge(from, to);
        }
    }
}

impl DirectedGraph for LabeledGraph {
    fn nnodes(&self) -> usize {
        return self.names.len();
    }
    fn has_edge(&self, from: Node, to: Node) -> bool {
        if to as usize >= self.nnodes() {
            panic!("to out of bounds: {} >= {}", to, self.nnodes());
        }
        match self.successors.get(from as usize) {
            Some(succ) => succ.contains(&to),
            None => panic!("from out of bounds: {} >= {}", from, self.nnodes()),
        }
    }
    fn add_edge(&mut self, from: Node, to: Node) {
        if to as usize >= self.nnodes() {
            panic!("to out of bounds: {} >= {}", to, self.nnodes());
        }
        match self.successors.get_mut(from as usize) {
            Some(succ) => { succ.insert(to); }
            None => panic!("from out of bounds: {}", from),
        }
    }
    fn edges_from(&self, from: Node) -> Vec<Node> {
        let mut res: Vec<Node> = self.successors[from as usize].iter().cloned().collect();
        res.sort_unstable();
        res
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn undirected_edges_are_symmetric() {
        let g = crate::examples::triangle();
        for [a, b] in g.edges() {
            assert!(g.has_edge(b, a));
        }
        assert_eq!(g.edges().len(), 6);
        assert!(!g.has_edge(0, 0));
    }

    #[test]
    fn arcs_keep_direction() {
        let mut g = LabeledGraph::new(true);
        let a = g.add_node("a");
        let b = g.add_node("b");
        g.connect(a, b);
        assert!(g.has_edge(a, b));
        assert!(!g.has_edge(b, a));
        assert_eq!(g.edges_from(a), vec![b]);
        assert_eq!(g.edges_from(b), Vec::<Node>::new());
    }

    #[test]
    fn names_keep_insertion_order() {
        let mut g = LabeledGraph::new(false);
        for name in ["zeta", "alpha", "mu", "alpha"] {
            g.add_node(name);
        }
        assert_eq!(g.names().collect::<Vec<_>>(), vec!["zeta", "alpha", "mu"]);
        assert_eq!(g.node("mu"), Some(2));
        assert_eq!(g.node("nu"), None);
        assert_eq!(g.name(1), "alpha");
    }

    #[test]
    fn repeated_edges_collapse() {
        let mut g = LabeledGraph::new(false);
        let a = g.add_node("a");
        let b = g.add_node("b");
        g.connect(a, b);
        g.connect(b, a);
        assert_eq!(g.edges(), vec![[0, 1], [1, 0]]);
    }

    #[test]
    #[should_panic]
    fn out_of_bounds_query_panics() {
        let g = crate::examples::pair();
        g.has_edge(0, 2);
    }
}
