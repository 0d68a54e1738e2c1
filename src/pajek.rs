//! Reader for Pajek `.net` network files.

use std::collections::HashMap;

use log::{debug, warn};

use crate::error::{Error, Result};
use crate::graph::*;
use crate::util::split_quoted;

#[derive(Clone, Copy, Debug, PartialEq)]
enum Section {
    /// before the first section or after a completed `*Vertices` block
    Outside,
    Vertices { remaining: usize },
    /// `*Arcs` (directed) or `*Edges`
    Links { arcs: bool },
    /// `*Arcslist` or `*Edgeslist`
    LinkLists { arcs: bool },
    Matrix { row: usize },
}

struct PajekReader {
    graph: LabeledGraph,
    /// vertex id as written in the file -> node
    ids: HashMap<String, Node>,
    /// nodes in `*Vertices` order, which indexes `*Matrix` rows and columns
    vertices: Vec<Node>,
    section: Section,
    line: usize,
}

impl PajekReader {
    fn new() -> Self {
        PajekReader {
            graph: LabeledGraph::new(false),
            ids: HashMap::new(),
            vertices: vec![],
            section: Section::Outside,
            line: 0,
        }
    }

    fn error<T>(&self, msg: impl Into<String>) -> Result<T> {
        Err(Error::Pajek { line: self.line, msg: msg.into() })
    }

    fn words(&self, line: &str) -> Result<Vec<String>> {
        match split_quoted(line) {
            Ok(words) => Ok(words),
            Err(msg) => self.error(msg),
        }
    }

    /// link endpoints name a vertex id, or otherwise a node directly
    fn resolve(&mut self, word: &str) -> Node {
        match self.ids.get(word) {
            Some(&v) => v,
            None => self.graph.add_node(word),
        }
    }

    fn link(&mut self, from: Node, to: Node, arcs: bool) {
        if arcs {
            self.graph.add_edge(from, to);
        }
        else {
            self.graph.add_undirected_edge(from, to);
        }
    }

    fn header(&mut self, line: &str) -> Result<()> {
        if let Section::Vertices { remaining } = self.section {
            if remaining > 0 {
                return self.error(format!("section header before {} more vertex lines", remaining));
            }
        }
        let mut words = line.split_whitespace();
        let keyword = words.next().unwrap_or("*").to_lowercase();
        self.section = match keyword.as_str() {
            "*network" => {
                debug!("network {:?}", words.collect::<Vec<_>>().join(" "));
                Section::Outside
            }
            "*vertices" => {
                let count = match words.next().map(str::parse::<usize>) {
                    Some(Ok(count)) => count,
                    _ => return self.error("*Vertices needs a vertex count"),
                };
                debug!("reading {} vertices", count);
                match count {
                    0 => Section::Outside,
                    remaining => Section::Vertices { remaining },
                }
            }
            "*arcs" => Section::Links { arcs: true },
            "*edges" => Section::Links { arcs: false },
            "*arcslist" => Section::LinkLists { arcs: true },
            "*edgeslist" => Section::LinkLists { arcs: false },
            "*matrix" => Section::Matrix { row: 0 },
            _ => return self.error(format!("unknown section {}", keyword)),
        };
        if matches!(self.section, Section::Links { arcs: true } | Section::LinkLists { arcs: true } | Section::Matrix { .. }) {
            self.graph.set_directed(true);
        }
        Ok(())
    }

    fn vertex(&mut self, line: &str, remaining: usize) -> Result<()> {
        let words = self.words(line)?;
        let (id, label) = match &words[..] {
            [id, label, ..] => (id.clone(), label.clone()),
            _ => return self.error("vertex line needs an id and a label"),
        };
        // coordinates, shape and attributes follow; only the label matters here
        let v = self.graph.add_node(label);
        self.ids.insert(id, v);
        self.vertices.push(v);
        self.section = match remaining - 1 {
            0 => Section::Outside,
            remaining => Section::Vertices { remaining },
        };
        Ok(())
    }

    fn links(&mut self, line: &str, arcs: bool) -> Result<()> {
        let words = self.words(line)?;
        if words.len() < 2 {
            warn!("line {}: skipping link line with fewer than two vertices", self.line);
            return Ok(());
        }
        // words[2..] hold the weight and attributes
        let from = self.resolve(&words[0]);
        let to = self.resolve(&words[1]);
        self.link(from, to, arcs);
        Ok(())
    }

    fn link_list(&mut self, line: &str, arcs: bool) -> Result<()> {
        let words = self.words(line)?;
        if let Some((from, targets)) = words.split_first() {
            let from = self.resolve(from);
            for to in targets {
                let to = self.resolve(to);
                self.link(from, to, arcs);
            }
        }
        Ok(())
    }

    fn matrix_row(&mut self, line: &str, row: usize) -> Result<()> {
        if row >= self.vertices.len() {
            return self.error(format!("matrix has more rows than the {} vertices", self.vertices.len()));
        }
        for (col, entry) in line.split_whitespace().enumerate() {
            if col >= self.vertices.len() {
                return self.error(format!("matrix row {} has more columns than the {} vertices", row + 1, self.vertices.len()));
            }
            let weight = match entry.parse::<f64>() {
                Ok(w) => w,
                Err(_) => return self.error(format!("invalid matrix entry {:?}", entry)),
            };
            if weight != 0.0 {
                self.graph.add_edge(self.vertices[row], self.vertices[col]);
            }
        }
        self.section = Section::Matrix { row: row + 1 };
        Ok(())
    }

    fn feed(&mut self, line: &str) -> Result<()> {
        self.line += 1;
        let line = line.trim();
        if line.is_empty() || line.starts_with('%') {
            return Ok(());
        }
        if line.starts_with('*') {
            return self.header(line);
        }
        match self.section {
            Section::Outside => {
                warn!("line {}: ignoring line outside of any section", self.line);
                Ok(())
            }
            Section::Vertices { remaining } => self.vertex(line, remaining),
            Section::Links { arcs } => self.links(line, arcs),
            Section::LinkLists { arcs } => self.link_list(line, arcs),
            Section::Matrix { row } => self.matrix_row(line, row),
        }
    }

    fn finish(self) -> Result<LabeledGraph> {
        if let Section::Vertices { remaining } = self.section {
            return self.error(format!("input ended {} vertex lines early", remaining));
        }
        Ok(self.graph)
    }
}

/// builds a graph from the text of a Pajek `.net` file
/// ```
/// use graph2tsv::graph::*;
/// let g = graph2tsv::pajek::parse_graph("*Vertices 2\n1 \"a b\"\n2 c\n*Arcs\n1 2 1.0\n").unwrap();
/// assert_eq!(g.names().collect::<Vec<_>>(), vec!["a b", "c"]);
/// assert!(g.has_edge(0, 1));
/// assert!(!g.has_edge(1, 0));
/// ```
pub fn parse_graph(src: &str) -> Result<LabeledGraph> {
    let mut reader = PajekReader::new();
    for line in src.lines() {
        reader.feed(line)?;
    }
    let g = reader.finish()?;
    debug!("Pajek graph: {} nodes, {} arcs, directed: {}", g.nnodes(), g.edges().len(), g.is_directed());
    return Ok(g);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertices_and_edges() {
        let src = "*Network test\n*Vertices 3\n1 \"a\" 0.1 0.2 0.5\n2 \"b\"\n3 \"c\" ic Red\n*Edges\n1 2\n2 3 2.0\n";
        let g = parse_graph(src).unwrap();
        assert!(!g.is_directed());
        assert_eq!(g.names().collect::<Vec<_>>(), vec!["a", "b", "c"]);
        assert_eq!(g.edges(), vec![[0, 1], [1, 0], [1, 2], [2, 1]]);
    }

    #[test]
    fn headers_ignore_case_and_comments_are_skipped() {
        let src = "% made by hand\n*VERTICES 2\n\n1 x\n% between\n2 y\n*arcs\n2 1\n";
        let g = parse_graph(src).unwrap();
        assert!(g.is_directed());
        assert_eq!(g.edges(), vec![[1, 0]]);
    }

    #[test]
    fn arcs_and_edges_mix() {
        let src = "*Vertices 3\n1 a\n2 b\n3 c\n*Arcs\n1 2\n*Edges\n2 3\n";
        let g = parse_graph(src).unwrap();
        assert!(g.is_directed());
        assert!(g.has_edge(0, 1));
        assert!(!g.has_edge(1, 0));
        assert!(g.has_edge(1, 2));
        assert!(g.has_edge(2, 1));
    }

    #[test]
    fn unknown_ids_become_nodes() {
        let g = parse_graph("*Edges\nx y\ny z\n").unwrap();
        assert_eq!(g.names().collect::<Vec<_>>(), vec!["x", "y", "z"]);
        assert!(g.has_edge(2, 1));

        let g = parse_graph("*Vertices 1\n1 a\n*Edges\n1 7\n").unwrap();
        assert_eq!(g.names().collect::<Vec<_>>(), vec!["a", "7"]);
    }

    #[test]
    fn repeated_labels_share_a_node() {
        let g = parse_graph("*Vertices 2\n1 a\n2 a\n*Edges\n1 2\n").unwrap();
        assert_eq!(g.nnodes(), 1);
        assert!(g.has_edge(0, 0));
    }

    #[test]
    fn link_lists() {
        let src = "*Vertices 3\n1 a\n2 b\n3 c\n*Arcslist\n1 2 3\n3\n";
        let g = parse_graph(src).unwrap();
        assert_eq!(g.edges(), vec![[0, 1], [0, 2]]);
        let src = "*Vertices 3\n1 a\n2 b\n3 c\n*Edgeslist\n1 2 3\n";
        let g = parse_graph(src).unwrap();
        assert!(!g.is_directed());
        assert_eq!(g.edges_from(2), vec![0]);
    }

    #[test]
    fn matrix() {
        let src = "*Vertices 3\n1 a\n2 b\n3 c\n*Matrix\n0 1 0\n0 0 0.5\n1 0 0\n";
        let g = parse_graph(src).unwrap();
        assert!(g.is_directed());
        assert_eq!(g.edges(), vec![[0, 1], [1, 2], [2, 0]]);
    }

    #[test]
    fn empty_vertex_section() {
        let g = parse_graph("*Vertices 0\n*Edges\n").unwrap();
        assert_eq!(g.nnodes(), 0);
    }

    #[test]
    fn stray_lines_outside_sections_are_ignored() {
        let g = parse_graph("junk\n*Vertices 1\n1 a\nmore junk\n*Edges\n").unwrap();
        assert_eq!(g.names().collect::<Vec<_>>(), vec!["a"]);
        assert!(g.edges().is_empty());
    }

    #[test]
    fn short_link_lines_are_skipped() {
        let g = parse_graph("*Vertices 2\n1 a\n2 b\n*Edges\n1\n1 2\n").unwrap();
        assert_eq!(g.edges().len(), 2);
    }

    #[test]
    fn errors() {
        for (src, line, needle) in [
            ("*Vertices 3\n1 a\n2 b\n", 3, "1 vertex lines early"),
            ("*Vertices 2\n1 a\n*Edges\n", 3, "1 more vertex"),
            ("*Vertices\n", 1, "vertex count"),
            ("*Vertices zero\n", 1, "vertex count"),
            ("*Vertices 1\n1\n", 2, "id and a label"),
            ("*Vertices 1\n1 \"open\n", 2, "unterminated"),
            ("*Hyperedges\n", 1, "unknown section"),
            ("*Vertices 1\n1 a\n*Matrix\n0\n1\n", 5, "more rows"),
            ("*Vertices 1\n1 a\n*Matrix\n0 1\n", 4, "more columns"),
            ("*Vertices 1\n1 a\n*Matrix\nx\n", 4, "invalid matrix entry"),
        ] {
            match parse_graph(src) {
                Err(Error::Pajek { line: l, msg }) => {
                    assert_eq!(l, line, "{:?}", src);
                    assert!(msg.contains(needle), "{:?}: {}", src, msg);
                }
                other => panic!("{:?}: expected Pajek error, got {:?}", src, other),
            }
        }
    }
}
