use std::io::Write;

use rayon::prelude::*;

use crate::graph::*;

/// Dense 0/1 adjacency matrix over the nodes of a graph, in node order.
///
/// Row `k` and column `k` belong to the node named `names()[k]`.
#[derive(Clone, Debug, PartialEq)]
pub struct AdjacencyMatrix {
    names: Vec<String>,
    rows: Vec<Vec<bool>>,
}

impl AdjacencyMatrix {
    pub fn from_graph(graph: &LabeledGraph) -> Self {
        let nodes: Vec<Node> = graph.iter_nodes().collect();
        let names: Vec<String> = nodes.iter().map(|&v| graph.name(v).to_string()).collect();
        let mut rows: Vec<Vec<bool>> = vec![];
        nodes.par_iter().map(|&from| {
            nodes.iter().map(|&to| graph.has_edge(from, to)).collect()
        }).collect_into_vec(&mut rows);
        AdjacencyMatrix { names, rows }
    }

    pub fn nnodes(&self) -> usize {
        self.names.len()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn get(&self, row: usize, col: usize) -> bool {
        self.rows[row][col]
    }

    /// header line of node names, then one line of tab separated 0/1 flags per node
    pub fn write_tsv<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        writeln!(out, "{}", self.names.join("\t"))?;
        for row in &self.rows {
            let flags: Vec<&str> = row.iter().map(|&e| if e { "1" } else { "0" }).collect();
            writeln!(out, "{}", flags.join("\t"))?;
        }
        Ok(())
    }

    pub fn to_tsv(&self) -> String {
        let mut out = vec![];
        // writing into a Vec cannot fail
        let _ = self.write_tsv(&mut out);
        String::from_utf8_lossy(&out).into_owned()
    }
}
