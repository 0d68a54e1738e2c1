//! Turns GML and Pajek `.net` graph files into tab separated adjacency matrices.

pub mod error;
pub use error::{Error, Result};

pub mod graph;

pub mod gml;
pub mod pajek;

pub mod matrix;

pub mod io;

mod util;

/// small graphs for tests and doctests
pub mod examples {
    use crate::graph::LabeledGraph;

    pub fn triangle() -> LabeledGraph {
        let mut g = LabeledGraph::new(false);
        let a = g.add_node("a");
        let b = g.add_node("b");
        let c = g.add_node("c");
        g.connect(a, b);
        g.connect(b, c);
        g.connect(c, a);
        return g
    }

    pub fn pair() -> LabeledGraph {
        let mut g = LabeledGraph::new(false);
        let x = g.add_node("x");
        let y = g.add_node("y");
        g.connect(x, y);
        return g
    }

    pub fn isolated_pair() -> LabeledGraph {
        let mut g = LabeledGraph::new(false);
        g.add_node("p");
        g.add_node("q");
        return g
    }

    /// s -> m -> t
    pub fn directed_path() -> LabeledGraph {
        let mut g = LabeledGraph::new(true);
        let s = g.add_node("s");
        let m = g.add_node("m");
        let t = g.add_node("t");
        g.connect(s, m);
        g.connect(m, t);
        return g
    }
}
