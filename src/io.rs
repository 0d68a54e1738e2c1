use std::io::prelude::*;

use log::info;

use crate::error::Result;
use crate::graph::*;
use crate::matrix::AdjacencyMatrix;
use crate::{gml, pajek};

/// reads a GML file, naming nodes by their `label` attribute (or by id for `"id"`)
pub fn read_gml_file(fname: &str, label: &str) -> Result<LabeledGraph> {
    let contents = std::fs::read_to_string(fname)?;
    let graph = gml::parse_graph(&contents, label)?;
    info!("{}: {} nodes, directed: {}", fname, graph.nnodes(), graph.is_directed());
    return Ok(graph);
}

pub fn read_pajek_file(fname: &str) -> Result<LabeledGraph> {
    let contents = std::fs::read_to_string(fname)?;
    let graph = pajek::parse_graph(&contents)?;
    info!("{}: {} nodes, directed: {}", fname, graph.nnodes(), graph.is_directed());
    return Ok(graph);
}

/// writes the adjacency matrix of `graph` as tab separated values.
/// the whole matrix is computed before the first byte is written.
pub fn save_tsv<W: Write>(out: &mut W, graph: &LabeledGraph) -> Result<()> {
    let matrix = AdjacencyMatrix::from_graph(graph);
    let mut out = std::io::BufWriter::new(out);
    matrix.write_tsv(&mut out)?;
    out.flush()?;
    return Ok(());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn temp_file(name: &str, contents: &str) -> String {
        let path = std::env::temp_dir().join(format!("graph2tsv-io-{}-{}", std::process::id(), name));
        std::fs::write(&path, contents).unwrap();
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn gml_file_to_tsv() {
        let _ = env_logger::builder().is_test(true).try_init();
        let path = temp_file("pair.gml", "graph [ node [ id 0 label \"x\" ] node [ id 1 label \"y\" ] edge [ source 0 target 1 ] ]");
        let g = read_gml_file(&path, "label").unwrap();
        let mut out = vec![];
        save_tsv(&mut out, &g).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "x\ty\n0\t1\n1\t0\n");
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn pajek_file_to_tsv() {
        let _ = env_logger::builder().is_test(true).try_init();
        let path = temp_file("pair.net", "*Vertices 2\n1 \"p\"\n2 \"q\"\n*Edges\n");
        let g = read_pajek_file(&path).unwrap();
        let mut out = vec![];
        save_tsv(&mut out, &g).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "p\tq\n0\t0\n0\t0\n");
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let path = std::env::temp_dir().join("graph2tsv-io-does-not-exist.gml");
        let path = path.to_string_lossy();
        assert!(matches!(read_gml_file(&path, "label"), Err(Error::Io(_))));
        assert!(matches!(read_pajek_file(&path), Err(Error::Io(_))));
    }
}
