use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// reading the input file failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// the GML text could not be tokenized or its brackets do not balance
    #[error("GML syntax error on line {line}: {msg}")]
    GmlSyntax { line: usize, msg: String },

    /// well-formed GML that does not describe a valid graph
    #[error("invalid GML graph: {0}")]
    Gml(String),

    #[error("Pajek error on line {line}: {msg}")]
    Pajek { line: usize, msg: String },
}
