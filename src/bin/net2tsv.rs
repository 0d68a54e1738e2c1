// Authors: "graph2tsv contributors"
use graph2tsv::io;

use clap::Parser;

/// Print the adjacency matrix of a Pajek .net graph as tab separated values
#[derive(Parser, Debug)]
#[clap(version, about, long_about = None)]
struct Args {
    /// Pajek input file location
    input: String,
}

fn main() {
    env_logger::init();
    let args = Args::parse();
    let result = io::read_pajek_file(&args.input)
        .and_then(|g| io::save_tsv(&mut std::io::stdout().lock(), &g));
    if let Err(e) = result {
        eprintln!("{}: {}", args.input, e);
        std::process::exit(1);
    }
}
