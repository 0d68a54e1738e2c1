// Authors: "graph2tsv contributors"
use graph2tsv::io;

use clap::Parser;

/// Print the adjacency matrix of a GML graph as tab separated values
#[derive(Parser, Debug)]
#[clap(version, about, long_about = None)]
struct Args {
    /// GML input file location
    input: String,

    /// node attribute used as node name ("id" names nodes by their id)
    #[clap(short, long, default_value = "label")]
    label: String,
}

fn main() {
    env_logger::init();
    let args = Args::parse();
    let result = io::read_gml_file(&args.input, &args.label)
        .and_then(|g| io::save_tsv(&mut std::io::stdout().lock(), &g));
    if let Err(e) = result {
        eprintln!("{}: {}", args.input, e);
        std::process::exit(1);
    }
}
