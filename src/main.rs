use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use dependency_ted::{cabocha, compute};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "dependency-ted",
    about = "Tree edit distance between the dependency trees of two sentences"
)]
struct Cli {
    /// CaboCha lattice output holding exactly two sentences (reads stdin when omitted).
    input: Option<PathBuf>,

    /// Digits printed after the decimal point of the distance.
    #[arg(long, default_value_t = 6)]
    precision: usize,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let reader: Box<dyn BufRead> = match &cli.input {
        Some(path) => Box::new(BufReader::new(File::open(path).with_context(|| {
            format!("failed to open {}", path.display())
        })?)),
        None => Box::new(io::stdin().lock()),
    };

    run(reader, io::stdout().lock(), cli.precision)
}

/// Compares the two sentences read from `input` and writes the distance and edits to `output`.
fn run<R: BufRead, W: Write>(input: R, output: W, precision: usize) -> Result<()> {
    let sentences = cabocha::parse(input).context("failed to parse CaboCha output")?;

    let [left, right] = &sentences[..] else {
        bail!("expected exactly two sentences, found {}", sentences.len());
    };

    let t1 = left.to_tree().context("malformed first sentence")?;
    let t2 = right.to_tree().context("malformed second sentence")?;

    info!(left = t1.len(), right = t2.len(), "comparing");

    let (distance, edits) = compute(&t1, &t2);

    let mut out = BufWriter::new(output);
    writeln!(out, "TED\t{:.*}", precision, f64::from(distance))?;
    for edit in edits.iter() {
        writeln!(out, "OPERATION\t{edit}")?;
    }
    out.flush()?;

    Ok(())
}
