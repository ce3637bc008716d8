//! CLI entry point for `sql-complexity`.

use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use sql_complexity::error::Error;
use sql_complexity::input;
use sql_complexity::output::formatter;
use sql_complexity::{Analyzer, ComplexityWeights};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "sql-complexity",
    about = "Score SQL queries by structural complexity"
)]
struct Cli {
    /// Input table (.csv or .json) with a `sql` column
    input: PathBuf,

    /// Output directory
    #[arg(long, default_value = "sql-complexity-output")]
    output_dir: PathBuf,

    /// Base name for output files (defaults to the input file stem)
    #[arg(long)]
    name: Option<String>,

    /// SQL dialect used for tokenizing
    #[arg(long, default_value = "generic")]
    dialect: String,

    /// JSON file overriding the default score weights
    #[arg(long)]
    weights: Option<PathBuf>,

    /// Print verbose diagnostics
    #[arg(long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(&cli) {
        error!("{e}");
        process::exit(2);
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli) -> Result<(), Error> {
    // Stage 1: Load queries
    let queries = input::load_queries(&cli.input)?;
    info!(count = queries.len(), input = %cli.input.display(), "loaded queries");

    // Stage 2: Load weights
    let weights = match &cli.weights {
        Some(path) => {
            let json = std::fs::read_to_string(path).map_err(|source| Error::Io {
                path: path.clone(),
                source,
            })?;
            ComplexityWeights::load_from_json(&json)?
        }
        None => ComplexityWeights::default(),
    };

    // Stage 3: Analyze
    let analyzer = Analyzer::new(&cli.dialect, weights)?;
    let batch = analyzer.analyze_batch(&queries);

    // Stage 4: Write output
    let name = cli
        .name
        .clone()
        .unwrap_or_else(|| default_name(&cli.input));
    formatter::write_output(&cli.output_dir, &name, &batch)?;

    info!(
        analyzed = batch.records.len(),
        skipped = batch.skipped.len(),
        output_dir = %cli.output_dir.display(),
        "wrote {name}_analysis.csv, {name}_analysis.json, {name}_report.md"
    );
    Ok(())
}

fn default_name(input: &Path) -> String {
    input
        .file_stem()
        .and_then(|stem| stem.to_str())
        .filter(|stem| !stem.is_empty())
        .unwrap_or("queries")
        .to_string()
}
