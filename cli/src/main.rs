//! Rowgraph CLI: build, inspect and export sparse row graph snapshots
//!
//! Element connectivity input is a JSON array of index arrays, one per
//! element, e.g. `[[0, 2, 4], [1, 2]]`.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use comfy_table::{ContentArrangement, Table};
use rowgraph::assembly::{build_graph, AssemblyOptions};
use rowgraph::{GraphConfig, IndexType, SparseRowGraph};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "rowgraph-cli", version, about = "Sparse row graph CLI")]
struct Cli {
    /// Output format
    #[arg(long, default_value = "table", global = true)]
    format: OutputFormat,

    /// Log at debug level (RUST_LOG takes precedence)
    #[arg(long, short, global = true)]
    verbose: bool,

    /// YAML graph configuration
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, clap::ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a graph from element connectivities and save a snapshot
    Build {
        /// Number of rows (DOFs)
        #[arg(long)]
        size: IndexType,

        /// JSON file with one index array per element
        #[arg(long)]
        input: PathBuf,

        /// Snapshot file to write
        #[arg(long)]
        output: PathBuf,

        /// Gzip the snapshot body
        #[arg(long)]
        compress: bool,

        /// Number of partial graphs (0 = one per thread)
        #[arg(long, default_value_t = 0)]
        partitions: usize,
    },
    /// Print the CSR arrays of a snapshot
    Export {
        /// Snapshot file
        #[arg(long)]
        input: PathBuf,
    },
    /// Print row statistics of a snapshot
    Stats {
        /// Snapshot file
        #[arg(long)]
        input: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(&cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => GraphConfig::from_path(path)
            .with_context(|| format!("reading config {}", path.display()))?,
        None => GraphConfig::default(),
    };
    debug!("Using {:?}", config);

    match &cli.command {
        Commands::Build {
            size,
            input,
            output,
            compress,
            partitions,
        } => run_build(*size, input, output, *compress, *partitions, config),
        Commands::Export { input } => run_export(input, config, &cli.format),
        Commands::Stats { input } => run_stats(input, config, &cli.format),
    }
}

fn run_build(
    size: IndexType,
    input: &Path,
    output: &Path,
    compress: bool,
    partitions: usize,
    mut config: GraphConfig,
) -> Result<()> {
    let text = std::fs::read_to_string(input)
        .with_context(|| format!("reading {}", input.display()))?;
    let elements: Vec<Vec<IndexType>> = serde_json::from_str(&text)
        .with_context(|| format!("parsing {}", input.display()))?;

    for (e, element) in elements.iter().enumerate() {
        if let Some(&bad) = element.iter().find(|&&i| i >= size) {
            bail!("element {} references index {} outside 0..{}", e, bad, size);
        }
    }

    config.snapshot.compress |= compress;
    let options = AssemblyOptions {
        n_partitions: partitions,
        graph_config: config,
    };
    let graph = build_graph(size, &elements, &options);
    info!("Built {} from {} elements", graph, elements.len());

    graph
        .save_to_path(output)
        .with_context(|| format!("writing {}", output.display()))?;
    println!(
        "Wrote {} ({} rows, {} non-zeros)",
        output.display(),
        graph.size(),
        graph.nnz()
    );
    Ok(())
}

fn load(input: &Path, config: GraphConfig) -> Result<SparseRowGraph> {
    SparseRowGraph::load_from_path(input, config)
        .with_context(|| format!("loading {}", input.display()))
}

fn run_export(input: &Path, config: GraphConfig, format: &OutputFormat) -> Result<()> {
    let csr = load(input, config)?.export_csr();

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&csr)?);
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table.set_content_arrangement(ContentArrangement::Dynamic);
            table.set_header(vec!["Row", "Offset", "Entries", "Columns"]);

            for row in 0..csr.nrows() {
                let cols: Vec<String> = csr.row(row).iter().map(|c| c.to_string()).collect();
                table.add_row(vec![
                    row.to_string(),
                    csr.row_indices[row].to_string(),
                    cols.len().to_string(),
                    cols.join(" "),
                ]);
            }

            println!("{}", table);
            println!("{} row(s), {} non-zero(s)", csr.nrows(), csr.nnz());
        }
    }
    Ok(())
}

fn run_stats(input: &Path, config: GraphConfig, format: &OutputFormat) -> Result<()> {
    let graph = load(input, config)?;
    let lens: Vec<usize> = graph.iter().map(|(_, cols)| cols.len()).collect();

    let empty = lens.iter().filter(|&&n| n == 0).count();
    let min = lens.iter().copied().min().unwrap_or(0);
    let max = graph.max_row_len();
    let diagonal = graph.diagonal_len();
    let symmetric = graph.is_symmetric();
    let mean = if lens.is_empty() {
        0.0
    } else {
        graph.nnz() as f64 / lens.len() as f64
    };

    match format {
        OutputFormat::Json => {
            let stats = serde_json::json!({
                "size": graph.size(),
                "nnz": graph.nnz(),
                "empty_rows": empty,
                "min_row_len": min,
                "max_row_len": max,
                "mean_row_len": mean,
                "diagonal_entries": diagonal,
                "symmetric": symmetric,
            });
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table.set_header(vec!["Statistic", "Value"]);
            table.add_row(vec!["Rows".to_string(), graph.size().to_string()]);
            table.add_row(vec!["Non-zeros".to_string(), graph.nnz().to_string()]);
            table.add_row(vec!["Empty rows".to_string(), empty.to_string()]);
            table.add_row(vec!["Min row length".to_string(), min.to_string()]);
            table.add_row(vec!["Max row length".to_string(), max.to_string()]);
            table.add_row(vec!["Mean row length".to_string(), format!("{:.2}", mean)]);
            table.add_row(vec!["Diagonal entries".to_string(), diagonal.to_string()]);
            table.add_row(vec!["Symmetric".to_string(), symmetric.to_string()]);
            println!("{}", table);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_program_name_matches_binary() {
        assert_eq!(Cli::command().get_name(), env!("CARGO_BIN_NAME"));
    }

    #[test]
    fn test_parse_build_command() {
        let cli = Cli::try_parse_from([
            "rowgraph-cli",
            "build",
            "--size",
            "40",
            "--input",
            "mesh.json",
            "--output",
            "graph.srg",
            "--compress",
        ])
        .unwrap();

        match cli.command {
            Commands::Build {
                size,
                compress,
                partitions,
                ..
            } => {
                assert_eq!(size, 40);
                assert!(compress);
                assert_eq!(partitions, 0);
            }
            _ => panic!("expected build command"),
        }
    }
}
