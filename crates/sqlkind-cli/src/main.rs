//! sqlkind CLI
//!
//! Command-line tool for grouping logged queries by shape.

use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use sqlkind_core::{canonical_text, fingerprint, SegmentMask};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use sqlkind_cli::{aggregate_file, aggregate_reader, write_report, Description, OutputFormat};

/// Group SQL queries by their query-shape fingerprint.
#[derive(Parser)]
#[command(name = "sqlkind")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Clauses that make up a fingerprint, e.g. `from,where,skip-values`.
    #[arg(short, long, env = "SQLKIND_SEGMENTS", default_value = "all,skip-values")]
    segments: SegmentMask,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Group a query log, one query per line.
    Aggregate {
        /// Log file; standard input if absent or `-`.
        file: Option<PathBuf>,

        /// Output format.
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Fail on the first query that does not parse.
        #[arg(long)]
        strict: bool,
    },

    /// Show how a query parses.
    Parse {
        /// The query text.
        query: String,
    },

    /// Print the fingerprint of a query.
    Hash {
        /// The query text.
        query: String,

        /// Also print the text that is hashed.
        #[arg(long)]
        explain: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    match cli.command {
        Commands::Aggregate {
            file,
            format,
            strict,
        } => {
            let report = match file {
                Some(path) if path.as_os_str() != "-" => {
                    info!("Reading queries from {}", path.display());
                    aggregate_file(&path, cli.segments, strict)?
                }
                _ => aggregate_reader(io::stdin().lock(), cli.segments, strict)?,
            };
            if report.skipped > 0 {
                info!("Skipped {} of {} queries.", report.skipped, report.total);
            }
            write_report(&mut out, &report, format)?;
        }

        Commands::Parse { query } => {
            let description = Description::of(&query);
            write!(out, "{description}")?;
            out.flush()?;
            if !description.is_clean() {
                anyhow::bail!("{} parse errors", description.errors.len().max(1));
            }
        }

        Commands::Hash { query, explain } => {
            if explain {
                writeln!(out, "{}", canonical_text(&query, cli.segments)?)?;
            }
            writeln!(out, "{}", fingerprint(&query, cli.segments)?)?;
        }
    }

    out.flush()?;
    Ok(())
}
