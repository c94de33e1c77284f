mod commands;
mod output;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "pdftab",
    version,
    about = "Extract tables and bank-statement transactions from PDFs into CSV"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert every table in each PDF to CSV with positional Column_N headers
    Tables {
        #[command(flatten)]
        batch: BatchArgs,
    },
    /// Convert bank statements to Date,Details,Credits,Debits,Balance CSVs
    Statements {
        #[command(flatten)]
        batch: BatchArgs,
    },
    /// Extract and normalize a single PDF, printing the result
    Inspect {
        /// Path to PDF file
        input_file: PathBuf,

        /// Normalizer: statements (default) or tables
        #[arg(short, long, default_value = "statements", value_parser = ["statements", "tables"])]
        mode: String,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        format: String,

        #[command(flatten)]
        extraction: ExtractionArgs,
    },
}

#[derive(Args)]
struct BatchArgs {
    /// Directory scanned (non-recursively) for *.pdf files
    #[arg(short, long, default_value = "./pdfs")]
    input: PathBuf,

    /// Directory CSV files are written to (created if absent)
    #[arg(short, long, default_value = "./csv")]
    output: PathBuf,

    /// Write a JSON summary of per-file outcomes
    #[arg(long, value_name = "FILE")]
    report: Option<PathBuf>,

    #[command(flatten)]
    extraction: ExtractionArgs,
}

#[derive(Args)]
struct ExtractionArgs {
    /// Extraction backend: camelot or pdftotext (default: camelot if installed)
    #[arg(short, long, value_parser = ["camelot", "pdftotext"])]
    backend: Option<String>,

    /// Pages to read: "all" or a comma-separated list such as "1,3"
    #[arg(short, long, default_value = "all")]
    pages: String,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Tables { batch } => commands::convert::run(
            batch.input,
            batch.output,
            batch.report,
            batch.extraction.backend.as_deref(),
            &batch.extraction.pages,
            pdftab_core::NormalizerKind::Generic,
        ),
        Commands::Statements { batch } => commands::convert::run(
            batch.input,
            batch.output,
            batch.report,
            batch.extraction.backend.as_deref(),
            &batch.extraction.pages,
            pdftab_core::NormalizerKind::Statement,
        ),
        Commands::Inspect {
            input_file,
            mode,
            format,
            extraction,
        } => commands::inspect::run(
            input_file,
            &mode,
            &format,
            extraction.backend.as_deref(),
            &extraction.pages,
        ),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
