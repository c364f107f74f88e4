use anyhow::Context;
use clap::{Parser, Subcommand};
use std::io::Read;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pathreport_batch::{BatchConfig, DEFAULT_TEXT_COLUMN};
use pathreport_core::config::narrative_cleanup_from_env_value;
use pathreport_core::constants::NARRATIVE_CLEANUP_ENV;
use pathreport_core::{ExtractorConfig, NarrativeCleanup, ReportExtractor};

#[derive(Parser)]
#[command(name = "pathreport")]
#[command(about = "Extract per-specimen records from pathology report text")]
struct Cli {
    /// Narrative cleanup rule: first-line or full-text
    /// (defaults to PATHREPORT_NARRATIVE_CLEANUP, then first-line)
    #[arg(long, global = true)]
    cleanup: Option<NarrativeCleanup>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract one report and print it as JSON
    Extract {
        /// Report text file (reads stdin when omitted)
        file: Option<PathBuf>,
    },
    /// Expand a CSV of reports into one row per specimen
    Batch {
        /// Input CSV with a header row
        #[arg(long)]
        input: PathBuf,
        /// Output CSV path
        #[arg(long)]
        output: PathBuf,
        /// Column holding the report text
        #[arg(long, default_value = DEFAULT_TEXT_COLUMN)]
        text_column: String,
        /// Worker threads (defaults to one per core)
        #[arg(long)]
        threads: Option<usize>,
    },
}

/// Entry point for the pathology report extractor.
///
/// # Environment Variables
/// - `PATHREPORT_NARRATIVE_CLEANUP`: default narrative cleanup rule when `--cleanup` is absent
/// - `RUST_LOG`: log filter (default directive: `pathreport=info`)
fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("pathreport=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let cleanup = match cli.cleanup {
        Some(cleanup) => cleanup,
        None => narrative_cleanup_from_env_value(std::env::var(NARRATIVE_CLEANUP_ENV).ok())?,
    };
    let extractor = ReportExtractor::new(ExtractorConfig::new(cleanup));

    match cli.command {
        Commands::Extract { file } => {
            let text = match file {
                Some(path) => std::fs::read_to_string(&path)
                    .with_context(|| format!("failed to read {}", path.display()))?,
                None => {
                    let mut buf = String::new();
                    std::io::stdin()
                        .read_to_string(&mut buf)
                        .context("failed to read report from stdin")?;
                    buf
                }
            };
            let report = extractor.extract(&text);
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::Batch {
            input,
            output,
            text_column,
            threads,
        } => {
            let cfg = BatchConfig::new(text_column, threads);
            let summary = pathreport_batch::run(&input, &output, &cfg, &extractor)?;
            tracing::info!(
                "++ Wrote {} rows from {} reports to {}",
                summary.rows_written,
                summary.reports,
                output.display()
            );
        }
    }

    Ok(())
}
