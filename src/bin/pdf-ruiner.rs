//! PDF Ruiner CLI tool
//!
//! Turns fills into strokes across a batch of PDFs and optionally checks the
//! visual damage.

use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use pdf_ruiner::color::StrokeColor;
use pdf_ruiner::files::collect_pdf_inputs;
use pdf_ruiner::optical::{
    bind_pdfium, optical_compare, CompareOptions, DEFAULT_MIN_AVERAGE_DIFFERENCE,
};
use pdf_ruiner::pdf::ensure_same_page_count;
use pdf_ruiner::ruin::{ruin_batch, RuinOptions};
use pdf_ruiner::summary::SummaryWriter;

/// PDF Ruiner - ruins your PDF files in a terrible way
#[derive(Parser)]
#[command(name = "pdf-ruiner")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    # Ruin every PDF in a directory
    pdf-ruiner ruin handouts/

    # Red strokes, and check which pages changed visibly
    pdf-ruiner ruin report.pdf -c FF0000 --compare

    # Compare two PDFs directly
    pdf-ruiner compare report.pdf ruined/report.pdf")]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert fills to strokes in a PDF file, a directory or a glob of PDFs
    Ruin {
        /// Input PDF file, directory (searched recursively) or glob pattern
        input: String,

        /// Output directory
        #[arg(short, long, default_value = "ruined")]
        out: PathBuf,

        /// Stroke color as 6 hex digits, e.g. FF0000 or #FF0000
        #[arg(short, long, value_parser = parse_color)]
        color: Option<StrokeColor>,

        /// Render original and output and report pages that differ
        #[arg(long)]
        compare: bool,

        /// Minimum average difference (0.0-1.0) for a page to be reported
        #[arg(long, default_value_t = DEFAULT_MIN_AVERAGE_DIFFERENCE)]
        min_difference: f64,

        /// Only compare pages where fills were converted
        #[arg(long)]
        changed_only: bool,

        /// Summary CSV file path
        #[arg(long, default_value = "summary.csv")]
        summary: PathBuf,
    },

    /// Report the pages where AFTER is visibly different from BEFORE
    Compare {
        /// Reference PDF
        before: PathBuf,

        /// PDF to check; diff images are written next to it
        after: PathBuf,

        /// Minimum average difference (0.0-1.0) for a page to be reported
        #[arg(long, default_value_t = DEFAULT_MIN_AVERAGE_DIFFERENCE)]
        min_difference: f64,
    },
}

fn parse_color(s: &str) -> Result<StrokeColor, String> {
    s.parse::<StrokeColor>().map_err(|e| e.to_string())
}

fn main() {
    let cli = Cli::parse();

    let default_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let result = match cli.command {
        Commands::Ruin {
            input, out, color, compare, min_difference, changed_only, summary,
        } => {
            cmd_ruin(input, out, color, compare, min_difference, changed_only, summary)
        }
        Commands::Compare { before, after, min_difference } => {
            cmd_compare(before, after, min_difference)
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

/// Ruin a batch of PDFs and write the summary
fn cmd_ruin(
    input: String,
    out: PathBuf,
    color: Option<StrokeColor>,
    compare: bool,
    min_difference: f64,
    changed_only: bool,
    summary_path: PathBuf,
) -> Result<()> {
    let inputs = collect_pdf_inputs(&input)
        .with_context(|| format!("Failed to collect input files from {}", input))?;

    let pdfium = if compare {
        Some(bind_pdfium().context("Failed to bind pdfium library")?)
    } else {
        None
    };

    let options = RuinOptions {
        color,
        compare: compare.then(|| CompareOptions {
            min_average_difference: min_difference,
            ..Default::default()
        }),
        changed_pages_only: changed_only,
    };

    let mut summary = SummaryWriter::create(&summary_path)
        .with_context(|| format!("Failed to create {}", summary_path.display()))?;

    let failures = ruin_batch(&inputs, &out, &options, pdfium.as_ref(), &mut summary)?;

    log::info!("Summary written to {}", summary_path.display());
    if failures > 0 {
        log::warn!("{} of {} files failed", failures, inputs.len());
    }
    eprintln!("Done.");

    Ok(())
}

/// Compare two PDFs and print the differing pages
fn cmd_compare(before: PathBuf, after: PathBuf, min_difference: f64) -> Result<()> {
    let page_count = ensure_same_page_count(&before, &after)?;
    log::debug!("Comparing {} pages", page_count);

    let pdfium = bind_pdfium().context("Failed to bind pdfium library")?;

    let options = CompareOptions {
        min_average_difference: min_difference,
        ..Default::default()
    };
    let comparison = optical_compare(&pdfium, &before, &after, &options)
        .with_context(|| format!("Failed to compare {} and {}", before.display(), after.display()))?;

    if comparison.has_differences() {
        println!("Pages differing: {}", comparison.pages_label());
        println!("Maximum difference: {:.2}%", comparison.max_difference * 100.0);
    } else {
        println!("No differences found");
    }

    Ok(())
}
