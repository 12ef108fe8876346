use anyhow::{Context, Result};
use apas_ingest::{
    export_csv, load_edits, load_record, save_record, write_csv, AcademicRecord, IngestConfig,
    ManualEdits, ProfileReconciler,
};
use clap::{Parser, Subcommand};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Parse APAS transcript text and merge it into a profile's course record
#[derive(Parser, Debug)]
#[command(name = "apas", version = apas_ingest::VERSION)]
struct Cli {
    /// Ingest config JSON (season names, transfer grade prefixes)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse transcript text and print the extracted record as JSON
    Parse {
        /// Plain-text transcript (already extracted from the PDF)
        transcript: PathBuf,
    },

    /// Merge transcript text into an existing profile record
    Merge {
        transcript: PathBuf,

        /// Existing profile JSON; starts empty when omitted
        #[arg(short, long)]
        profile: Option<PathBuf>,

        /// Manual edits JSON submitted alongside the upload
        #[arg(short, long)]
        edits: Option<PathBuf>,

        /// Write merged record here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Flatten a profile record to CSV
    Export {
        profile: PathBuf,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    // Logs go to stderr; stdout carries JSON/CSV
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "apas_ingest=info,apas=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => IngestConfig::from_file(path)?,
        None => IngestConfig::default(),
    };
    let reconciler = ProfileReconciler::with_config(config);

    match cli.command {
        Command::Parse { transcript } => run_parse(&reconciler, &transcript),
        Command::Merge {
            transcript,
            profile,
            edits,
            output,
        } => run_merge(
            &reconciler,
            &transcript,
            profile.as_deref(),
            edits.as_deref(),
            output.as_deref(),
        ),
        Command::Export { profile, output } => run_export(&profile, output.as_deref()),
    }
}

fn read_transcript(path: &Path) -> Result<String> {
    fs::read_to_string(path)
        .with_context(|| format!("Failed to read transcript: {}", path.display()))
}

fn print_json(record: &AcademicRecord) -> Result<()> {
    let json = serde_json::to_string_pretty(record).context("Failed to serialize record")?;
    println!("{}", json);
    Ok(())
}

fn run_parse(reconciler: &ProfileReconciler, transcript: &Path) -> Result<()> {
    let text = read_transcript(transcript)?;
    let record = reconciler.parse_transcript(&text);

    info!(
        terms = record.terms.len(),
        transfers = record.transfers.len(),
        "parsed {}",
        transcript.display()
    );
    print_json(&record)
}

fn run_merge(
    reconciler: &ProfileReconciler,
    transcript: &Path,
    profile: Option<&Path>,
    edits: Option<&Path>,
    output: Option<&Path>,
) -> Result<()> {
    let text = read_transcript(transcript)?;

    let existing = match profile {
        Some(path) => load_record(path)?,
        None => AcademicRecord::new(),
    };
    let edits = match edits {
        Some(path) => load_edits(path)?,
        None => ManualEdits::new(),
    };

    let outcome = reconciler.ingest(&text, &existing, &edits);
    info!("{}", outcome.report.summary());

    match output {
        Some(path) => {
            save_record(path, &outcome.record)?;
            info!("merged record written to {}", path.display());
            Ok(())
        }
        None => print_json(&outcome.record),
    }
}

fn run_export(profile: &Path, output: Option<&Path>) -> Result<()> {
    let record = load_record(profile)?;

    let rows = match output {
        Some(path) => export_csv(path, &record)?,
        None => write_csv(io::stdout().lock(), &record)?,
    };

    info!(rows, "exported course rows");
    Ok(())
}
