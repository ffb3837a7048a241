mod collect;
mod offline;
mod usernames;

use std::collections::HashSet;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use chrono::Utc;
use clap::{ArgAction, Parser};
use igfc_core::load_settings;
use igfc_export::{write_csv, write_json, Exporter, OutputFormat};
use tracing_subscriber::EnvFilter;

/// Base name for timestamped `--format` exports.
const EXPORT_BASENAME: &str = "profiles";

const EXIT_SUCCESS: u8 = 0;
const EXIT_NO_RESULTS: u8 = 1;
const EXIT_NO_USERNAMES: u8 = 2;

#[derive(Debug, Parser)]
#[command(name = "igfc")]
#[command(about = "Collect public profile metrics and export them")]
struct Cli {
    /// Text file with one username per line.
    #[arg(short, long, default_value = "data/usernames.txt")]
    input: PathBuf,

    /// Where to write JSON results (also the cache read by --no-network).
    #[arg(short = 'o', long, default_value = "data/output.json")]
    out_json: PathBuf,

    #[arg(short = 'c', long, default_value = "data/output.csv")]
    out_csv: PathBuf,

    /// JSON or YAML request settings.
    #[arg(long, env = "IGFC_SETTINGS", default_value = "config/settings.json")]
    config: PathBuf,

    /// Extra export format written to --out-dir (json, csv, excel, xml, html).
    #[arg(short = 'f', long = "format", value_parser = parse_format)]
    formats: Vec<OutputFormat>,

    #[arg(long, default_value = "data/exports")]
    out_dir: PathBuf,

    /// Skip the network: reuse --out-json if present, otherwise emit mock records.
    #[arg(long)]
    no_network: bool,

    /// Increase verbosity (-v, -vv).
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn parse_format(value: &str) -> Result<OutputFormat, String> {
    value.parse().map_err(|e: igfc_export::ExportError| e.to_string())
}

fn default_log_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_log_level(cli.verbose)));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    match run(cli).await {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!(error = %format!("{e:#}"), "run failed");
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Runs one collection and returns the process exit status.
async fn run(cli: Cli) -> anyhow::Result<u8> {
    let settings = load_settings(Some(&cli.config))
        .with_context(|| format!("failed to load settings from {}", cli.config.display()))?;

    let raw = usernames::read_usernames(&cli.input)?;
    let handles = usernames::normalize_all(&raw);
    if handles.is_empty() {
        tracing::error!(path = %cli.input.display(), "no usernames provided");
        println!("No usernames to process.");
        return Ok(EXIT_NO_USERNAMES);
    }

    let fetched_at = Utc::now();
    let records = if cli.no_network {
        offline::collect_offline(&cli.out_json, &handles, fetched_at)
    } else {
        collect::collect_live(&settings.request, &handles, fetched_at).await?
    };

    if records.is_empty() {
        tracing::error!(requested = handles.len(), "no results were produced");
        println!("No profiles collected from {} username(s).", handles.len());
        return Ok(EXIT_NO_RESULTS);
    }

    write_json(&records, &cli.out_json)
        .with_context(|| format!("failed to write {}", cli.out_json.display()))?;
    write_csv(&records, &cli.out_csv)
        .with_context(|| format!("failed to write {}", cli.out_csv.display()))?;

    let mut extra = Vec::new();
    if !cli.formats.is_empty() {
        let exporter = Exporter::new(&cli.out_dir, EXPORT_BASENAME);
        let mut seen = HashSet::new();
        for format in cli.formats.iter().copied().filter(|f| seen.insert(*f)) {
            let path = exporter
                .export_at(&records, format, fetched_at)
                .with_context(|| format!("failed to export {format}"))?;
            extra.push(path);
        }
    }

    println!(
        "Wrote {} record(s)\nJSON: {}\nCSV:  {}",
        records.len(),
        cli.out_json.display(),
        cli.out_csv.display()
    );
    for path in &extra {
        println!("File: {}", path.display());
    }
    Ok(EXIT_SUCCESS)
}
