// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Flatscan — photograph in, flat page out.
//
// Entry point. Initialises logging, loads configuration, decodes the input,
// scans it and stores the original and processed images side by side. With
// `--show` it prints a previously stored scan instead.

mod services;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use flatscan_core::notice::{Notice, notice_for_error, notice_for_outcome};
use flatscan_core::{AppConfig, AspectPolicy, FlatscanError, Result, ScanOutcome};
use flatscan_document::{ImageDecoder, RasterDecoder, Scanner};
use uuid::Uuid;

use services::data_dir;
use services::store::{DirectoryStore, ScanStore, StoredScan};

/// Find the document in a photo, flatten it, and store the result.
#[derive(Parser)]
#[command(version)]
struct Args {
    /// Image to scan (PNG, JPEG, TIFF, BMP, WebP).
    #[arg(required_unless_present = "show", conflicts_with = "show")]
    input: Option<PathBuf>,

    /// Print the stored record for a previous scan instead of scanning.
    #[arg(long, value_name = "ID")]
    show: Option<Uuid>,

    /// JSON configuration file. Missing fields take their defaults.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Where scans are stored. Overrides the configuration file.
    #[arg(short, long, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Give the output a fixed 1:√2 page ratio instead of measuring the
    /// document's edges.
    #[arg(long)]
    page_ratio: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    tracing::info!(input = ?args.input, show = ?args.show, "Flatscan starting");

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "scan failed");
            print_notice(&notice_for_error(&err));
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => AppConfig::default(),
    };
    if args.page_ratio {
        config.scan.aspect_policy = AspectPolicy::PageRatio;
    }

    let root = data_dir::data_dir(args.data_dir.as_deref().or(config.data_dir.as_deref()))?;
    let store = DirectoryStore::open(&root)?;

    let stored = match (args.show, &args.input) {
        (Some(id), _) => store.load(id)?,
        (None, Some(input)) => {
            let scanner = Scanner::new(config.scan)?;
            let (stored, outcome) = scan_file(&scanner, &store, input)?;
            if let Some(notice) = notice_for_outcome(outcome) {
                print_notice(&notice);
            }
            stored
        }
        (None, None) => return Err(FlatscanError::Config("no input image given".into())),
    };

    println!("{}", serde_json::to_string_pretty(&stored)?);
    Ok(())
}

fn scan_file(
    scanner: &Scanner,
    store: &impl ScanStore,
    input: &Path,
) -> Result<(StoredScan, ScanOutcome)> {
    let original = ImageDecoder::new().decode_file(input)?;
    let result = scanner.scan(&original);

    let filename = input
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let stored = store.save(&original, &result, &filename)?;
    Ok((stored, result.outcome()))
}

fn load_config(path: &Path) -> Result<AppConfig> {
    let text = std::fs::read_to_string(path)?;
    AppConfig::from_json(&text)
}

fn print_notice(notice: &Notice) {
    eprintln!("{}", notice.message);
    eprintln!("  {}", notice.suggestion);
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use image::{GrayImage, Luma};

    #[test]
    fn cli_definition_is_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn input_or_show_is_required() {
        assert!(Args::try_parse_from(["flatscan"]).is_err());
        assert!(Args::try_parse_from(["flatscan", "page.png"]).is_ok());

        let id = Uuid::new_v4().to_string();
        let args = Args::try_parse_from(["flatscan", "--show", id.as_str()]).expect("valid");
        assert_eq!(args.show.map(|u| u.to_string()), Some(id.clone()));
        assert!(Args::try_parse_from(["flatscan", "page.png", "--show", id.as_str()]).is_err());
        assert!(Args::try_parse_from(["flatscan", "--show", "not-a-uuid"]).is_err());
    }

    #[test]
    fn scanned_file_can_be_shown_again() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let input = tmp.path().join("blank.png");
        GrayImage::from_pixel(64, 48, Luma([200u8]))
            .save(&input)
            .expect("fixture written");

        let data = tmp.path().join("data");
        let store = DirectoryStore::open(&data).expect("store");
        let (stored, outcome) =
            scan_file(&Scanner::default(), &store, &input).expect("scanned");
        assert_eq!(outcome, ScanOutcome::Passthrough);
        assert_eq!(stored.filename, "blank.png");

        let args = Args::try_parse_from([
            "flatscan".to_owned(),
            "--show".to_owned(),
            stored.id.to_string(),
            "--data-dir".to_owned(),
            data.display().to_string(),
        ])
        .expect("valid");
        run(&args).expect("stored scan shown");
        assert_eq!(store.load(stored.id).expect("loaded"), stored);
    }
}
