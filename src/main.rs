// Identity-document batch verification against a ground-truth workbook.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::{error, info};

use veridoc::io::{load_ground_truth, scan_images, write_audit, HttpNotifier, NotificationSink, StagingArea};
use veridoc::matching::{FieldMatcher, HttpSimilarityScorer, SimilarityScorer};
use veridoc::models::Config;
use veridoc::processing::HttpExtractor;
use veridoc::utils::VerifyError;
use veridoc::validation::DecisionEngine;
use veridoc::BatchVerifier;

#[derive(Parser)]
#[command(name = "veridoc", about = "Verify a batch of document images against ground-truth records")]
struct Args {
    /// Directory containing the image batch
    #[arg(long, conflicts_with = "zip")]
    images: Option<PathBuf>,

    /// Zip archive containing the image batch
    #[arg(long)]
    zip: Option<PathBuf>,

    /// Ground-truth workbook (.xlsx/.xls) with an SrNo column
    #[arg(long)]
    ground_truth: PathBuf,

    /// Audit workbook to write
    #[arg(long, default_value = "verification_results.xlsx")]
    output: PathBuf,

    /// Skip the downstream notification call
    #[arg(long)]
    no_notify: bool,
}

fn run(args: &Args) -> Result<(), VerifyError> {
    let config = Config::from_env()?;
    let table = load_ground_truth(&args.ground_truth)?;

    // The staging area must outlive the scan when a zip batch is used.
    let mut staging: Option<StagingArea> = None;
    let image_dir = match (&args.images, &args.zip) {
        (Some(dir), _) => dir.clone(),
        (None, Some(archive)) => {
            let area = StagingArea::new()?;
            area.unpack_zip(archive)?;
            let path = area.path().to_path_buf();
            staging = Some(area);
            path
        }
        (None, None) => {
            return Err(VerifyError::Config(
                "either --images or --zip is required".to_string(),
            ))
        }
    };

    let images = scan_images(&image_dir)?;
    info!("Scanned {} images in {} ", images.len(), image_dir.display());

    let extractor = HttpExtractor::new(&config.extractor_url)?;
    let scorer: Option<Box<dyn SimilarityScorer>> =
        match (&config.similarity_url, &config.similarity_api_key) {
            (Some(url), Some(key)) => Some(Box::new(HttpSimilarityScorer::new(url, key)?)),
            _ => None,
        };
    let matcher = FieldMatcher::new(scorer, config.retry);
    let verifier = BatchVerifier::new(
        Box::new(extractor),
        matcher,
        DecisionEngine::new(config.decision.clone()),
    );

    let outcome = verifier.process(&images, &table)?;

    write_audit(&args.output, &outcome.audit_rows)?;

    if !args.no_notify {
        if let Some(url) = &config.notify_url {
            let notifier = HttpNotifier::new(url)?;
            match notifier.send(&outcome.notification_payload()) {
                Ok(()) => info!("Notification sink accepted {} entries", outcome.audit_rows.len()),
                Err(err) => error!("Notification call failed: {}", err),
            }
        }
    }

    match serde_json::to_string_pretty(&outcome.responses) {
        Ok(json) => println!("{}", json),
        Err(err) => error!("Could not serialize response list: {}", err),
    }

    drop(staging);
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("Processing error: {}", err);
            eprintln!("Error: {}", err);
            ExitCode::FAILURE
        }
    }
}
