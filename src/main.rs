use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use log::info;

use feedcheck::{generate_report, open_feed, save_report, FeedValidator};

/// Validates a GTFS static feed against the GTFS specification.
#[derive(Parser)]
#[command(name = "feedcheck", version, about)]
struct Args {
    /// Path to the feed: a zip archive or an extracted directory
    feed: PathBuf,

    /// Directory the report is written to (defaults to the working directory)
    #[arg(long)]
    report_dir: Option<PathBuf>,

    /// Print the validation run as JSON on stdout instead of saving a text report
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<ExitCode> {
    env_logger::init();
    let args = Args::parse();

    info!("opening feed {}", args.feed.display());
    let mut feed = open_feed(&args.feed)
        .with_context(|| format!("could not open feed {}", args.feed.display()))?;

    let run = FeedValidator::default().validate(&mut *feed);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&run)?);
    } else {
        let feed_name = args
            .feed
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("feed");
        let report = generate_report(&run, feed_name);
        let report_path = save_report(&report, &args.feed, args.report_dir.as_deref())
            .context("could not save the validation report")?;

        println!("Files analyzed: {}", run.results.len());
        println!("Errors found: {}", run.total_errors());
        println!("Warnings found: {}", run.total_warnings());
        println!("Report saved to {}", report_path.display());
        if run.is_valid() {
            println!("The feed conforms to the GTFS standard.");
        } else {
            println!("The feed contains errors that must be corrected.");
        }
    }

    Ok(if run.is_valid() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
