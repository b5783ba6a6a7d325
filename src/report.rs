//! Plain-text rendering of a [ValidationRun].

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::results::{FileValidationResult, ValidationRun};

/// Canonical display order of the per-file sections: mandatory files first,
/// then conditionally mandatory, conditionally prohibited, fares, locations,
/// services and metadata. Names not listed here sort alphabetically at the
/// end.
const FILE_ORDER: [&str; 32] = [
    "agency.txt",
    "routes.txt",
    "trips.txt",
    "stop_times.txt",
    "stops.txt",
    "calendar.txt",
    "calendar_dates.txt",
    "levels.txt",
    "feed_info.txt",
    "networks.txt",
    "route_networks.txt",
    "fare_attributes.txt",
    "fare_rules.txt",
    "timeframes.txt",
    "rider_categories.txt",
    "fare_media.txt",
    "fare_products.txt",
    "fare_leg_rules.txt",
    "fare_leg_join_rules.txt",
    "fare_transfer_rules.txt",
    "areas.txt",
    "stop_areas.txt",
    "shapes.txt",
    "location_groups.txt",
    "location_group_stops.txt",
    "locations.geojson",
    "frequencies.txt",
    "transfers.txt",
    "pathways.txt",
    "booking_rules.txt",
    "translations.txt",
    "attributions.txt",
];

/// The run's results in canonical display order. A file name that appears
/// several times (a presence finding plus a record pass) keeps all its
/// results, in production order.
pub fn ordered_results(run: &ValidationRun) -> Vec<&FileValidationResult> {
    let mut ordered = Vec::with_capacity(run.results.len());
    let mut taken = vec![false; run.results.len()];
    for file_name in FILE_ORDER {
        for (i, result) in run.results.iter().enumerate() {
            if !taken[i] && result.file_name == file_name {
                taken[i] = true;
                ordered.push(result);
            }
        }
    }
    let mut leftovers: Vec<&FileValidationResult> = run
        .results
        .iter()
        .enumerate()
        .filter(|(i, _)| !taken[*i])
        .map(|(_, result)| result)
        .collect();
    leftovers.sort_by(|a, b| a.file_name.cmp(&b.file_name));
    ordered.extend(leftovers);
    ordered
}

/// Renders the run as a plain-text report.
pub fn generate_report(run: &ValidationRun, feed_name: &str) -> String {
    let bar = "=".repeat(80);
    let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");

    let total_files = run.results.len();
    let valid_files = run.valid_file_count();
    let invalid_files = total_files - valid_files;
    let total_errors = run.total_errors();
    let total_warnings = run.total_warnings();

    let mut report = String::new();
    report.push_str(&format!("{bar}\nGTFS FEED VALIDATION REPORT\n{bar}\n\n"));
    report.push_str(&format!("Feed: {feed_name}\n"));
    report.push_str(&format!("Validated: {timestamp}\n\n"));

    report.push_str(&format!("EXECUTIVE SUMMARY\n{}\n", "-".repeat(40)));
    report.push_str(&format!("Files analyzed: {total_files}\n"));
    report.push_str(&format!("Valid files: {valid_files}\n"));
    report.push_str(&format!("Invalid files: {invalid_files}\n"));
    report.push_str(&format!("Errors found: {total_errors}\n"));
    report.push_str(&format!("Warnings found: {total_warnings}\n\n"));

    if invalid_files > 0 {
        report.push_str("OVERALL STATUS: INVALID - critical errors were found\n\n");
    } else if total_warnings > 0 {
        report.push_str("OVERALL STATUS: VALID WITH WARNINGS\n\n");
    } else {
        report.push_str("OVERALL STATUS: VALID - every file conforms to the standard\n\n");
    }

    report.push_str(&format!("FILE DETAILS\n{bar}\n\n"));

    for (index, result) in ordered_results(run).iter().enumerate() {
        report.push_str(&format!("{}. FILE: {}\n", index + 1, result.file_name));
        report.push_str(&format!("{}\n", "-".repeat(50)));
        report.push_str(&format!(
            "Status: {}\n",
            if result.is_valid { "VALID" } else { "INVALID" }
        ));
        report.push_str(&format!("Lines processed: {}\n", result.total_lines));
        report.push_str(&format!("Errors: {}\n", result.errors.len()));
        report.push_str(&format!("Warnings: {}\n\n", result.warnings.len()));

        if !result.errors.is_empty() {
            report.push_str("ERRORS:\n");
            for (i, error) in result.errors.iter().enumerate() {
                report.push_str(&format!("  {}. {error}\n", i + 1));
            }
            report.push('\n');
        }

        if !result.warnings.is_empty() {
            report.push_str("WARNINGS:\n");
            for (i, warning) in result.warnings.iter().enumerate() {
                report.push_str(&format!("  {}. {warning}\n", i + 1));
            }
            report.push('\n');
        }

        if result.errors.is_empty() && result.warnings.is_empty() {
            report.push_str("No problems found in this file.\n\n");
        }

        report.push('\n');
    }

    report.push_str(&format!("{bar}\nEND OF REPORT\n{bar}\n"));
    report
}

/// Writes the report next to the working directory (or under `report_dir`) as
/// `<feed-stem>_validation_report.txt` and returns the path written.
pub fn save_report(
    report: &str,
    feed_path: &Path,
    report_dir: Option<&Path>,
) -> io::Result<PathBuf> {
    let stem = feed_path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("gtfs");
    let file_name = format!("{stem}_validation_report.txt");
    let target = match report_dir {
        Some(dir) => dir.join(file_name),
        None => PathBuf::from(file_name),
    };
    fs::write(&target, report)?;
    Ok(target)
}
