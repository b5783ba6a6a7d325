//! File-presence rules over the discovered file set.
//!
//! These run before any record validation. Two of the rules depend on row
//! content (does `routes.txt` use `network_id`, does `pathways.txt` contain
//! elevators), so the engine asks a [FactExtractor] for exactly the facts it
//! needs instead of flagging those files unconditionally.

use std::collections::HashSet;

use crate::error::Error;
use crate::feed::FeedFileSet;
use crate::results::FileValidationResult;
use crate::schema::MANDATORY_FILES;

/// Supplies the row-content facts the presence rules depend on.
///
/// Each call streams the named file once; it must not validate the rows while
/// doing so (the record validator owns that pass).
pub trait FactExtractor {
    /// Whether any row of `file_name` carries a non-blank value in `column`.
    fn any_populated(&mut self, file_name: &str, column: &str) -> Result<bool, Error>;

    /// The distinct non-blank values of `column` across all rows of
    /// `file_name`.
    fn distinct_values(&mut self, file_name: &str, column: &str)
        -> Result<HashSet<String>, Error>;
}

/// Evaluates every presence rule against the discovered file set.
///
/// Each violated rule yields one synthetic result; a rule whose fact
/// extraction fails degrades to a warning instead of an error.
pub fn evaluate<F: FactExtractor + ?Sized>(
    files: &FeedFileSet,
    facts: &mut F,
) -> Vec<FileValidationResult> {
    let mut results = Vec::new();

    for file in MANDATORY_FILES {
        if !files.contains(file) {
            results.push(FileValidationResult::file_error(
                file,
                format!("Missing required file: {file}"),
            ));
        }
    }

    if !files.contains("stops.txt") && !files.contains("locations.geojson") {
        results.push(FileValidationResult::file_error(
            "stops.txt",
            "Conditionally required file missing: stops.txt is required when locations.geojson \
             is not present"
                .to_owned(),
        ));
    }

    // One result per missing name so both obligations show up in the report
    if !files.contains("calendar.txt") && !files.contains("calendar_dates.txt") {
        for file in ["calendar.txt", "calendar_dates.txt"] {
            results.push(FileValidationResult::file_error(
                file,
                "At least one of calendar.txt or calendar_dates.txt is required".to_owned(),
            ));
        }
    }

    if files.contains("translations.txt") && !files.contains("feed_info.txt") {
        results.push(FileValidationResult::file_error(
            "feed_info.txt",
            "Conditionally required file missing: feed_info.txt is required when \
             translations.txt is present"
                .to_owned(),
        ));
    }

    let network_files: Vec<&str> = ["networks.txt", "route_networks.txt"]
        .into_iter()
        .filter(|file| files.contains(file))
        .collect();
    // Without routes.txt no row can carry network_id, so the prohibition
    // cannot trigger (the missing mandatory file is already reported above)
    if !network_files.is_empty() && files.contains("routes.txt") {
        match facts.any_populated("routes.txt", "network_id") {
            Ok(true) => {
                for file in &network_files {
                    results.push(FileValidationResult::file_error(
                        file,
                        format!(
                            "Conditionally forbidden file: {file} must not be present when \
                             routes.txt uses network_id"
                        ),
                    ));
                }
            }
            Ok(false) => {}
            Err(e) => {
                for file in &network_files {
                    results.push(FileValidationResult::file_warning(
                        file,
                        format!(
                            "Could not inspect routes.txt for network_id usage ({e}): {file} \
                             may be conditionally forbidden"
                        ),
                    ));
                }
            }
        }
    }

    if files.contains("pathways.txt") && !files.contains("levels.txt") {
        match facts.distinct_values("pathways.txt", "pathway_mode") {
            Ok(modes) if modes.contains("5") => {
                results.push(FileValidationResult::file_error(
                    "levels.txt",
                    "Conditionally required file missing: levels.txt is required when \
                     pathways.txt contains pathway_mode=5 (elevators)"
                        .to_owned(),
                ));
            }
            Ok(_) => {}
            Err(e) => {
                results.push(FileValidationResult::file_warning(
                    "levels.txt",
                    format!(
                        "Could not inspect pathways.txt for elevator pathways ({e}): \
                         levels.txt may be required"
                    ),
                ));
            }
        }
    }

    results
}
