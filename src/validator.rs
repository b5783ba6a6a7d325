//! Drives a whole-feed validation run.

use log::{debug, info};

use crate::feed::{FeedFileSet, FeedSource};
use crate::file_validator;
use crate::presence;
use crate::results::{FileValidationResult, ValidationRun};
use crate::schema;

/// Parameterizes how a feed is validated.
///
/// ```no_run
/// let mut feed = feedcheck::open_feed("fixtures/gtfs.zip")?;
/// let run = feedcheck::FeedValidator::default().validate(&mut *feed);
/// assert!(run.is_valid());
/// # Ok::<(), feedcheck::Error>(())
/// ```
#[derive(Derivative)]
#[derivative(Default)]
pub struct FeedValidator {
    /// Trim whitespace around each CSV field before any check
    ///
    /// It is quite time consumming
    /// If performance is an issue, and if your data is high quality, you can switch it off
    #[derivative(Default(value = "true"))]
    pub trim_fields: bool,
}

impl FeedValidator {
    /// Should the fields be trimmed (default: true)
    ///
    /// Returns Self and can be chained
    pub fn trim_fields(mut self, trim_fields: bool) -> Self {
        self.trim_fields = trim_fields;
        self
    }

    /// Validates every file of the feed.
    ///
    /// Presence rules run first (with their fact-extraction sub-passes), then
    /// each schema-known file gets one record validation pass, then every
    /// discovered file that is neither schema-known nor `.txt`/`.geojson`
    /// suffixed gets an advisory result. Results keep production order; any
    /// display ordering is the report's concern.
    pub fn validate(&self, source: &mut dyn FeedSource) -> ValidationRun {
        let files = FeedFileSet::new(source.file_names());
        info!("validating feed with {} files", files.len());

        let mut results = presence::evaluate(&files, source);

        for file_name in files.iter() {
            if schema::schema_for(file_name).is_some() {
                debug!("validating records of {file_name}");
                let result = match source.open(file_name) {
                    Ok(reader) => {
                        file_validator::validate_records(reader, file_name, self.trim_fields)
                    }
                    Err(e) => FileValidationResult::file_error(
                        file_name,
                        format!("Error reading file: {e}"),
                    ),
                };
                results.push(result);
            } else if !file_name.ends_with(".txt") && !file_name.ends_with(".geojson") {
                results.push(FileValidationResult::file_warning(
                    file_name,
                    "File is not recognized by the GTFS standard".to_owned(),
                ));
            }
        }

        let run = ValidationRun { results };
        info!(
            "validation finished: {} errors, {} warnings",
            run.total_errors(),
            run.total_warnings()
        );
        run
    }
}
