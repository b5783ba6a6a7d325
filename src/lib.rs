/*! Validates [General Transit Feed Specification](https://gtfs.org/) (GTFS) static feeds.

A GTFS feed is a collection of CSV files (often bundled as a zip file). This
crate checks a feed against the GTFS reference instead of deserializing it:
which files must be present, which columns each file must carry, what every
field may contain, and the record-level rules that cut across fields. The
outcome is a [ValidationRun] holding one [FileValidationResult] per file,
each with line-addressed errors and warnings.

To get started, see [FeedValidator].

## Design decisions

### Findings are data, not errors

A broken feed is the expected input of a validator, so nothing about feed
*content* is ever raised as [Error]. Per-file and per-row findings are
collected into results; only a feed that cannot be opened at all fails the
run.

### Two phases

Presence rules run first, over the discovered file set alone. Two of them
depend on row content and gather their facts through a dedicated streaming
pass ([FactExtractor]) before any verdict; record validation of each file
still happens exactly once, afterwards.

### Compiled-in schemas

The file schemas and enum domains are static tables built once at startup.
There is no schema configuration file and no way to mutate the tables after
that.
*/
#![warn(missing_docs)]

#[macro_use]
extern crate derivative;

pub mod error;
mod feed;
mod field_types;
mod file_validator;
mod presence;
mod report;
mod results;
mod rules;
mod schema;
mod validator;

#[cfg(test)]
mod tests;

pub use error::Error;
pub use feed::{open_feed, DirFeed, FeedFileSet, FeedSource, ZipFeed};
pub use field_types::FieldType;
pub use file_validator::validate_records;
pub use presence::{evaluate as evaluate_presence_rules, FactExtractor};
pub use report::{generate_report, ordered_results, save_report};
pub use results::{FileValidationResult, ValidationRun};
pub use schema::{enum_domain, schema_for, FileSchema, CONDITIONALLY_MANDATORY_FILES, MANDATORY_FILES};
pub use validator::FeedValidator;
