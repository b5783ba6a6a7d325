//! Module for the error management
use thiserror::Error;

/// An error that can occur when opening or reading a feed.
///
/// Findings about the feed's *content* are never raised as errors: they are
/// collected into [crate::FileValidationResult]s. This type only covers
/// problems that prevent a file (or the whole feed) from being read at all.
#[derive(Error, Debug)]
pub enum Error {
    /// A file was requested that is not present in the feed
    #[error("Could not find file {0}")]
    MissingFile(String),
    /// The given path to the feed is neither a file nor a directory
    #[error("Could not read feed: {0} is neither a file nor a directory")]
    NotFileNorDirectory(String),
    /// Generic Input/Output error while reading a file
    #[error("impossible to read file")]
    Io(#[from] std::io::Error),
    /// Impossible to read a file
    #[error("impossible to read '{file_name}'")]
    NamedFileIO {
        /// The file name that could not be read
        file_name: String,
        /// The initial error that caused the unability to read the file
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// Impossible to read a CSV file
    #[error("impossible to read csv file '{file_name}'")]
    Csv {
        /// File name that could not be parsed as CSV
        file_name: String,
        /// The initial error by the csv library
        #[source]
        source: csv::Error,
    },
    /// Error when trying to unzip the feed archive
    #[error(transparent)]
    Zip(#[from] zip::result::ZipError),
}
