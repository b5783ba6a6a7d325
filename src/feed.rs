//! Feed access: enumerating and opening the files of a feed.
//!
//! A feed is either a zip archive or an extracted directory; both expose the
//! same [FeedSource] surface and both serve the presence rules' fact
//! extraction by streaming a single column out of a file.

use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use crate::error::Error;
use crate::file_validator::csv_reader_skip_bom;
use crate::presence::FactExtractor;

/// Immutable snapshot of the file base names discovered in a feed.
#[derive(Debug, Clone)]
pub struct FeedFileSet {
    names: Vec<String>,
}

impl FeedFileSet {
    /// Snapshots `names` in discovery order.
    pub fn new(names: &[String]) -> Self {
        FeedFileSet {
            names: names.to_vec(),
        }
    }

    /// Whether a file with this base name was discovered.
    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// The discovered base names, in discovery order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// How many files were discovered.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether nothing was discovered at all.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// A feed the validator can enumerate and read files from.
pub trait FeedSource {
    /// The base names of every file in the feed, in discovery order.
    fn file_names(&self) -> &[String];

    /// Opens one file by base name for a single forward read.
    fn open(&mut self, base_name: &str) -> Result<Box<dyn Read + '_>, Error>;
}

/// A feed packed as a zip archive. Entries are addressed by base name, so
/// archives that nest their files under a directory still resolve.
pub struct ZipFeed {
    archive: zip::ZipArchive<BufReader<File>>,
    names: Vec<String>,
    entries: HashMap<String, usize>,
}

impl ZipFeed {
    /// Opens the archive at `path` and indexes its entries by base name.
    pub fn open(path: &Path) -> Result<Self, Error> {
        let file = File::open(path)?;
        let mut archive = zip::ZipArchive::new(BufReader::new(file))?;
        let mut names = Vec::new();
        let mut entries = HashMap::new();
        for i in 0..archive.len() {
            let entry = archive.by_index(i)?;
            if entry.is_dir() {
                continue;
            }
            let base_name = Path::new(entry.name())
                .file_name()
                .and_then(|name| name.to_str())
                .map(str::to_owned);
            if let Some(base_name) = base_name {
                if !entries.contains_key(&base_name) {
                    entries.insert(base_name.clone(), i);
                    names.push(base_name);
                }
            }
        }
        Ok(ZipFeed {
            archive,
            names,
            entries,
        })
    }
}

impl FeedSource for ZipFeed {
    fn file_names(&self) -> &[String] {
        &self.names
    }

    fn open(&mut self, base_name: &str) -> Result<Box<dyn Read + '_>, Error> {
        let index = *self
            .entries
            .get(base_name)
            .ok_or_else(|| Error::MissingFile(base_name.to_owned()))?;
        let entry = self.archive.by_index(index)?;
        Ok(Box::new(entry))
    }
}

/// A feed extracted into (or maintained as) a directory. The listing is
/// sorted so discovery order does not depend on the filesystem.
pub struct DirFeed {
    dir: PathBuf,
    names: Vec<String>,
}

impl DirFeed {
    /// Lists the plain files directly under `dir`.
    pub fn open(dir: &Path) -> Result<Self, Error> {
        let mut names: Vec<String> = std::fs::read_dir(dir)?
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_file())
            .filter_map(|entry| entry.file_name().to_str().map(str::to_owned))
            .collect();
        names.sort();
        Ok(DirFeed {
            dir: dir.to_owned(),
            names,
        })
    }
}

impl FeedSource for DirFeed {
    fn file_names(&self) -> &[String] {
        &self.names
    }

    fn open(&mut self, base_name: &str) -> Result<Box<dyn Read + '_>, Error> {
        if !self.names.iter().any(|name| name == base_name) {
            return Err(Error::MissingFile(base_name.to_owned()));
        }
        let file = File::open(self.dir.join(base_name)).map_err(|e| Error::NamedFileIO {
            file_name: base_name.to_owned(),
            source: Box::new(e),
        })?;
        Ok(Box::new(file))
    }
}

/// Opens the feed at `path`: a file is treated as a zip archive, a directory
/// as an extracted feed.
pub fn open_feed<P: AsRef<Path>>(path: P) -> Result<Box<dyn FeedSource>, Error> {
    let p = path.as_ref();
    if p.is_file() {
        Ok(Box::new(ZipFeed::open(p)?))
    } else if p.is_dir() {
        Ok(Box::new(DirFeed::open(p)?))
    } else {
        Err(Error::NotFileNorDirectory(format!("{}", p.display())))
    }
}

/// Every feed source can serve fact extraction by streaming the requested
/// column once through the same BOM-skipping CSV reader validation uses.
impl<S: FeedSource + ?Sized> FactExtractor for S {
    fn any_populated(&mut self, file_name: &str, column: &str) -> Result<bool, Error> {
        let mut any = false;
        scan_column(self, file_name, column, |value| {
            if !value.trim().is_empty() {
                any = true;
            }
        })?;
        Ok(any)
    }

    fn distinct_values(
        &mut self,
        file_name: &str,
        column: &str,
    ) -> Result<HashSet<String>, Error> {
        let mut values = HashSet::new();
        scan_column(self, file_name, column, |value| {
            let value = value.trim();
            if !value.is_empty() {
                values.insert(value.to_owned());
            }
        })?;
        Ok(values)
    }
}

fn scan_column<S: FeedSource + ?Sized>(
    source: &mut S,
    file_name: &str,
    column: &str,
    mut visit: impl FnMut(&str),
) -> Result<(), Error> {
    let reader = source.open(file_name)?;
    let mut csv_reader = csv_reader_skip_bom(reader, true).map_err(|e| Error::NamedFileIO {
        file_name: file_name.to_owned(),
        source: Box::new(e),
    })?;
    let headers = csv_reader
        .headers()
        .map_err(|e| Error::Csv {
            file_name: file_name.to_owned(),
            source: e,
        })?
        .clone();
    let index = match headers.iter().position(|header| header == column) {
        Some(index) => index,
        // Column absent from the header: there are no facts to gather
        None => return Ok(()),
    };
    let mut record = csv::StringRecord::new();
    loop {
        match csv_reader.read_record(&mut record) {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => {
                return Err(Error::Csv {
                    file_name: file_name.to_owned(),
                    source: e,
                })
            }
        }
        if let Some(value) = record.get(index) {
            visit(value);
        }
    }
    Ok(())
}
