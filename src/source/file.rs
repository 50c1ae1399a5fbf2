//! File-based record source.
//!
//! Reads `heartRate,bloodPressure,spo2` records from a text file, one per line.

use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

use super::{Record, RecordSource, StreamSource};

/// A record source over a text file.
///
/// The file is opened eagerly so a missing input is reported before any
/// structure is filled.
#[derive(Debug)]
pub struct FileSource {
    path: PathBuf,
    inner: StreamSource<BufReader<File>>,
}

impl FileSource {
    /// Open the file at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path)?;
        let description = format!("file: {}", path.display());
        Ok(Self {
            inner: StreamSource::new(BufReader::new(file), &description),
            path,
        })
    }

    /// Returns the path being read.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RecordSource for FileSource {
    fn next_record(&mut self) -> Option<Record> {
        self.inner.next_record()
    }

    fn description(&self) -> &str {
        self.inner.description()
    }

    fn error(&self) -> Option<&str> {
        self.inner.error()
    }
}
