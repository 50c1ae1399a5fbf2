//! Record source abstraction for reading raw vital-sign records.
//!
//! A source yields raw text lines; validation happens downstream so that
//! rejected lines can be reported with their line numbers.

mod file;
mod stream;

pub use file::FileSource;
pub use stream::StreamSource;

use std::fmt::Debug;

/// One raw line from a source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// 1-based line number within the source.
    pub line: usize,
    pub text: String,
}

/// Trait for supplying raw records to the pipeline.
///
/// # Example
///
/// ```
/// use std::io::Cursor;
/// use careconnect::{RecordSource, StreamSource};
///
/// let mut source = StreamSource::new(Cursor::new("80,120,98\n"), "memory");
/// let record = source.next_record().unwrap();
/// assert_eq!(record.text, "80,120,98");
/// assert!(source.next_record().is_none());
/// ```
pub trait RecordSource: Debug {
    /// Next non-blank record, or `None` once the input is exhausted.
    fn next_record(&mut self) -> Option<Record>;

    /// Returns a human-readable description of the source.
    fn description(&self) -> &str;

    /// The IO error that ended the input early, if any.
    fn error(&self) -> Option<&str>;
}
