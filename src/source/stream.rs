//! Reader-backed record source.

use std::fmt;
use std::io::BufRead;

use tracing::warn;

use super::{Record, RecordSource};

/// A source that reads one record per line from any buffered reader
/// (stdin, an open file, an in-memory cursor).
pub struct StreamSource<R> {
    reader: R,
    description: String,
    line: usize,
    last_error: Option<String>,
    exhausted: bool,
}

impl<R: BufRead> StreamSource<R> {
    /// Wrap a reader. `source_description` is shown in reports (e.g. "stdin").
    pub fn new(reader: R, source_description: &str) -> Self {
        Self {
            reader,
            description: source_description.to_string(),
            line: 0,
            last_error: None,
            exhausted: false,
        }
    }
}

impl<R: BufRead> RecordSource for StreamSource<R> {
    fn next_record(&mut self) -> Option<Record> {
        let mut buf = Vec::new();
        while !self.exhausted {
            buf.clear();
            match self.reader.read_until(b'\n', &mut buf) {
                Ok(0) => self.exhausted = true,
                Ok(_) => {
                    self.line += 1;
                    // Invalid UTF-8 becomes U+FFFD and is rejected by the parser
                    let text = String::from_utf8_lossy(&buf);
                    let text = text.trim();
                    if !text.is_empty() {
                        return Some(Record {
                            line: self.line,
                            text: text.to_string(),
                        });
                    }
                }
                Err(e) => {
                    warn!(source = %self.description, line = self.line + 1, "read error: {}", e);
                    self.last_error = Some(format!("Read error: {}", e));
                    self.exhausted = true;
                }
            }
        }
        None
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}

impl<R> fmt::Debug for StreamSource<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamSource")
            .field("description", &self.description)
            .field("line", &self.line)
            .finish()
    }
}
