/*!
 * Per-file content extraction
 *
 * Every exported file goes through [`extract`]: a full line count first,
 * then one of three strategies picked by [`Strategy::for_path`]. Reading
 * problems end up as inline markers in the dump; only failures writing
 * to `out` are returned as errors.
 */

mod notebook;
mod raw;
mod signatures;

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;

use log::{debug, warn};

use crate::config::ContentMode;
use crate::types::{FileOutcome, FileRecord};

pub use notebook::{NotebookDump, OUTPUT_LINE_BUDGET};
pub use raw::RawDump;
pub use signatures::{keywords_for, SignatureDump};

/// Files with more lines than this are never read for content
pub const MAX_CONTENT_LINES: usize = 10_000;

/// Renders one file's content into the dump
pub trait ContentExtractor {
    /// Write the file header and content read from `reader`.
    ///
    /// Read failures are reported inline and returned as the outcome.
    /// An `Err` means writing to `out` failed.
    fn render(
        &self,
        path: &Path,
        line_count: usize,
        reader: &mut dyn BufRead,
        out: &mut dyn Write,
    ) -> io::Result<FileOutcome>;
}

/// Extraction strategy for one file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Raw(RawDump),
    Notebook(NotebookDump),
    Signatures(SignatureDump),
}

impl Strategy {
    /// `.ipynb` always uses the notebook strategy, otherwise the mode decides
    pub fn for_path(path: &Path, mode: ContentMode) -> Self {
        if path.extension().is_some_and(|ext| ext == "ipynb") {
            return Self::Notebook(NotebookDump);
        }
        match mode {
            ContentMode::Raw => Self::Raw(RawDump),
            ContentMode::AstLite => Self::Signatures(SignatureDump),
        }
    }
}

impl ContentExtractor for Strategy {
    fn render(
        &self,
        path: &Path,
        line_count: usize,
        reader: &mut dyn BufRead,
        out: &mut dyn Write,
    ) -> io::Result<FileOutcome> {
        match self {
            Self::Raw(s) => s.render(path, line_count, reader, out),
            Self::Notebook(s) => s.render(path, line_count, reader, out),
            Self::Signatures(s) => s.render(path, line_count, reader, out),
        }
    }
}

/// Count newline-delimited lines with a full sequential scan.
///
/// A final line without a terminator still counts.
pub fn count_lines(path: &Path) -> io::Result<usize> {
    let mut reader = BufReader::new(File::open(path)?);
    let mut count = 0;
    let mut last = None;

    loop {
        let buf = reader.fill_buf()?;
        if buf.is_empty() {
            break;
        }
        count += buf.iter().filter(|&&b| b == b'\n').count();
        last = buf.last().copied();
        let len = buf.len();
        reader.consume(len);
    }

    if matches!(last, Some(b) if b != b'\n') {
        count += 1;
    }
    Ok(count)
}

/// Drop a trailing `\n` or `\r\n`
pub(crate) fn strip_terminator(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

/// Size-gated dispatch for one file
pub fn extract(path: &Path, mode: ContentMode, out: &mut dyn Write) -> io::Result<FileRecord> {
    let record = |line_count, outcome| FileRecord {
        path: path.to_path_buf(),
        line_count,
        outcome,
    };

    let line_count = match count_lines(path) {
        Ok(n) => n,
        Err(e) => {
            warn!("Cannot read {}: {}", path.display(), e);
            write!(out, "\n// File: {} (could not be opened)\n", path.display())?;
            return Ok(record(0, FileOutcome::Unreadable(e.to_string())));
        }
    };

    if line_count > MAX_CONTENT_LINES {
        debug!("Skipping {} ({} lines)", path.display(), line_count);
        write!(
            out,
            "\n// File: {} (skipped - too large: {} lines)\n",
            path.display(),
            line_count
        )?;
        return Ok(record(line_count, FileOutcome::SkippedTooLarge(line_count)));
    }

    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) => {
            warn!("Cannot open {}: {}", path.display(), e);
            write!(out, "\n// File: {} (could not be opened)\n", path.display())?;
            return Ok(record(line_count, FileOutcome::Unreadable(e.to_string())));
        }
    };

    let mut reader = BufReader::new(file);
    let outcome = Strategy::for_path(path, mode).render(path, line_count, &mut reader, out)?;
    Ok(record(line_count, outcome))
}
