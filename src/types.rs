/*!
 * Core types and data structures for srcdump
 */

use std::fmt;
use std::path::PathBuf;

use serde::Deserialize;

/// Kind of a filesystem entry shown in the tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// Regular file, symlink or anything that is not descended into
    File,
    /// Directory that the renderer may recurse into
    Directory,
}

/// A node listed while rendering the tree. Never persisted.
#[derive(Debug, Clone)]
pub struct DirectoryEntry {
    /// Bare entry name
    pub name: String,
    /// Absolute or root-joined path
    pub path: PathBuf,
    /// Entry kind, symlinks are not followed
    pub kind: EntryKind,
    /// Listed (unskipped) children, known once a directory has been read
    pub children: Option<usize>,
}

impl DirectoryEntry {
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }
}

/// What happened to a single file during content export
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// Content (or its extracted form) was written
    Rendered,
    /// Line count exceeded the ceiling, content never read
    SkippedTooLarge(usize),
    /// File could not be opened or read
    Unreadable(String),
    /// Structured document could not be decoded
    ParseError(String),
}

impl fmt::Display for FileOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rendered => write!(f, "rendered"),
            Self::SkippedTooLarge(lines) => write!(f, "skipped ({} lines)", lines),
            Self::Unreadable(_) => write!(f, "unreadable"),
            Self::ParseError(_) => write!(f, "parse error"),
        }
    }
}

/// Per-file result, created and discarded for each exported file
#[derive(Debug, Clone)]
pub struct FileRecord {
    /// Path as written in the dump header
    pub path: PathBuf,
    /// Newline-delimited line count from a full scan
    pub line_count: usize,
    /// Outcome of the extraction
    pub outcome: FileOutcome,
}

/// A value that may be serialized either as one string or a list of strings.
///
/// Notebook writers disagree on this for `source`, `text` and `text/plain`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum MultilineText {
    Lines(Vec<String>),
    Single(String),
}

impl Default for MultilineText {
    fn default() -> Self {
        Self::Lines(Vec::new())
    }
}

impl MultilineText {
    /// Fragments in document order
    pub fn fragments(&self) -> Vec<&str> {
        match self {
            Self::Lines(lines) => lines.iter().map(String::as_str).collect(),
            Self::Single(text) => vec![text.as_str()],
        }
    }

    /// Output lines, one per displayed row, without `\n` or `\r\n` terminators
    pub fn lines(&self) -> Vec<&str> {
        match self {
            Self::Lines(lines) => lines.iter().flat_map(|l| split_rows(l)).collect(),
            Self::Single(text) => split_rows(text).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::Lines(lines) => lines.is_empty(),
            Self::Single(text) => text.is_empty(),
        }
    }
}

fn split_rows(text: &str) -> impl Iterator<Item = &str> {
    text.trim_end_matches(['\r', '\n'])
        .split('\n')
        .map(|row| row.strip_suffix('\r').unwrap_or(row))
}

/// Parsed notebook document
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NotebookDocument {
    #[serde(default)]
    pub metadata: NotebookMetadata,
    pub cells: Vec<NotebookCell>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NotebookMetadata {
    #[serde(default)]
    pub kernelspec: Option<KernelSpec>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct KernelSpec {
    #[serde(default)]
    pub display_name: Option<String>,
}

/// One notebook cell
#[derive(Debug, Clone, Deserialize)]
pub struct NotebookCell {
    /// `code`, `markdown`, `raw`, ...
    #[serde(default = "unknown_cell_type")]
    pub cell_type: String,
    #[serde(default)]
    pub source: MultilineText,
    #[serde(default)]
    pub outputs: Vec<CellOutput>,
}

fn unknown_cell_type() -> String {
    "unknown".to_string()
}

/// One output record of a code cell
#[derive(Debug, Clone, Deserialize)]
pub struct CellOutput {
    #[serde(default)]
    pub output_type: String,
    /// Direct text (stream outputs)
    #[serde(default)]
    pub text: Option<MultilineText>,
    /// Rich data, of which only `text/plain` is used
    #[serde(default)]
    pub data: Option<OutputData>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputData {
    #[serde(rename = "text/plain", default)]
    pub text_plain: Option<MultilineText>,
}

impl CellOutput {
    /// Lines to display: the direct text first, `data.text/plain` otherwise
    pub fn display_lines(&self) -> Vec<&str> {
        if let Some(text) = self.text.as_ref().filter(|t| !t.is_empty()) {
            return text.lines();
        }
        self.data
            .as_ref()
            .and_then(|d| d.text_plain.as_ref())
            .filter(|t| !t.is_empty())
            .map(MultilineText::lines)
            .unwrap_or_default()
    }
}
