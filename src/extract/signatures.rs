use std::io::{self, BufRead, Write};
use std::path::Path;

use log::warn;

use super::{strip_terminator, ContentExtractor};
use crate::types::FileOutcome;

const GO: &[&str] = &["package ", "func ", "type "];

const PYTHON: &[&str] = &["def ", "async def ", "class "];

const ECMASCRIPT: &[&str] = &[
    "function ",
    "async function ",
    "export ",
    "class ",
    "interface ",
    "type ",
    "enum ",
];

const C_FAMILY: &[&str] = &[
    "class ",
    "struct ",
    "enum ",
    "union ",
    "namespace ",
    "template",
    "typedef ",
    "interface ",
    "public ",
    "private ",
    "protected ",
    "static ",
];

const RUST: &[&str] = &[
    "fn ",
    "async fn ",
    "pub ",
    "struct ",
    "enum ",
    "trait ",
    "impl ",
    "impl<",
    "mod ",
    "type ",
    "macro_rules!",
];

/// Declaration prefixes for an extension, `None` when unsupported
pub fn keywords_for(extension: &str) -> Option<&'static [&'static str]> {
    match extension.to_ascii_lowercase().as_str() {
        "go" => Some(GO),
        "py" | "pyi" => Some(PYTHON),
        "js" | "jsx" | "mjs" | "cjs" | "ts" | "tsx" => Some(ECMASCRIPT),
        "c" | "h" | "cc" | "cpp" | "cxx" | "hpp" | "cs" | "java" => Some(C_FAMILY),
        "rs" => Some(RUST),
        _ => None,
    }
}

/// Line-prefix signature extraction.
///
/// No parsing: nesting, comments and multi-line declarations are not
/// understood, so matches inside strings or comments show up too.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SignatureDump;

impl ContentExtractor for SignatureDump {
    fn render(
        &self,
        path: &Path,
        line_count: usize,
        reader: &mut dyn BufRead,
        out: &mut dyn Write,
    ) -> io::Result<FileOutcome> {
        write!(
            out,
            "\n// File: {} (signatures, {} lines)\n",
            path.display(),
            line_count
        )?;

        let keywords = match path
            .extension()
            .and_then(|ext| keywords_for(&ext.to_string_lossy()))
        {
            Some(keywords) => keywords,
            None => {
                writeln!(out, "// Signature extraction not implemented for this file type")?;
                return Ok(FileOutcome::Rendered);
            }
        };

        let mut buf = Vec::new();
        let mut line_no = 0;
        loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf) {
                Ok(0) => break,
                Ok(_) => {
                    line_no += 1;
                    let line = String::from_utf8_lossy(strip_terminator(&buf));
                    let trimmed = line.trim();
                    if keywords.iter().any(|k| trimmed.starts_with(k)) {
                        writeln!(out, "{}: {}", line_no, trimmed)?;
                    }
                }
                Err(e) => {
                    warn!("Read failed in {}: {}", path.display(), e);
                    writeln!(out, "// Error reading file: {}", e)?;
                    return Ok(FileOutcome::Unreadable(e.to_string()));
                }
            }
        }

        Ok(FileOutcome::Rendered)
    }
}
