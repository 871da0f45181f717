use std::io::{self, BufRead, Write};
use std::path::Path;

use log::warn;

use super::{strip_terminator, ContentExtractor};
use crate::types::FileOutcome;

/// Verbatim line dump
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RawDump;

impl ContentExtractor for RawDump {
    fn render(
        &self,
        path: &Path,
        line_count: usize,
        reader: &mut dyn BufRead,
        out: &mut dyn Write,
    ) -> io::Result<FileOutcome> {
        write!(out, "\n// File: {} ({} lines)\n", path.display(), line_count)?;

        let mut buf = Vec::new();
        loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf) {
                Ok(0) => break,
                Ok(_) => {
                    out.write_all(strip_terminator(&buf))?;
                    out.write_all(b"\n")?;
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
