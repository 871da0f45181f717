use std::io::{self, BufRead, Write};
use std::path::Path;

use log::warn;

use super::ContentExtractor;
use crate::types::{CellOutput, FileOutcome, NotebookDocument};

/// Output lines printed per cell, across all of its outputs
pub const OUTPUT_LINE_BUDGET: usize = 30;

/// Cell-by-cell notebook dump
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NotebookDump;

impl ContentExtractor for NotebookDump {
    fn render(
        &self,
        path: &Path,
        _line_count: usize,
        reader: &mut dyn BufRead,
        out: &mut dyn Write,
    ) -> io::Result<FileOutcome> {
        write!(out, "\n// File: {} (Jupyter Notebook)\n", path.display())?;

        let notebook: NotebookDocument = match serde_json::from_reader(reader) {
            Ok(notebook) => notebook,
            Err(e) => {
                warn!("Malformed notebook {}: {}", path.display(), e);
                writeln!(out, "// Error parsing notebook: {}", e)?;
                return Ok(FileOutcome::ParseError(e.to_string()));
            }
        };

        if let Some(kernel) = notebook
            .metadata
            .kernelspec
            .as_ref()
            .and_then(|k| k.display_name.as_deref())
        {
            writeln!(out, "// Kernel: {}", kernel)?;
        }

        write!(out, "\n// Notebook Content:\n")?;
        for (i, cell) in notebook.cells.iter().enumerate() {
            write!(out, "\n// --- Cell {} ({}) ---\n", i + 1, cell.cell_type)?;
            for fragment in cell.source.fragments() {
                out.write_all(fragment.as_bytes())?;
            }
            out.write_all(b"\n")?;
            write_outputs(&cell.outputs, out)?;
        }

        Ok(FileOutcome::Rendered)
    }
}

fn write_outputs(outputs: &[CellOutput], out: &mut dyn Write) -> io::Result<()> {
    let lines: Vec<&str> = outputs.iter().flat_map(CellOutput::display_lines).collect();
    if lines.is_empty() {
        return Ok(());
    }

    writeln!(out, "// Output:")?;
    for line in lines.iter().take(OUTPUT_LINE_BUDGET) {
        writeln!(out, "// {}", line)?;
    }
    if lines.len() > OUTPUT_LINE_BUDGET {
        writeln!(
            out,
            "// ... (output truncated after {} lines)",
            OUTPUT_LINE_BUDGET
        )?;
    }
    Ok(())
}
