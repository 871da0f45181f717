/*!
 * Directory tree rendering
 */

use std::collections::BTreeSet;
use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::Path;

use log::{debug, warn};

use crate::error::{ExportError, Result};
use crate::types::{DirectoryEntry, EntryKind};

/// A level with more entries than this is truncated
pub const WIDE_DIR_THRESHOLD: usize = 50;

/// Entries kept from a truncated level
pub const WIDE_DIR_SHOWN: usize = 5;

const BRANCH: &str = "├── ";
const LAST_BRANCH: &str = "└── ";
const PIPE_INDENT: &str = "│   ";
const SPACE_INDENT: &str = "    ";

/// Render the hierarchy below `root`, one line per entry.
///
/// Entries are listed in the filesystem's native order. Names found in
/// `skip` are dropped (and never descended into). A root that cannot be
/// listed is an error, a nested directory that cannot be listed renders
/// an inline error line instead.
pub fn render_tree(root: &Path, skip: &BTreeSet<String>) -> Result<String> {
    let entries = list_entries(root, skip).map_err(|source| ExportError::Traversal {
        path: root.to_path_buf(),
        source,
    })?;

    let mut out = String::new();
    write_level(&mut out, entries, "", skip);
    debug!("Rendered tree for {} ({} lines)", root.display(), out.lines().count());
    Ok(out)
}

/// List one directory level, minus skipped names
fn list_entries(dir: &Path, skip: &BTreeSet<String>) -> io::Result<Vec<DirectoryEntry>> {
    let mut entries = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().to_string();
        if skip.contains(&name) {
            continue;
        }
        let kind = match entry.file_type() {
            Ok(ft) if ft.is_dir() => EntryKind::Directory,
            _ => EntryKind::File,
        };
        entries.push(DirectoryEntry {
            name,
            path: entry.path(),
            kind,
            children: None,
        });
    }
    Ok(entries)
}

fn write_level(out: &mut String, entries: Vec<DirectoryEntry>, prefix: &str, skip: &BTreeSet<String>) {
    let total = entries.len();
    let truncated = total > WIDE_DIR_THRESHOLD;
    let shown = if truncated { WIDE_DIR_SHOWN } else { total };

    for (i, mut entry) in entries.into_iter().take(shown).enumerate() {
        let is_last = !truncated && i == shown - 1;
        let (connector, indent) = if is_last {
            (LAST_BRANCH, SPACE_INDENT)
        } else {
            (BRANCH, PIPE_INDENT)
        };

        let _ = writeln!(out, "{}{}{}", prefix, connector, entry.name);

        if entry.is_dir() {
            let child_prefix = format!("{}{}", prefix, indent);
            match list_entries(&entry.path, skip) {
                Ok(children) => {
                    entry.children = Some(children.len());
                    if let Some(count) = entry.children.filter(|&n| n > WIDE_DIR_THRESHOLD) {
                        debug!("Truncating {} ({} entries)", entry.path.display(), count);
                    }
                    write_level(out, children, &child_prefix, skip);
                }
                Err(e) => {
                    warn!("Cannot list {}: {}", entry.path.display(), e);
                    let _ = writeln!(out, "{}Error accessing path: {}", child_prefix, e);
                }
            }
        }
    }

    if truncated {
        let _ = writeln!(
            out,
            "{}{}... (and {} more items)",
            prefix,
            LAST_BRANCH,
            total - WIDE_DIR_SHOWN
        );
    }
}
