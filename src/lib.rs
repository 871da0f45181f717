/*!
 * srcdump - Concatenate a project's source tree into one text file
 *
 * The dump starts with a manifest and an ASCII directory tree, followed by
 * the content of every included file: raw, as notebook cells, or reduced
 * to declaration-like lines.
 */

pub mod classifier;
pub mod config;
pub mod error;
pub mod exporter;
pub mod extract;
pub mod logging;
pub mod progress;
pub mod report;
pub mod tree;
pub mod types;

#[cfg(test)]
mod tests;

// Re-export main components for easier access
pub use config::{ContentMode, ExportConfig, FileSource};
pub use error::{ExportError, Result};
pub use exporter::{export, Exporter};
pub use progress::ProgressSink;
pub use report::{ExportReport, FileReportInfo, ReportFormat, Reporter};
pub use types::{FileOutcome, FileRecord};

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
