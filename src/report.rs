/*!
 * Reporting functionality for srcdump
 *
 * Summarizes a finished export as console tables rendered with tabled.
 */

use std::time::Duration;

use chrono::Local;
use tabled::{
    settings::{object::Columns, Alignment, Modify, Padding, Style},
    Table, Tabled,
};

use crate::types::{FileOutcome, FileRecord};

/// Information about one exported file
#[derive(Debug, Clone)]
pub struct FileReportInfo {
    /// Path as written in the dump
    pub path: String,
    /// Number of lines in the file
    pub lines: usize,
    /// What was written for it
    pub outcome: FileOutcome,
}

/// Statistics for one export run
#[derive(Debug, Clone, Default)]
pub struct ExportReport {
    /// Output file path
    pub output_file: String,
    /// Wall time of the run
    pub duration: Duration,
    /// The run stopped after the tree
    pub structure_only: bool,
    /// Files whose content was written
    pub files_rendered: usize,
    /// Files over the line ceiling
    pub files_skipped: usize,
    /// Files that could not be read
    pub files_unreadable: usize,
    /// Notebooks that failed to decode
    pub parse_failures: usize,
    /// Lines across rendered files
    pub total_lines: usize,
    /// Details for each file, in export order
    pub file_details: Vec<FileReportInfo>,
}

impl ExportReport {
    /// Fold one file's record into the totals
    pub fn record(&mut self, record: &FileRecord) {
        match &record.outcome {
            FileOutcome::Rendered => {
                self.files_rendered += 1;
                self.total_lines += record.line_count;
            }
            FileOutcome::SkippedTooLarge(_) => self.files_skipped += 1,
            FileOutcome::Unreadable(_) => self.files_unreadable += 1,
            FileOutcome::ParseError(_) => self.parse_failures += 1,
        }
        self.file_details.push(FileReportInfo {
            path: record.path.display().to_string(),
            lines: record.line_count,
            outcome: record.outcome.clone(),
        });
    }

    /// Number of files visited for content
    pub fn files_processed(&self) -> usize {
        self.file_details.len()
    }
}

/// Format of the report output
pub enum ReportFormat {
    /// Console table output
    ConsoleTable,
}

/// Report generator for export results
pub struct Reporter {
    format: ReportFormat,
}

impl Reporter {
    /// Create a new reporter
    pub fn new(format: ReportFormat) -> Self {
        Self { format }
    }

    /// Format a number with human-readable units
    fn format_number(&self, num: usize) -> String {
        if num >= 1_000_000 {
            format!("{:.1}M", num as f64 / 1_000_000.0)
        } else if num >= 1_000 {
            format!("{:.1}K", num as f64 / 1_000.0)
        } else {
            num.to_string()
        }
    }

    /// Generate a report string
    pub fn generate_report(&self, report: &ExportReport) -> String {
        match self.format {
            ReportFormat::ConsoleTable => self.generate_console_report(report),
        }
    }

    /// Print the report to stdout
    pub fn print_report(&self, report: &ExportReport) {
        println!("\n{}", self.generate_report(report));
    }

    // Keep the tail of long paths, which carries the file name
    fn format_path(&self, path: &str, max_len: usize) -> String {
        if path.chars().count() <= max_len {
            return path.to_string();
        }

        let mut segments = Vec::new();
        let mut current_len = 3; // "..."
        for part in path.rsplit('/') {
            let part_len = part.chars().count() + 1;
            if current_len + part_len > max_len {
                break;
            }
            segments.push(part);
            current_len += part_len;
        }

        if segments.is_empty() {
            let tail: String = path
                .chars()
                .rev()
                .take(max_len.saturating_sub(3))
                .collect::<Vec<_>>()
                .into_iter()
                .rev()
                .collect();
            return format!("...{}", tail);
        }

        let mut result = String::from("...");
        for part in segments.iter().rev() {
            result.push('/');
            result.push_str(part);
        }
        result
    }

    fn create_summary_table(&self, report: &ExportReport) -> String {
        #[derive(Tabled)]
        struct SummaryRow {
            #[tabled(rename = "Metric")]
            key: String,

            #[tabled(rename = "Value")]
            value: String,
        }

        let mut rows = vec![
            SummaryRow {
                key: "📂 Output File".to_string(),
                value: report.output_file.clone(),
            },
            SummaryRow {
                key: "⏱️ Process Time".to_string(),
                value: format!("{:.4?}", report.duration),
            },
        ];

        if report.structure_only {
            rows.push(SummaryRow {
                key: "🌳 Mode".to_string(),
                value: "structure only".to_string(),
            });
        } else {
            rows.push(SummaryRow {
                key: "📄 Files Exported".to_string(),
                value: self.format_number(report.files_rendered),
            });
            rows.push(SummaryRow {
                key: "📝 Total Lines".to_string(),
                value: self.format_number(report.total_lines),
            });
            if report.files_skipped > 0 {
                rows.push(SummaryRow {
                    key: "✂️ Skipped (too large)".to_string(),
                    value: report.files_skipped.to_string(),
                });
            }
            if report.files_unreadable + report.parse_failures > 0 {
                rows.push(SummaryRow {
                    key: "⚠️ Unreadable / Bad Notebooks".to_string(),
                    value: format!("{} / {}", report.files_unreadable, report.parse_failures),
                });
            }
        }

        rows.push(SummaryRow {
            key: "🕒 Completed".to_string(),
            value: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        });

        let mut table = Table::new(rows);
        table
            .with(Style::rounded())
            .with(Padding::new(1, 1, 0, 0))
            .with(Modify::new(Columns::new(..)).with(Alignment::left()));

        table.to_string()
    }

    fn create_files_table(&self, report: &ExportReport) -> String {
        #[derive(Tabled)]
        struct FileRow {
            #[tabled(rename = "File Path")]
            path: String,

            #[tabled(rename = "Lines")]
            lines: String,

            #[tabled(rename = "Result")]
            outcome: String,
        }

        let mut files: Vec<&FileReportInfo> = report.file_details.iter().collect();
        files.sort_by(|a, b| b.lines.cmp(&a.lines));

        let files_to_show = if files.len() > 15 { &files[..10] } else { &files[..] };

        let rows: Vec<FileRow> = files_to_show
            .iter()
            .map(|info| FileRow {
                path: self.format_path(&info.path, 60),
                lines: self.format_number(info.lines),
                outcome: info.outcome.to_string(),
            })
            .collect();

        let mut table = Table::new(rows);
        table
            .with(Style::rounded())
            .with(Padding::new(1, 1, 0, 0))
            .with(Modify::new(Columns::new(..)).with(Alignment::left()));

        table.to_string()
    }

    fn generate_console_report(&self, report: &ExportReport) -> String {
        let summary = self.create_summary_table(report);
        let mut output = format!("✅  EXPORT COMPLETE\n{}\n", summary);

        if !report.file_details.is_empty() {
            let title = if report.file_details.len() > 15 {
                "📋  TOP 10 LARGEST FILES BY LINE COUNT"
            } else {
                "📋  EXPORTED FILES"
            };
            output.push_str(&format!("\n{}\n{}\n", title, self.create_files_table(report)));
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn record(path: &str, lines: usize, outcome: FileOutcome) -> FileRecord {
        FileRecord {
            path: PathBuf::from(path),
            line_count: lines,
            outcome,
        }
    }

    #[test]
    fn test_record_totals() {
        let mut report = ExportReport::default();
        report.record(&record("a.go", 10, FileOutcome::Rendered));
        report.record(&record("b.go", 20_000, FileOutcome::SkippedTooLarge(20_000)));
        report.record(&record("c.ipynb", 3, FileOutcome::ParseError("eof".into())));
        report.record(&record("d.go", 5, FileOutcome::Rendered));

        assert_eq!(report.files_rendered, 2);
        assert_eq!(report.files_skipped, 1);
        assert_eq!(report.parse_failures, 1);
        assert_eq!(report.total_lines, 15);
        assert_eq!(report.files_processed(), 4);
    }

    #[test]
    fn test_format_number() {
        let reporter = Reporter::new(ReportFormat::ConsoleTable);
        assert_eq!(reporter.format_number(999), "999");
        assert_eq!(reporter.format_number(1_500), "1.5K");
        assert_eq!(reporter.format_number(2_000_000), "2.0M");
    }

    #[test]
    fn test_format_path_keeps_tail() {
        let reporter = Reporter::new(ReportFormat::ConsoleTable);
        assert_eq!(reporter.format_path("src/main.rs", 60), "src/main.rs");

        let long = "very/long/directory/structure/that/goes/on/and/on/for/ever/file.rs";
        let short = reporter.format_path(long, 30);
        assert!(short.starts_with("..."));
        assert!(short.ends_with("/file.rs"));
        assert!(short.chars().count() <= 30);
    }

    #[test]
    fn test_console_report_mentions_files() {
        let mut report = ExportReport {
            output_file: "/tmp/out/src.txt".to_string(),
            ..Default::default()
        };
        report.record(&record("main.go", 42, FileOutcome::Rendered));

        let text = Reporter::new(ReportFormat::ConsoleTable).generate_report(&report);
        assert!(text.contains("EXPORT COMPLETE"));
        assert!(text.contains("/tmp/out/src.txt"));
        assert!(text.contains("main.go"));
        assert!(text.contains("rendered"));
    }
}
