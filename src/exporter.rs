/*!
 * Export orchestration: manifest, tree, then file contents
 */

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use log::{debug, info};
use walkdir::WalkDir;

use crate::classifier::{should_include, should_skip_dir, DEFAULT_FORCE_INCLUDE};
use crate::config::{ContentMode, ExportConfig, FileSource, OUTPUT_FILE_NAME};
use crate::error::{ExportError, Result};
use crate::extract::extract;
use crate::progress::ProgressSink;
use crate::report::ExportReport;
use crate::tree::render_tree;
use crate::types::{FileOutcome, FileRecord};

/// Drives one export run and writes the single `src.txt` artifact
pub struct Exporter {
    /// Run configuration
    config: ExportConfig,
    /// Status callback
    progress: Arc<dyn ProgressSink>,
}

impl Exporter {
    /// Create a new exporter
    pub fn new(config: ExportConfig, progress: Arc<dyn ProgressSink>) -> Self {
        Self { config, progress }
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Run the export.
    ///
    /// Only a failure to create or write the artifact, or to walk the
    /// source tree, aborts the run. The buffered writer is flushed once on
    /// every path out of here, so whatever was produced before an error
    /// still reaches the file.
    pub fn run(&self) -> Result<ExportReport> {
        let start = Instant::now();
        let output_path = self.config.output_file();

        let file = File::create(&output_path).map_err(|source| ExportError::CreateOutput {
            path: output_path.clone(),
            source,
        })?;
        let mut writer = BufWriter::new(file);

        let mut report = ExportReport {
            output_file: output_path.display().to_string(),
            structure_only: self.config.structure_only,
            ..Default::default()
        };

        let written = self.write_dump(&mut writer, &output_path, &mut report);
        let flushed = writer.flush();
        written?;
        flushed?;

        report.duration = start.elapsed();
        let done = if self.config.structure_only {
            format!("Done! Directory structure exported to: {}", output_path.display())
        } else {
            format!("Done! Exported successfully to: {}", output_path.display())
        };
        info!("{} ({} files)", done, report.files_processed());
        self.progress.report(&done);

        Ok(report)
    }

    fn write_dump(
        &self,
        out: &mut dyn Write,
        output_path: &Path,
        report: &mut ExportReport,
    ) -> Result<()> {
        self.write_manifest(out)?;

        writeln!(out, "--- Directory Structure ---")?;
        self.progress.report("Building directory tree...");
        let tree = render_tree(&self.config.source_dir, &self.config.skip_dirs)?;
        out.write_all(tree.as_bytes())?;
        writeln!(out)?;

        if self.config.structure_only {
            debug!("Structure-only run, skipping contents");
            return Ok(());
        }

        writeln!(out, "--- Source Code Details ---")?;
        self.progress.report("Exporting file contents...");

        // The artifact may live inside the tree being exported
        let artifact = fs::canonicalize(output_path).ok();

        match &self.config.file_source {
            FileSource::FullScan => self.export_walk(out, artifact.as_deref(), report),
            FileSource::Explicit(files) => self.export_list(out, files, artifact.as_deref(), report),
        }
    }

    /// Write the header block describing the run
    fn write_manifest(&self, out: &mut dyn Write) -> Result<()> {
        let config = &self.config;

        write!(out, "--- Project Overview ---\n\n\n")?;
        write!(
            out,
            "--- Notes ---\nThis is the complete project code. Please read and understand thoroughly.\n\n"
        )?;

        writeln!(out, "--- File Types Included ---")?;
        if config.all_files {
            writeln!(out, "All files")?;
        } else {
            for ext in &config.extensions {
                writeln!(out, ".{}", ext)?;
            }
        }

        write!(out, "\n--- Important Files Always Included ---\n")?;
        writeln!(
            out,
            "Dockerfile, docker-compose.yml/.yaml files (regardless of extension filter)"
        )?;
        let extra: Vec<&str> = config
            .force_include
            .iter()
            .map(String::as_str)
            .filter(|name| !DEFAULT_FORCE_INCLUDE.contains(*name))
            .collect();
        if !extra.is_empty() {
            writeln!(out, "Also: {}", extra.join(", "))?;
        }
        writeln!(out)?;

        writeln!(out, "--- Excluded Directories ---")?;
        if config.skip_dirs.is_empty() {
            writeln!(out, "(none)")?;
        } else {
            let excluded: Vec<&str> = config.skip_dirs.iter().map(String::as_str).collect();
            writeln!(out, "{}", excluded.join(", "))?;
        }
        writeln!(out)?;

        if config.structure_only {
            write!(
                out,
                "--- Mode: Structure Only ---\nFile contents are omitted.\n\n"
            )?;
        }

        if let FileSource::Explicit(files) = &config.file_source {
            write!(out, "--- Mode: Specific Files ---\nSelected files:\n")?;
            for file in files {
                writeln!(out, "- {}", file.display())?;
            }
            writeln!(out)?;
        }

        if config.mode == ContentMode::AstLite && !config.structure_only {
            write!(
                out,
                "--- Mode: Signatures Only (AST-lite) ---\nOnly declaration-like lines are shown, matched by keyword prefix.\n\n"
            )?;
        }

        Ok(())
    }

    /// Recursive walk, pruning skipped directories below the root
    fn export_walk(
        &self,
        out: &mut dyn Write,
        artifact: Option<&Path>,
        report: &mut ExportReport,
    ) -> Result<()> {
        let walker = WalkDir::new(&self.config.source_dir)
            .into_iter()
            .filter_entry(|e| {
                !(e.depth() > 0
                    && e.file_type().is_dir()
                    && should_skip_dir(&e.file_name().to_string_lossy(), &self.config))
            });

        for entry in walker {
            let entry = entry?;
            if !entry.file_type().is_file() || !should_include(entry.path(), &self.config) {
                continue;
            }
            if is_artifact(entry.path(), artifact) {
                debug!("Not exporting the output file itself: {}", entry.path().display());
                continue;
            }
            self.export_file(out, entry.path(), report)?;
        }

        Ok(())
    }

    /// Literal caller-supplied paths, resolved against the source directory
    fn export_list(
        &self,
        out: &mut dyn Write,
        files: &[PathBuf],
        artifact: Option<&Path>,
        report: &mut ExportReport,
    ) -> Result<()> {
        for file in files {
            let path = self.config.resolve(file);

            if !path.is_file() {
                debug!("Selected file missing: {}", path.display());
                write!(out, "\n// File: {} (could not be opened)\n", path.display())?;
                report.record(&FileRecord {
                    path,
                    line_count: 0,
                    outcome: FileOutcome::Unreadable("not a regular file".to_string()),
                });
                continue;
            }

            if !should_include(&path, &self.config) || is_artifact(&path, artifact) {
                debug!("Selected file filtered out: {}", path.display());
                continue;
            }

            self.export_file(out, &path, report)?;
        }

        Ok(())
    }

    fn export_file(&self, out: &mut dyn Write, path: &Path, report: &mut ExportReport) -> Result<()> {
        self.progress
            .report(&format!("Processing: {}", path.display()));
        let record = extract(path, self.config.mode, out)?;
        report.record(&record);
        Ok(())
    }
}

fn is_artifact(path: &Path, artifact: Option<&Path>) -> bool {
    let Some(artifact) = artifact else {
        return false;
    };
    path.file_name().is_some_and(|name| name == OUTPUT_FILE_NAME)
        && fs::canonicalize(path).is_ok_and(|p| p == artifact)
}

/// Run one export with the given sink
pub fn export(config: ExportConfig, progress: Arc<dyn ProgressSink>) -> Result<ExportReport> {
    Exporter::new(config, progress).run()
}
