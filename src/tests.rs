/*!
 * End-to-end tests for export runs
 */

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tempfile::{tempdir, TempDir};

use crate::config::{ContentMode, ExportConfig, FileSource};
use crate::error::ExportError;
use crate::exporter::Exporter;
use crate::progress::ProgressSink;
use crate::types::FileOutcome;

// Helper function to create a test project
fn setup_test_project() -> io::Result<TempDir> {
    let temp_dir = tempdir()?;
    let root = temp_dir.path();

    fs::create_dir_all(root.join("cmd").join("server"))?;
    fs::create_dir(root.join("docs"))?;

    let mut main = File::create(root.join("main.go"))?;
    writeln!(main, "package main\n\nfunc main() {{\n\tserve()\n}}")?;

    let mut server = File::create(root.join("cmd").join("server").join("server.go"))?;
    writeln!(server, "package server\n\ntype Server struct{{}}")?;

    let mut readme = File::create(root.join("docs").join("README.md"))?;
    writeln!(readme, "# Docs that are not exported")?;

    let mut dockerfile = File::create(root.join("Dockerfile"))?;
    writeln!(dockerfile, "FROM golang:1.22\nRUN go build")?;

    // Directories that must be pruned
    fs::create_dir_all(root.join(".git").join("objects"))?;
    File::create(root.join(".git").join("config"))?;
    fs::create_dir_all(root.join("node_modules").join("dep"))?;
    let mut dep = File::create(root.join("node_modules").join("dep").join("index.go"))?;
    writeln!(dep, "package hidden")?;

    Ok(temp_dir)
}

fn output_dir() -> io::Result<TempDir> {
    tempdir()
}

fn collecting_sink() -> (Arc<dyn ProgressSink>, Arc<Mutex<Vec<String>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = {
        let seen = Arc::clone(&seen);
        move |msg: &str| seen.lock().unwrap().push(msg.to_string())
    };
    (Arc::new(sink), seen)
}

fn run(config: ExportConfig) -> (String, Vec<String>) {
    let (sink, seen) = collecting_sink();
    let output_file = config.output_file();
    Exporter::new(config, sink).run().unwrap();
    let dump = fs::read_to_string(output_file).unwrap();
    let messages = seen.lock().unwrap().clone();
    (dump, messages)
}

fn go_config(src: &Path, out: &Path) -> ExportConfig {
    ExportConfig::new(src, out)
        .with_extensions(["go"])
        .with_all_files(false)
}

#[test]
fn test_basic_export() -> io::Result<()> {
    let project = setup_test_project()?;
    let out = output_dir()?;

    let (dump, _) = run(go_config(project.path(), out.path()));

    assert!(dump.starts_with("--- Project Overview ---\n"));
    assert!(dump.contains("--- File Types Included ---\n.go\n"));
    assert!(dump.contains("--- Directory Structure ---\n"));
    assert!(dump.contains("--- Source Code Details ---\n"));

    let main_path = project.path().join("main.go");
    assert!(dump.contains(&format!("\n// File: {} (5 lines)\npackage main\n", main_path.display())));
    assert!(dump.contains("type Server struct{}"));
    assert!(!dump.contains("# Docs that are not exported"));

    // README is listed in the tree even though its content is not exported
    assert!(dump.contains("README.md"));

    Ok(())
}

#[test]
fn test_dockerfile_is_always_included() -> io::Result<()> {
    let project = setup_test_project()?;
    let out = output_dir()?;

    let (dump, _) = run(go_config(project.path(), out.path()));

    let docker_path = project.path().join("Dockerfile");
    assert!(dump.contains(&format!("// File: {} (2 lines)", docker_path.display())));
    assert!(dump.contains("FROM golang:1.22"));
    Ok(())
}

#[test]
fn test_skip_dirs_pruned_everywhere() -> io::Result<()> {
    let project = setup_test_project()?;
    let out = output_dir()?;

    let (dump, _) = run(go_config(project.path(), out.path()));

    let tree_start = dump.find("--- Directory Structure ---").unwrap();
    let details_start = dump.find("--- Source Code Details ---").unwrap();
    let tree = &dump[tree_start..details_start];

    assert!(!tree.contains("node_modules"));
    assert!(!tree.contains(".git\n"));
    assert!(!dump.contains("package hidden"));
    Ok(())
}

#[test]
fn test_structure_only_stops_after_tree() -> io::Result<()> {
    let project = setup_test_project()?;
    let out = output_dir()?;

    let (dump, messages) = run(go_config(project.path(), out.path()).with_structure_only(true));

    assert!(dump.contains("--- Mode: Structure Only ---"));
    assert!(dump.contains("main.go"));
    assert!(!dump.contains("--- Source Code Details ---"));
    assert!(!dump.contains("package main"));
    assert!(messages.last().unwrap().starts_with("Done! Directory structure exported to:"));
    assert!(!messages.iter().any(|m| m.starts_with("Processing:")));
    Ok(())
}

#[test]
fn test_specific_files_mode() -> io::Result<()> {
    let project = setup_test_project()?;
    let out = output_dir()?;

    let config = go_config(project.path(), out.path()).with_file_source(FileSource::Explicit(vec![
        PathBuf::from("cmd/server/server.go"),
        PathBuf::from("missing.go"),
    ]));
    let (dump, _) = run(config);

    assert!(dump.contains("--- Mode: Specific Files ---\nSelected files:\n- cmd/server/server.go\n- missing.go\n"));
    assert!(dump.contains("type Server struct{}"));
    assert!(!dump.contains("func main()"));
    assert!(dump.contains("missing.go (could not be opened)"));
    Ok(())
}

#[test]
fn test_progress_messages_in_order() -> io::Result<()> {
    let project = setup_test_project()?;
    let out = output_dir()?;

    let (_, messages) = run(go_config(project.path(), out.path()));

    assert_eq!(messages[0], "Building directory tree...");
    assert_eq!(messages[1], "Exporting file contents...");
    let processed = messages.iter().filter(|m| m.starts_with("Processing: ")).count();
    assert_eq!(processed, 3); // main.go, server.go, Dockerfile
    let last = messages.last().unwrap();
    assert!(last.starts_with("Done! Exported successfully to: "));
    assert!(last.ends_with("src.txt"));
    Ok(())
}

#[test]
fn test_report_counts() -> io::Result<()> {
    let project = setup_test_project()?;
    let out = output_dir()?;
    fs::write(project.path().join("big.go"), "x\n".repeat(10_001))?;
    fs::write(project.path().join("bad.ipynb"), "{ not json")?;

    let config = go_config(project.path(), out.path()).with_extensions(["go", "ipynb"]);
    let (sink, _) = collecting_sink();
    let report = Exporter::new(config, sink).run().unwrap();

    assert_eq!(report.files_rendered, 3);
    assert_eq!(report.files_skipped, 1);
    assert_eq!(report.parse_failures, 1);
    assert!(report
        .file_details
        .iter()
        .any(|f| f.outcome == FileOutcome::SkippedTooLarge(10_001)));

    let dump = fs::read_to_string(out.path().join("src.txt"))?;
    assert!(dump.contains("(skipped - too large: 10001 lines)"));
    assert!(dump.contains("// Error parsing notebook: "));
    Ok(())
}

#[test]
fn test_ast_lite_mode() -> io::Result<()> {
    let project = setup_test_project()?;
    let out = output_dir()?;

    let (dump, _) = run(
        go_config(project.path(), out.path())
            .with_extensions(["go", "md"])
            .with_mode(ContentMode::AstLite),
    );

    assert!(dump.contains("--- Mode: Signatures Only (AST-lite) ---"));
    assert!(dump.contains("1: package main\n3: func main() {\n"));
    assert!(!dump.contains("\tserve()"));
    assert!(dump.contains("// Signature extraction not implemented for this file type"));
    assert!(!dump.contains("# Docs that are not exported"));
    Ok(())
}

#[test]
fn test_output_inside_source_is_not_exported() -> io::Result<()> {
    let project = setup_test_project()?;
    fs::write(project.path().join("src.txt"), "stale dump content")?;

    let config = ExportConfig::new(project.path(), project.path());
    let (dump, _) = run(config);

    let artifact = project.path().join("src.txt");
    assert!(!dump.contains(&format!("// File: {}", artifact.display())));
    assert_eq!(dump.matches("--- Project Overview ---").count(), 1);
    assert!(!dump.contains("stale dump content"));
    Ok(())
}

#[test]
fn test_output_creation_failure_is_fatal() -> io::Result<()> {
    let project = setup_test_project()?;
    let config = ExportConfig::new(project.path(), project.path().join("no-such-dir"));

    let (sink, seen) = collecting_sink();
    let err = Exporter::new(config, sink).run().unwrap_err();

    assert!(matches!(err, ExportError::CreateOutput { .. }));
    assert!(seen.lock().unwrap().is_empty());
    Ok(())
}

#[test]
fn test_notebook_in_raw_mode() -> io::Result<()> {
    let project = setup_test_project()?;
    let out = output_dir()?;
    fs::write(
        project.path().join("intro.ipynb"),
        r##"{"cells": [{"cell_type": "markdown", "metadata": {}, "source": ["# Title"]}], "nbformat": 4}"##,
    )?;

    let (dump, _) = run(go_config(project.path(), out.path()).with_extensions(["ipynb"]));

    assert!(dump.contains("intro.ipynb (Jupyter Notebook)"));
    assert!(dump.contains("// --- Cell 1 (markdown) ---\n# Title\n"));
    assert!(!dump.contains("Output:"));
    Ok(())
}

#[test]
fn test_rerun_overwrites_artifact() -> io::Result<()> {
    let project = setup_test_project()?;
    let out = output_dir()?;
    fs::write(out.path().join("src.txt"), "old content that should vanish")?;

    let (dump, _) = run(go_config(project.path(), out.path()));
    assert!(!dump.contains("old content that should vanish"));
    Ok(())
}

#[cfg(unix)]
#[test]
fn test_unlistable_subdirectory_aborts_walk() -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let project = setup_test_project()?;
    let out = output_dir()?;
    let locked = project.path().join("locked");
    fs::create_dir(&locked)?;
    fs::write(locked.join("secret.go"), "package secret\n")?;
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000))?;

    // Permission bits do not stop root
    if fs::read_dir(&locked).is_ok() {
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755))?;
        return Ok(());
    }

    let config = go_config(project.path(), out.path());
    let (sink, seen) = collecting_sink();
    let result = Exporter::new(config, sink).run();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755))?;

    match result {
        Err(ExportError::Traversal { path, .. }) => assert_eq!(path, locked),
        other => panic!("expected a traversal error, got {:?}", other.map(|r| r.files_processed())),
    }

    // Everything written before the failure is flushed
    let dump = fs::read_to_string(out.path().join("src.txt"))?;
    assert!(dump.contains("locked\n"));
    assert!(dump.contains("Error accessing path: "));
    assert!(dump.contains("--- Source Code Details ---"));
    assert!(!dump.contains("package secret"));
    assert!(!seen.lock().unwrap().iter().any(|m| m.starts_with("Done!")));
    Ok(())
}
