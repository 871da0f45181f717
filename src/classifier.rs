/*!
 * Inclusion policy for files and directories
 */

use std::collections::BTreeSet;
use std::path::Path;

use once_cell::sync::Lazy;

use crate::config::ExportConfig;

/// Directories pruned from both the tree and the content walk
pub static DEFAULT_SKIP_DIRS: Lazy<BTreeSet<&'static str>> = Lazy::new(|| {
    [
        // Version Control
        ".git",
        ".svn",
        ".hg",
        ".bzr",
        // Dependencies & Caches
        "node_modules",
        "__pycache__",
        ".pytest_cache",
        ".mypy_cache",
        ".tox",
        ".coverage",
        ".nyc_output",
        "coverage",
        ".cache",
        // IDEs & Editors
        ".idea",
        ".vscode",
        ".vs",
        // Build & Dist
        "bin",
        "obj",
        "build",
        "dist",
        "target",
        ".next",
        ".nuxt",
        "out",
        ".gradle",
        // Temp & Environments
        "tmp",
        "temp",
        ".tmp",
        ".venv",
        "env",
        ".local",
        ".config",
    ]
    .into_iter()
    .collect()
});

/// Docker files exported regardless of the extension policy (lower-case)
pub static DEFAULT_FORCE_INCLUDE: Lazy<BTreeSet<&'static str>> = Lazy::new(|| {
    [
        "dockerfile",
        "dockerfile.dev",
        "dockerfile.prod",
        "dockerfile.test",
        "docker-compose.yml",
        "docker-compose.yaml",
        "docker-compose.dev.yml",
        "docker-compose.dev.yaml",
        "docker-compose.prod.yml",
        "docker-compose.prod.yaml",
        "docker-compose.test.yml",
        "docker-compose.test.yaml",
        "docker-compose.override.yml",
        "docker-compose.override.yaml",
    ]
    .into_iter()
    .collect()
});

/// Lower-cased base name of a path
fn lower_file_name(path: &Path) -> String {
    path.file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_lowercase()
}

/// Whether the file's base name is a forced include (case-insensitive)
pub fn is_forced_include(path: &Path, config: &ExportConfig) -> bool {
    config.force_include.contains(&lower_file_name(path))
}

/// Decide whether a file's content is exported.
///
/// Forced includes always win, then all-files mode, then the extension
/// allow-set. The extension comparison is case-sensitive; callers store
/// normalized keys.
pub fn should_include(path: &Path, config: &ExportConfig) -> bool {
    if is_forced_include(path, config) {
        return true;
    }

    if config.all_files {
        return true;
    }

    path.extension()
        .map(|ext| config.extensions.contains(&*ext.to_string_lossy()))
        .unwrap_or(false)
}

/// Whether a directory with this bare name is pruned entirely
pub fn should_skip_dir(name: &str, config: &ExportConfig) -> bool {
    config.skip_dirs.contains(name)
}
