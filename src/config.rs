/*!
 * Configuration handling for srcdump
 */

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use clap_complete::Shell;
use strum::Display;

use crate::classifier::{DEFAULT_FORCE_INCLUDE, DEFAULT_SKIP_DIRS};
use crate::error::Result;
use crate::{bail, ensure};

/// Name of the artifact written into the output directory
pub const OUTPUT_FILE_NAME: &str = "src.txt";

/// Extensions offered when the user does not pass any
pub const DEFAULT_EXTENSIONS: &str = "go,cpp,h,txt,ipynb,py,js,ts,html,css,java";

/// How file content is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum ContentMode {
    /// Dump every line verbatim
    #[default]
    Raw,
    /// Keep only declaration-looking lines
    AstLite,
}

/// Where the set of exported files comes from
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FileSource {
    /// Recursive walk of the source directory
    #[default]
    FullScan,
    /// Literal caller-supplied paths
    Explicit(Vec<PathBuf>),
}

/// Command-line arguments for srcdump
#[derive(Parser, Debug, Clone)]
#[clap(
    name = "srcdump",
    version = env!("CARGO_PKG_VERSION"),
    about = "Concatenate a project's source tree into a single text dump",
    long_about = "Writes src.txt containing a manifest, the directory tree and the content of every included file, ready to paste into review or LLM tools."
)]
pub struct Args {
    /// Project directory to export
    #[clap(default_value = ".")]
    pub source_dir: String,

    /// Directory that receives src.txt
    #[clap(short, long, default_value = ".")]
    pub output_dir: String,

    /// Comma-separated extensions to include (empty for all files)
    #[clap(short, long, default_value = DEFAULT_EXTENSIONS)]
    pub extensions: String,

    /// Include every file regardless of extension
    #[clap(long)]
    pub all_files: bool,

    /// Extra directory names to skip
    #[clap(long, value_delimiter = ',')]
    pub skip_dirs: Vec<String>,

    /// Use only --skip-dirs instead of extending the built-in list
    #[clap(long)]
    pub no_default_skips: bool,

    /// Extra file names always exported (case-insensitive)
    #[clap(long, value_delimiter = ',')]
    pub force_include: Vec<String>,

    /// Stop after the directory tree
    #[clap(long)]
    pub structure_only: bool,

    /// Export only these files instead of walking the tree
    #[clap(long, value_delimiter = ',')]
    pub files: Vec<String>,

    /// Content rendering mode
    #[clap(long, value_enum, default_value_t = ContentMode::default())]
    pub mode: ContentMode,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[clap(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Generate shell completions
    #[clap(long = "generate", value_enum)]
    pub generate: Option<Shell>,
}

/// Immutable description of one export run
#[derive(Clone, Debug)]
pub struct ExportConfig {
    /// Project root
    pub source_dir: PathBuf,

    /// Directory receiving the artifact
    pub output_dir: PathBuf,

    /// Normalized extension keys, e.g. "go"
    pub extensions: BTreeSet<String>,

    /// Export every file regardless of extension
    pub all_files: bool,

    /// Directory names pruned everywhere
    pub skip_dirs: BTreeSet<String>,

    /// Lower-cased base names always exported
    pub force_include: BTreeSet<String>,

    /// Stop after the tree
    pub structure_only: bool,

    /// Walk or explicit list
    pub file_source: FileSource,

    /// Raw or AST-lite content
    pub mode: ContentMode,
}

/// Split a comma list, strip dots and whitespace, lower-case.
pub fn parse_extensions(input: &str) -> BTreeSet<String> {
    input
        .split(',')
        .map(|part| part.trim().trim_start_matches('.').to_lowercase())
        .filter(|ext| !ext.is_empty())
        .collect()
}

impl ExportConfig {
    /// Config with the built-in skip and forced-include sets, all files, raw mode
    pub fn new(source_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_dir: source_dir.into(),
            output_dir: output_dir.into(),
            extensions: BTreeSet::new(),
            all_files: true,
            skip_dirs: DEFAULT_SKIP_DIRS.iter().map(|s| s.to_string()).collect(),
            force_include: DEFAULT_FORCE_INCLUDE.iter().map(|s| s.to_string()).collect(),
            structure_only: false,
            file_source: FileSource::FullScan,
            mode: ContentMode::Raw,
        }
    }

    /// Create configuration from command-line arguments
    pub fn from_args(args: Args) -> Self {
        let extensions = parse_extensions(&args.extensions);
        let all_files = args.all_files || extensions.is_empty();

        let file_source = if args.files.is_empty() {
            FileSource::FullScan
        } else {
            FileSource::Explicit(args.files.iter().map(PathBuf::from).collect())
        };

        Self::new(args.source_dir, args.output_dir)
            .with_extensions(extensions)
            .with_all_files(all_files)
            .with_skip_dirs(args.skip_dirs, !args.no_default_skips)
            .with_force_include(args.force_include)
            .with_structure_only(args.structure_only)
            .with_file_source(file_source)
            .with_mode(args.mode)
    }

    /// Replace the extension allow-set. Keys are stored as given.
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_all_files(mut self, all_files: bool) -> Self {
        self.all_files = all_files;
        self
    }

    /// Add skip directories, optionally dropping the built-in set first
    pub fn with_skip_dirs<I, S>(mut self, dirs: I, keep_defaults: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if !keep_defaults {
            self.skip_dirs.clear();
        }
        self.skip_dirs.extend(
            dirs.into_iter()
                .map(Into::into)
                .map(|d: String| d.trim().to_string())
                .filter(|d| !d.is_empty()),
        );
        self
    }

    /// Add forced-include names (matched case-insensitively)
    pub fn with_force_include<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.force_include.extend(
            names
                .into_iter()
                .map(Into::into)
                .map(|n: String| n.trim().to_lowercase())
                .filter(|n| !n.is_empty()),
        );
        self
    }

    pub fn with_structure_only(mut self, structure_only: bool) -> Self {
        self.structure_only = structure_only;
        self
    }

    pub fn with_file_source(mut self, file_source: FileSource) -> Self {
        self.file_source = file_source;
        self
    }

    pub fn with_mode(mut self, mode: ContentMode) -> Self {
        self.mode = mode;
        self
    }

    /// Full path of the artifact
    pub fn output_file(&self) -> PathBuf {
        self.output_dir.join(OUTPUT_FILE_NAME)
    }

    /// Resolve an explicit file entry against the source directory
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.source_dir.join(path)
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if !self.source_dir.is_dir() {
            bail!(
                PathNotFound,
                "Source directory not found: {}",
                self.source_dir.display()
            );
        }

        ensure!(
            self.output_dir.is_dir(),
            PathNotFound,
            "Output directory not found: {}",
            self.output_dir.display()
        );

        if let FileSource::Explicit(files) = &self.file_source {
            ensure!(
                !files.is_empty(),
                Config,
                "Specific-file mode needs at least one file"
            );
        }

        Ok(())
    }
}
