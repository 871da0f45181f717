//! Global error handling for srcdump
//!
//! Only run-level failures live here. Problems with a single file are
//! recorded inline in the dump as a [`crate::types::FileOutcome`] and never
//! surface as an `ExportError`.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Global error type for export runs
#[derive(Error, Debug)]
pub enum ExportError {
    /// File system errors (including failures writing the dump)
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The output artifact could not be created
    #[error("Cannot create output file {}: {source}", path.display())]
    CreateOutput {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A directory could not be enumerated
    #[error("Failed to walk {}: {source}", path.display())]
    Traversal {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Path not found
    #[error("Path not found: {0}")]
    PathNotFound(String),

    /// Invalid argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Specialized Result type for export operations
pub type Result<T> = std::result::Result<T, ExportError>;

impl From<walkdir::Error> for ExportError {
    fn from(err: walkdir::Error) -> Self {
        let path = err.path().map(PathBuf::from).unwrap_or_default();
        let source = err
            .into_io_error()
            .unwrap_or_else(|| io::Error::other("filesystem loop detected"));
        ExportError::Traversal { path, source }
    }
}

/// Creates an ExportError with a formatted message
#[macro_export]
macro_rules! error {
    ($error_type:ident, $($arg:tt)*) => {
        $crate::error::ExportError::$error_type(format!($($arg)*))
    };
}

/// Returns an error result with a formatted message
#[macro_export]
macro_rules! bail {
    ($error_type:ident, $($arg:tt)*) => {
        return Err($crate::error!($error_type, $($arg)*))
    };
}

/// Ensures a condition is true, otherwise returns an error
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $error_type:ident, $($arg:tt)*) => {
        if !($cond) {
            $crate::bail!($error_type, $($arg)*)
        }
    };
}

// Lets the binary keep an io::Result main
impl From<ExportError> for io::Error {
    fn from(err: ExportError) -> Self {
        match err {
            ExportError::Io(e) => e,
            other => io::Error::other(other.to_string()),
        }
    }
}
