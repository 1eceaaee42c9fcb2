//! Error types for the module outliner.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our custom error.
pub type Result<T> = std::result::Result<T, OutlineError>;

/// Errors that can occur while loading modules, configuring or exporting outlines.
///
/// Parsing bullets never fails; these cover the I/O and configuration edges.
#[derive(Error, Debug)]
pub enum OutlineError {
    /// Error reading or writing files.
    #[error("I/O error for path '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error during serialization/deserialization.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The module file does not exist, or the catalog has no module with that id/title.
    #[error("Module not found: {0}")]
    ModuleNotFound(String),

    /// No saved outline or layout at this path.
    #[error("Outline not found: '{0}'")]
    OutlineNotFound(PathBuf),

    /// A catalog file parsed fine but contained no modules.
    #[error("No modules found in '{0}'")]
    EmptyCatalog(PathBuf),

    /// The file extension is not one we know how to read.
    #[error("Unsupported module format for '{0}' (expected .txt, .md, .json, .yaml or .yml)")]
    UnsupportedFormat(PathBuf),

    /// Configuration file or value error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The PDF backend failed to build the document.
    #[error("PDF rendering failed: {0}")]
    Render(String),

    /// A dotted key that could not be built from its text.
    #[error("Invalid dotted key '{0}'")]
    InvalidKey(String),
}

impl OutlineError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<serde_json::Error> for OutlineError {
    fn from(err: serde_json::Error) -> Self {
        OutlineError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for OutlineError {
    fn from(err: serde_yaml::Error) -> Self {
        OutlineError::Serialization(err.to_string())
    }
}
