//! Zone catalog loading errors.
//!
//! Every variant that involves a file carries its path.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading a zone catalog.
#[derive(Debug, Error)]
pub enum ZoneConfigError {
    /// The catalog file does not exist.
    #[error("zone catalog not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    /// YAML parsing failed.
    #[error("failed to parse YAML at {}: {source}", path.display())]
    YamlParse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    /// JSON parsing failed.
    #[error("failed to parse JSON at {}: {source}", path.display())]
    JsonParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// The file extension is neither YAML nor JSON.
    #[error("unsupported zone catalog format at {}: expected .yaml, .yml or .json", path.display())]
    UnsupportedFormat { path: PathBuf },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias for catalog results.
pub type ZoneConfigResult<T> = Result<T, ZoneConfigError>;
