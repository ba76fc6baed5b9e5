//! Errors for the fallible boundary of the core.
//!
//! The simulation itself never fails: bad colors, double collapses and
//! unknown contacts degrade silently. Only loading level and config data can
//! fail, and those paths return [`FieldResult`].

use std::fmt;
use std::path::PathBuf;

/// Top-level error enum for level and config loading.
#[derive(Debug)]
pub enum FieldError {
    /// Level JSON could not be parsed into a layout.
    LevelParse(serde_json::Error),

    /// Config JSON could not be parsed.
    ConfigParse(serde_json::Error),

    /// A level or config file could not be read.
    Io {
        /// File that was being read.
        path: PathBuf,
        source: std::io::Error,
    },
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldError::LevelParse(err) => write!(f, "invalid level layout: {}", err),
            FieldError::ConfigParse(err) => write!(f, "invalid field config: {}", err),
            FieldError::Io { path, source } => {
                write!(f, "failed to read '{}': {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for FieldError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FieldError::LevelParse(err) | FieldError::ConfigParse(err) => Some(err),
            FieldError::Io { source, .. } => Some(source),
        }
    }
}

/// Convenience alias: a `Result` using `FieldError` as the error type.
pub type FieldResult<T> = Result<T, FieldError>;
