//! Error types for bookforge.
//!
//! Library crates use [`BookforgeError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all bookforge operations.
#[derive(Debug, thiserror::Error)]
pub enum BookforgeError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Input validation error (e.g., colliding intermediate file names).
    #[error("validation error: {message}")]
    Validation { message: String },

    /// Markdown-to-LaTeX conversion error (pandoc spawn or non-zero exit).
    #[error("conversion error: {0}")]
    Convert(String),

    /// Typesetting error (LaTeX engine spawn or non-zero exit).
    #[error("render error: {0}")]
    Render(String),
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, BookforgeError>;

impl BookforgeError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a conversion error from any displayable message.
    pub fn convert(msg: impl Into<String>) -> Self {
        Self::Convert(msg.into())
    }

    /// Create a render error from any displayable message.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formatting() {
        let err = BookforgeError::config("missing source directory");
        assert_eq!(err.to_string(), "config error: missing source directory");

        let err = BookforgeError::validation("duplicate intermediate name part1_01.tex");
        assert!(err.to_string().contains("part1_01.tex"));
    }

    #[test]
    fn io_error_includes_path() {
        let inner = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = BookforgeError::io("/tmp/book/ch01.md", inner);
        assert!(err.to_string().contains("ch01.md"));
    }
}
