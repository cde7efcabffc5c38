//! Markdown-to-LaTeX conversion via the external pandoc process.
//!
//! Each chapter is normalized ([`normalize_chapter_headings`]), written to a
//! temporary copy next to the source, and handed to pandoc. The temporary
//! copy is removed when the guard drops, whether the conversion succeeded
//! or not.

mod headings;

use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, instrument, warn};

pub use headings::normalize_chapter_headings;

use bookforge_shared::{BookforgeError, Result};

/// Suffix appended to the source file name for the temporary normalized copy.
const TEMP_SUFFIX: &str = ".temp";

/// Options for the pandoc invocation.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Converter command (usually `pandoc`).
    pub pandoc_cmd: String,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            pandoc_cmd: "pandoc".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Temporary normalized copy
// ---------------------------------------------------------------------------

/// Scoped temporary copy of a chapter with normalized headings.
///
/// Deleted on drop, so the copy never outlives the conversion attempt.
struct TempCopy {
    path: PathBuf,
}

impl TempCopy {
    /// Write `content` next to `source` with the temp suffix appended.
    fn write(source: &Path, content: &str) -> Result<Self> {
        let mut name = source
            .file_name()
            .map(|n| n.to_os_string())
            .ok_or_else(|| {
                BookforgeError::convert(format!(
                    "source path has no file name: {}",
                    source.display()
                ))
            })?;
        name.push(TEMP_SUFFIX);

        let path = source.with_file_name(name);
        std::fs::write(&path, content).map_err(|e| BookforgeError::io(&path, e))?;

        Ok(Self { path })
    }
}

impl Drop for TempCopy {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            warn!(path = %self.path.display(), error = %e, "failed to remove temp copy");
        }
    }
}

// ---------------------------------------------------------------------------
// Conversion
// ---------------------------------------------------------------------------

/// Convert one chapter source to a LaTeX intermediate file at `output`.
///
/// Top-level markdown headings become `\chapter` divisions and code blocks
/// are rendered as listings. A non-zero pandoc exit is fatal for the build.
#[instrument(skip(opts), fields(source = %source.display()))]
pub fn convert_chapter(source: &Path, output: &Path, opts: &ConvertOptions) -> Result<()> {
    let content = std::fs::read_to_string(source).map_err(|e| BookforgeError::io(source, e))?;
    let normalized = normalize_chapter_headings(&content);

    let temp = TempCopy::write(source, &normalized)?;

    let status = Command::new(&opts.pandoc_cmd)
        .arg(&temp.path)
        .arg("-o")
        .arg(output)
        .arg("--top-level-division=chapter")
        .arg("--listings")
        .status()
        .map_err(|e| {
            BookforgeError::convert(format!(
                "failed to spawn converter: {e}. Is `{}` installed?",
                opts.pandoc_cmd
            ))
        })?;

    if !status.success() {
        return Err(BookforgeError::convert(format!(
            "`{}` exited with {status} converting {}",
            opts.pandoc_cmd,
            source.display()
        )));
    }

    debug!(output = %output.display(), "chapter converted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_source(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    fn temp_copy_of(source: &Path) -> PathBuf {
        let mut name = source.file_name().unwrap().to_os_string();
        name.push(TEMP_SUFFIX);
        source.with_file_name(name)
    }

    #[test]
    fn temp_copy_removed_on_drop() {
        let tmp = tempfile::tempdir().unwrap();
        let source = write_source(tmp.path(), "01.md", "# Chapter 1: Intro");

        let copy_path = {
            let copy = TempCopy::write(&source, "# Intro").unwrap();
            assert!(copy.path.exists());
            copy.path.clone()
        };

        assert!(!copy_path.exists());
        assert!(source.exists());
    }

    #[test]
    fn convert_succeeds_and_cleans_up() {
        let tmp = tempfile::tempdir().unwrap();
        let source = write_source(tmp.path(), "01.md", "# Chapter 1: Intro\n\nBody.");
        let output = tmp.path().join("01.tex");

        let opts = ConvertOptions {
            pandoc_cmd: "true".to_string(),
        };
        convert_chapter(&source, &output, &opts).unwrap();

        assert!(!temp_copy_of(&source).exists());
    }

    #[test]
    fn converter_failure_is_fatal_and_cleans_up() {
        let tmp = tempfile::tempdir().unwrap();
        let source = write_source(tmp.path(), "01.md", "# Chapter 1: Intro");
        let output = tmp.path().join("01.tex");

        let opts = ConvertOptions {
            pandoc_cmd: "false".to_string(),
        };
        let err = convert_chapter(&source, &output, &opts).unwrap_err();

        assert!(matches!(err, BookforgeError::Convert(_)));
        assert!(!temp_copy_of(&source).exists());
    }

    #[test]
    fn missing_converter_is_fatal_and_cleans_up() {
        let tmp = tempfile::tempdir().unwrap();
        let source = write_source(tmp.path(), "01.md", "# Chapter 1: Intro");
        let output = tmp.path().join("01.tex");

        let opts = ConvertOptions {
            pandoc_cmd: "bookforge-no-such-converter".to_string(),
        };
        let err = convert_chapter(&source, &output, &opts).unwrap_err();

        assert!(matches!(err, BookforgeError::Convert(_)));
        assert!(!temp_copy_of(&source).exists());
    }

    #[test]
    fn source_never_mutated_in_place() {
        let tmp = tempfile::tempdir().unwrap();
        let original = "# Chapter 1: Intro\n\nBody.";
        let source = write_source(tmp.path(), "01.md", original);
        let output = tmp.path().join("01.tex");

        let opts = ConvertOptions {
            pandoc_cmd: "true".to_string(),
        };
        convert_chapter(&source, &output, &opts).unwrap();

        assert_eq!(std::fs::read_to_string(&source).unwrap(), original);
    }
}
