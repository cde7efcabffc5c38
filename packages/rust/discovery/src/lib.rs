//! Chapter source discovery.
//!
//! Walks the source root for markdown chapter files, excluding the build
//! directory at any depth and the hand-maintained table-of-contents file,
//! and returns them in deterministic full-path lexicographic order. Each
//! discovered chapter carries the intermediate `.tex` file name it will be
//! converted into.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};
use walkdir::WalkDir;

use bookforge_shared::{BookforgeError, Result};

/// Source file extension recognized as a chapter.
const SOURCE_EXTENSION: &str = ".md";

/// File name excluded from discovery (maintained by hand, not a chapter).
const TOC_FILE_NAME: &str = "TABLE_OF_CONTENTS.md";

/// Extension of intermediate files produced by conversion.
const INTERMEDIATE_EXTENSION: &str = "tex";

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// A discovered chapter source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterFile {
    /// Full path to the markdown source.
    pub path: PathBuf,
    /// Name of the intermediate `.tex` file this chapter converts into,
    /// unique across the flat build directory.
    pub tex_name: String,
}

/// Configuration for the discovery walk.
#[derive(Debug, Clone)]
pub struct DiscoverOptions {
    /// Directory name pruned from the walk at any depth.
    pub exclude_dir: String,
    /// File name skipped even when it carries the source extension.
    pub exclude_file: String,
    /// Exact directory path pruned from the walk, in addition to the name
    /// exclusion. Used for a build directory relocated into the source tree
    /// under a name other than `exclude_dir`.
    pub exclude_path: Option<PathBuf>,
}

impl Default for DiscoverOptions {
    fn default() -> Self {
        Self {
            exclude_dir: "latex_build".to_string(),
            exclude_file: TOC_FILE_NAME.to_string(),
            exclude_path: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Discovery
// ---------------------------------------------------------------------------

/// Discover all chapter sources beneath `source_root`.
///
/// The result is sorted lexicographically by full path, independent of
/// filesystem iteration order; this order determines final document order.
/// An empty result is valid (the book simply has no chapters yet).
#[instrument(skip_all, fields(root = %source_root.display()))]
pub fn discover(source_root: &Path, opts: &DiscoverOptions) -> Result<Vec<ChapterFile>> {
    let mut paths: Vec<PathBuf> = Vec::new();

    let walker = WalkDir::new(source_root).into_iter().filter_entry(|e| {
        if !e.file_type().is_dir() {
            return true;
        }
        if e.file_name() == opts.exclude_dir.as_str() {
            return false;
        }
        opts.exclude_path.as_deref() != Some(e.path())
    });

    for entry in walker {
        let entry = entry.map_err(|e| {
            let path = e
                .path()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| source_root.to_path_buf());
            BookforgeError::io(path, e.into())
        })?;

        if !entry.file_type().is_file() {
            continue;
        }

        let name = entry.file_name().to_string_lossy();
        if !name.ends_with(SOURCE_EXTENSION) || name == opts.exclude_file {
            continue;
        }

        paths.push(entry.into_path());
    }

    paths.sort();

    let chapters: Vec<ChapterFile> = paths
        .into_iter()
        .map(|path| {
            let tex_name = intermediate_name(source_root, &path);
            debug!(path = %path.display(), tex_name, "discovered chapter");
            ChapterFile { path, tex_name }
        })
        .collect();

    info!(count = chapters.len(), "chapter discovery complete");

    Ok(chapters)
}

/// Fail if two discovered chapters map to the same intermediate file name.
///
/// A collision would make one chapter's converted output silently overwrite
/// another's in the flat build directory, so it is rejected up front.
pub fn check_collisions(chapters: &[ChapterFile]) -> Result<()> {
    let mut by_name: BTreeMap<&str, Vec<&Path>> = BTreeMap::new();
    for chapter in chapters {
        by_name
            .entry(chapter.tex_name.as_str())
            .or_default()
            .push(chapter.path.as_path());
    }

    let collisions: Vec<String> = by_name
        .into_iter()
        .filter(|(_, sources)| sources.len() > 1)
        .map(|(name, sources)| {
            let list = sources
                .iter()
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(", ");
            format!("'{name}' produced by {list}")
        })
        .collect();

    if collisions.is_empty() {
        return Ok(());
    }

    Err(BookforgeError::validation(format!(
        "colliding intermediate file names: {}",
        collisions.join("; ")
    )))
}

// ---------------------------------------------------------------------------
// Intermediate naming
// ---------------------------------------------------------------------------

/// Derive the intermediate file name for a chapter source.
///
/// `<parent-dir>_<stem>.tex`, or bare `<stem>.tex` when the parent directory
/// name equals the source root's own name (i.e., the file sits at the root).
fn intermediate_name(source_root: &Path, path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let parent = path
        .parent()
        .and_then(Path::file_name)
        .map(|s| s.to_string_lossy().into_owned());
    let root_name = source_root
        .file_name()
        .map(|s| s.to_string_lossy().into_owned());

    match parent {
        Some(parent) if Some(&parent) != root_name.as_ref() => {
            format!("{parent}_{stem}.{INTERMEDIATE_EXTENSION}")
        }
        _ => format!("{stem}.{INTERMEDIATE_EXTENSION}"),
    }
}
