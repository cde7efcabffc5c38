//! Document descriptor assembler.
//!
//! Writes the top-level `main.tex` referencing the static preamble and title
//! page, a table-of-contents directive, and every intermediate chapter file
//! in discovery order. The descriptor is fully rewritten on every build.
//!
//! Referenced static files are deliberately not checked for existence here;
//! a missing preamble or title page surfaces at render time.

use std::path::{Path, PathBuf};

use tracing::{info, instrument};

use bookforge_discovery::ChapterFile;
use bookforge_shared::{BookforgeError, BuildConfig, Result};

/// Output from a successful descriptor assembly.
#[derive(Debug, Clone)]
pub struct AssembleResult {
    /// Path of the written descriptor.
    pub descriptor_path: PathBuf,
    /// Number of chapter inclusions emitted.
    pub chapter_count: usize,
}

/// Assemble and write the document descriptor.
///
/// All inclusions use bare file names: every referenced file lives in the
/// build directory the typesetting engine runs from.
#[instrument(skip_all, fields(chapters = chapters.len()))]
pub fn write_descriptor(config: &BuildConfig, chapters: &[ChapterFile]) -> Result<AssembleResult> {
    let content = descriptor_content(config, chapters);

    std::fs::write(&config.descriptor_path, content)
        .map_err(|e| BookforgeError::io(&config.descriptor_path, e))?;

    info!(
        path = %config.descriptor_path.display(),
        chapters = chapters.len(),
        "descriptor written"
    );

    Ok(AssembleResult {
        descriptor_path: config.descriptor_path.clone(),
        chapter_count: chapters.len(),
    })
}

/// Render the descriptor body as a string.
fn descriptor_content(config: &BuildConfig, chapters: &[ChapterFile]) -> String {
    let mut doc = String::new();

    doc.push_str("\\documentclass[12pt, a4paper]{report}\n");
    doc.push_str(&format!("\\input{{{}}}\n", base_name(&config.preamble_path)));
    doc.push_str("\\begin{document}\n");
    doc.push_str(&format!(
        "\\input{{{}}}\n",
        base_name(&config.titlepage_path)
    ));
    doc.push_str("\\tableofcontents\n");
    doc.push_str("\\newpage\n");

    for chapter in chapters {
        doc.push_str(&format!("\\input{{{}}}\n", chapter.tex_name));
    }

    doc.push_str("\\end{document}\n");
    doc
}

fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
