//! End-to-end `build` pipeline: discover → convert → assemble → render.
//!
//! Fully sequential and single-threaded: every external process blocks the
//! pipeline until it exits, and the first failure is terminal for the run.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use tracing::{info, instrument};

use bookforge_convert::ConvertOptions;
use bookforge_discovery::{DiscoverOptions, check_collisions, discover};
use bookforge_shared::{BookforgeError, BuildConfig, Result};

use crate::{assembler, render};

/// Result of a successful build.
#[derive(Debug, Clone)]
pub struct BuildResult {
    /// Path of the written document descriptor.
    pub descriptor_path: PathBuf,
    /// Expected path of the rendered PDF.
    pub artifact_path: PathBuf,
    /// Number of chapters converted and included.
    pub chapter_count: usize,
    /// Total elapsed time.
    pub elapsed: Duration,
}

/// Progress callback for reporting pipeline status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called when a chapter has been converted.
    fn chapter_converted(&self, path: &str, current: usize, total: usize);
    /// Called when the pipeline completes.
    fn done(&self, result: &BuildResult);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn chapter_converted(&self, _path: &str, _current: usize, _total: usize) {}
    fn done(&self, _result: &BuildResult) {}
}

/// Run the full build pipeline.
///
/// 1. Create the build directory if absent
/// 2. Discover chapter sources (lexicographic order)
/// 3. Reject intermediate-name collisions up front
/// 4. Convert each chapter via pandoc
/// 5. Assemble the descriptor
/// 6. Render twice via the LaTeX engine
#[instrument(skip_all, fields(source = %config.source_root.display()))]
pub fn build(config: &BuildConfig, progress: &dyn ProgressReporter) -> Result<BuildResult> {
    let start = Instant::now();

    info!(
        source = %config.source_root.display(),
        build_dir = %config.build_dir.display(),
        "starting build"
    );

    std::fs::create_dir_all(&config.build_dir)
        .map_err(|e| BookforgeError::io(&config.build_dir, e))?;

    // --- Phase 1: Discovery ---
    progress.phase("Discovering chapters");
    let discover_opts = DiscoverOptions {
        exclude_dir: config.build_dir_name.clone(),
        // The build dir may live inside the source tree under another name
        // (e.g. via --out), so it is also pruned by path.
        exclude_path: std::fs::canonicalize(&config.build_dir).ok(),
        ..DiscoverOptions::default()
    };
    let chapters = discover(&config.source_root, &discover_opts)?;

    info!(count = chapters.len(), "chapters found");
    check_collisions(&chapters)?;

    // --- Phase 2: Convert chapters ---
    progress.phase("Converting chapters");
    let convert_opts = ConvertOptions {
        pandoc_cmd: config.pandoc_cmd.clone(),
    };
    let total = chapters.len();

    for (i, chapter) in chapters.iter().enumerate() {
        let output = config.build_dir.join(&chapter.tex_name);
        info!(chapter = %chapter.path.display(), "converting");
        bookforge_convert::convert_chapter(&chapter.path, &output, &convert_opts)?;
        progress.chapter_converted(&chapter.path.display().to_string(), i + 1, total);
    }

    // --- Phase 3: Assemble descriptor ---
    progress.phase("Assembling descriptor");
    let assembled = assembler::write_descriptor(config, &chapters)?;

    // --- Phase 4: Render ---
    progress.phase("Rendering PDF");
    let artifact_path = render::render(config)?;

    let result = BuildResult {
        descriptor_path: assembled.descriptor_path,
        artifact_path,
        chapter_count: total,
        elapsed: start.elapsed(),
    };

    info!(
        chapters = result.chapter_count,
        elapsed_s = result.elapsed.as_secs_f64(),
        "build complete"
    );

    progress.done(&result);
    Ok(result)
}
