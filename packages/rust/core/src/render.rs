//! Two-pass typesetting render.
//!
//! Invokes the LaTeX engine against the descriptor twice from the build
//! directory: the first pass records cross-reference targets, the second
//! resolves the table of contents against them. Either pass failing aborts
//! the build.

use std::path::PathBuf;
use std::process::Command;

use tracing::{info, instrument};

use bookforge_shared::{BookforgeError, BuildConfig, Result};

/// Number of engine passes required to resolve the table of contents.
const RENDER_PASSES: u32 = 2;

/// Render the assembled descriptor into the final PDF.
///
/// Returns the expected artifact path. No existence check is performed
/// beyond what the engine's exit status guarantees.
#[instrument(skip_all, fields(descriptor = %config.descriptor_path.display()))]
pub fn render(config: &BuildConfig) -> Result<PathBuf> {
    for pass in 1..=RENDER_PASSES {
        run_pass(config, pass)?;
    }

    let artifact = config.artifact_path();
    info!(artifact = %artifact.display(), "render complete");
    Ok(artifact)
}

/// Run one engine pass, blocking until it exits.
fn run_pass(config: &BuildConfig, pass: u32) -> Result<()> {
    let descriptor_name = config
        .descriptor_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    info!(pass, cmd = %config.latex_cmd, "running typesetting pass");

    let status = Command::new(&config.latex_cmd)
        .arg("-interaction=nonstopmode")
        .arg(&descriptor_name)
        .current_dir(&config.build_dir)
        .status()
        .map_err(|e| {
            BookforgeError::render(format!(
                "failed to spawn typesetting engine: {e}. Is `{}` installed?",
                config.latex_cmd
            ))
        })?;

    if !status.success() {
        return Err(BookforgeError::render(format!(
            "`{}` exited with {status} on pass {pass}",
            config.latex_cmd
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::os::unix::fs::PermissionsExt;
    use std::path::Path;

    use bookforge_shared::AppConfig;

    /// Stand-in engine script so tests can observe each invocation.
    fn write_engine_script(dir: &Path, body: &str) -> PathBuf {
        let path = dir.join("engine.sh");
        std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        let mut perms = std::fs::metadata(&path).unwrap().permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(&path, perms).unwrap();
        path
    }

    fn make_config(root: &std::path::Path, latex_cmd: &str) -> BuildConfig {
        let mut app = AppConfig::default();
        app.tools.latex = latex_cmd.to_string();
        let config = BuildConfig::resolve(&app, root, None);
        std::fs::create_dir_all(&config.build_dir).unwrap();
        config
    }

    #[test]
    fn render_returns_artifact_path() {
        let tmp = tempfile::tempdir().unwrap();
        let config = make_config(tmp.path(), "true");

        let artifact = render(&config).unwrap();
        assert_eq!(artifact, config.build_dir.join("book.pdf"));
    }

    #[test]
    fn render_runs_exactly_two_passes() {
        let tmp = tempfile::tempdir().unwrap();
        let script = write_engine_script(tmp.path(), "echo pass >> passes.log");
        let config = make_config(tmp.path(), script.to_str().unwrap());

        render(&config).unwrap();

        // The script runs from the build dir, so the log lands there.
        let log = std::fs::read_to_string(config.build_dir.join("passes.log")).unwrap();
        assert_eq!(log.lines().count(), 2);
    }

    #[test]
    fn second_pass_failure_is_fatal() {
        let tmp = tempfile::tempdir().unwrap();
        let script = write_engine_script(
            tmp.path(),
            "if [ -f passes.log ]; then exit 1; fi\necho pass >> passes.log",
        );
        let config = make_config(tmp.path(), script.to_str().unwrap());

        let err = render(&config).unwrap_err();
        assert!(matches!(err, BookforgeError::Render(_)));
        assert!(err.to_string().contains("pass 2"));
    }

    #[test]
    fn engine_failure_is_fatal() {
        let tmp = tempfile::tempdir().unwrap();
        let config = make_config(tmp.path(), "false");

        let err = render(&config).unwrap_err();
        assert!(matches!(err, BookforgeError::Render(_)));
        assert!(err.to_string().contains("pass 1"));
    }

    #[test]
    fn missing_engine_is_fatal() {
        let tmp = tempfile::tempdir().unwrap();
        let config = make_config(tmp.path(), "bookforge-no-such-engine");

        let err = render(&config).unwrap_err();
        assert!(matches!(err, BookforgeError::Render(_)));
    }
}
