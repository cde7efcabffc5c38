//! Build configuration for bookforge.
//!
//! User config lives at `<source root>/bookforge.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{BookforgeError, Result};

/// Default configuration file name, looked up in the source root.
pub const CONFIG_FILE_NAME: &str = "bookforge.toml";

/// File name of the assembled top-level document descriptor.
pub const DESCRIPTOR_FILE_NAME: &str = "main.tex";

// ---------------------------------------------------------------------------
// Config structs (matching bookforge.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Book layout settings.
    #[serde(default)]
    pub book: BookConfig,

    /// External tool commands.
    #[serde(default)]
    pub tools: ToolsConfig,
}

/// `[book]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookConfig {
    /// Source root holding the chapter tree.
    #[serde(default = "default_source_dir")]
    pub source_dir: String,

    /// Build directory name, created beneath the source root.
    #[serde(default = "default_build_dir")]
    pub build_dir: String,

    /// Static preamble file name inside the build directory.
    #[serde(default = "default_preamble")]
    pub preamble: String,

    /// Static title-page file name inside the build directory.
    #[serde(default = "default_titlepage")]
    pub titlepage: String,

    /// File name of the rendered PDF.
    #[serde(default = "default_output_name")]
    pub output_name: String,
}

impl Default for BookConfig {
    fn default() -> Self {
        Self {
            source_dir: default_source_dir(),
            build_dir: default_build_dir(),
            preamble: default_preamble(),
            titlepage: default_titlepage(),
            output_name: default_output_name(),
        }
    }
}

fn default_source_dir() -> String {
    ".".into()
}
fn default_build_dir() -> String {
    "latex_build".into()
}
fn default_preamble() -> String {
    "preamble.tex".into()
}
fn default_titlepage() -> String {
    "titlepage.tex".into()
}
fn default_output_name() -> String {
    "book.pdf".into()
}

/// `[tools]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsConfig {
    /// Markdown-to-LaTeX converter command.
    #[serde(default = "default_pandoc")]
    pub pandoc: String,

    /// Typesetting engine command.
    #[serde(default = "default_latex")]
    pub latex: String,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            pandoc: default_pandoc(),
            latex: default_latex(),
        }
    }
}

fn default_pandoc() -> String {
    "pandoc".into()
}
fn default_latex() -> String {
    "xelatex".into()
}

// ---------------------------------------------------------------------------
// Build config (runtime, merged from config + CLI flags)
// ---------------------------------------------------------------------------

/// Fully resolved runtime configuration — merged from config file + CLI flags.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Absolute source root to discover chapters beneath.
    pub source_root: PathBuf,
    /// Build directory for intermediate files, descriptor, and output.
    pub build_dir: PathBuf,
    /// Configured build-directory name, excluded from discovery at any
    /// depth. Stays the configured name even when `build_dir` is overridden
    /// to another location, so the override's base name cannot shadow a
    /// content directory.
    pub build_dir_name: String,
    /// Path to the static preamble file.
    pub preamble_path: PathBuf,
    /// Path to the static title-page file.
    pub titlepage_path: PathBuf,
    /// Path to the document descriptor (`main.tex`).
    pub descriptor_path: PathBuf,
    /// File name of the rendered PDF inside the build directory.
    pub output_name: String,
    /// Converter command.
    pub pandoc_cmd: String,
    /// Typesetting engine command.
    pub latex_cmd: String,
}

impl BuildConfig {
    /// Resolve a runtime config from a file config, a source root, and an
    /// optional build-directory override from the CLI.
    pub fn resolve(
        config: &AppConfig,
        source_root: &Path,
        build_dir_override: Option<&Path>,
    ) -> Self {
        let build_dir = match build_dir_override {
            Some(dir) => dir.to_path_buf(),
            None => source_root.join(&config.book.build_dir),
        };

        let build_dir_name = Path::new(&config.book.build_dir)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| config.book.build_dir.clone());

        Self {
            source_root: source_root.to_path_buf(),
            preamble_path: build_dir.join(&config.book.preamble),
            titlepage_path: build_dir.join(&config.book.titlepage),
            descriptor_path: build_dir.join(DESCRIPTOR_FILE_NAME),
            output_name: config.book.output_name.clone(),
            pandoc_cmd: config.tools.pandoc.clone(),
            latex_cmd: config.tools.latex.clone(),
            build_dir,
            build_dir_name,
        }
    }

    /// Path the rendered PDF is expected at after a successful build.
    pub fn artifact_path(&self) -> PathBuf {
        self.build_dir.join(&self.output_name)
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Path of the config file inside a source root.
pub fn config_file_path(source_root: &Path) -> PathBuf {
    source_root.join(CONFIG_FILE_NAME)
}

/// Load the config for a source root. Returns defaults if the file does not exist.
pub fn load_config(source_root: &Path) -> Result<AppConfig> {
    let path = config_file_path(source_root);

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| BookforgeError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| BookforgeError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Write a default config file into the source root.
/// Returns the path to the created file.
pub fn init_config(source_root: &Path) -> Result<PathBuf> {
    let path = config_file_path(source_root);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| BookforgeError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| BookforgeError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}
