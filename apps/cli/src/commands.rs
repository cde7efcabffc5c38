//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use bookforge_core::pipeline::{self, BuildResult, ProgressReporter};
use bookforge_discovery::{DiscoverOptions, discover};
use bookforge_shared::{BuildConfig, init_config, load_config, load_config_from};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// bookforge — compile a markdown chapter tree into a single PDF.
#[derive(Parser)]
#[command(
    name = "bookforge",
    version,
    about = "Compile a tree of markdown chapters into a single rendered PDF.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Build the book: discover, convert, assemble, render.
    Build {
        /// Source root holding the chapter tree (defaults to the config's
        /// source_dir, then the current directory).
        dir: Option<PathBuf>,

        /// Build directory override (defaults to <source>/latex_build).
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Config file path (defaults to <source>/bookforge.toml).
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// List discovered chapters and their intermediate names in build order.
    List {
        /// Source root holding the chapter tree.
        dir: Option<PathBuf>,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Write a default bookforge.toml into the source root.
    Init {
        /// Source root to place the config in.
        dir: Option<PathBuf>,
    },
    /// Show resolved configuration.
    Show {
        /// Source root to resolve the config for.
        dir: Option<PathBuf>,
    },
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "bookforge=info",
        1 => "bookforge=debug",
        _ => "bookforge=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt().with_env_filter(env_filter).with_target(false).init();
        }
        LogFormat::Json => {
            fmt().json().with_env_filter(env_filter).init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Build { dir, out, config } => {
            cmd_build(dir.as_deref(), out.as_deref(), config.as_deref())
        }
        Command::List { dir } => cmd_list(dir.as_deref()),
        Command::Config { action } => match action {
            ConfigAction::Init { dir } => cmd_config_init(dir.as_deref()),
            ConfigAction::Show { dir } => cmd_config_show(dir.as_deref()),
        },
    }
}

/// Resolve the source root from an optional CLI path.
fn resolve_source_root(dir: Option<&Path>) -> Result<PathBuf> {
    let root = match dir {
        Some(d) => d.to_path_buf(),
        None => std::env::current_dir().map_err(|e| eyre!("cannot determine working directory: {e}"))?,
    };

    std::fs::canonicalize(&root)
        .map_err(|e| eyre!("source root '{}' is not readable: {e}", root.display()))
}

/// Resolve a configured `source_dir` to an absolute path.
///
/// Relative values resolve against the config file's directory when one was
/// given with `--config`, otherwise against the working directory.
fn resolve_configured_source_dir(source_dir: &str, config_path: Option<&Path>) -> Result<PathBuf> {
    let configured = PathBuf::from(source_dir);
    let resolved = match config_path.and_then(Path::parent) {
        Some(base) if configured.is_relative() => base.join(&configured),
        _ => configured,
    };

    std::fs::canonicalize(&resolved)
        .map_err(|e| eyre!("configured source_dir '{source_dir}' is not readable: {e}"))
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

fn cmd_build(dir: Option<&Path>, out: Option<&Path>, config_path: Option<&Path>) -> Result<()> {
    let source_root = resolve_source_root(dir)?;

    let config = match config_path {
        Some(path) => load_config_from(path)?,
        None => load_config(&source_root)?,
    };

    // When no directory was given on the command line, the config file's
    // source_dir wins over the cwd itself.
    let source_root = if dir.is_none() && config.book.source_dir != "." {
        resolve_configured_source_dir(&config.book.source_dir, config_path)?
    } else {
        source_root
    };

    let build_config = BuildConfig::resolve(&config, &source_root, out);

    info!(
        source = %build_config.source_root.display(),
        build_dir = %build_config.build_dir.display(),
        "building book"
    );

    let reporter = CliProgress::new();
    let result = pipeline::build(&build_config, &reporter)?;

    // Print summary
    println!();
    println!("  Book built successfully!");
    println!("  Chapters:   {}", result.chapter_count);
    println!("  Descriptor: {}", result.descriptor_path.display());
    println!("  Output:     {}", result.artifact_path.display());
    println!("  Time:       {:.1}s", result.elapsed.as_secs_f64());
    println!();

    Ok(())
}

fn cmd_list(dir: Option<&Path>) -> Result<()> {
    let source_root = resolve_source_root(dir)?;
    let config = load_config(&source_root)?;
    let build_config = BuildConfig::resolve(&config, &source_root, None);

    let opts = DiscoverOptions {
        exclude_dir: build_config.build_dir_name.clone(),
        exclude_path: std::fs::canonicalize(&build_config.build_dir).ok(),
        ..DiscoverOptions::default()
    };
    let chapters = discover(&source_root, &opts)?;

    println!("Found {} chapter(s) under {}", chapters.len(), source_root.display());
    for chapter in &chapters {
        println!("  {:<30} {}", chapter.tex_name, chapter.path.display());
    }

    Ok(())
}

fn cmd_config_init(dir: Option<&Path>) -> Result<()> {
    let source_root = resolve_source_root(dir)?;
    let path = init_config(&source_root)?;
    println!("Wrote default config to {}", path.display());
    Ok(())
}

fn cmd_config_show(dir: Option<&Path>) -> Result<()> {
    let source_root = resolve_source_root(dir)?;
    let config = load_config(&source_root)?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .expect("valid template")
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn chapter_converted(&self, path: &str, current: usize, total: usize) {
        self.spinner
            .set_message(format!("Converting [{current}/{total}] {path}"));
    }

    fn done(&self, _result: &BuildResult) {
        self.spinner.finish_and_clear();
    }
}
