//! bookforge CLI — build a PDF book from a tree of markdown chapters.
//!
//! Discovers chapter files, converts them to LaTeX via pandoc, assembles a
//! top-level descriptor, and renders it with a two-pass LaTeX run.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli)
}
