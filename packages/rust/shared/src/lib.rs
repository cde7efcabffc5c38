//! Shared error model and configuration for bookforge.
//!
//! This crate is the foundation depended on by all other bookforge crates.
//! It provides:
//! - [`BookforgeError`] — the unified error type
//! - Configuration ([`AppConfig`], [`BuildConfig`], config loading)

pub mod config;
pub mod error;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, BookConfig, BuildConfig, CONFIG_FILE_NAME, DESCRIPTOR_FILE_NAME, ToolsConfig,
    config_file_path, init_config, load_config, load_config_from,
};
pub use error::{BookforgeError, Result};
