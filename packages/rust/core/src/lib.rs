//! Core build orchestration for bookforge.
//!
//! Ties together chapter discovery, markdown-to-LaTeX conversion, descriptor
//! assembly, and the two-pass typesetting render into the end-to-end `build`
//! workflow.

pub mod assembler;
pub mod pipeline;
pub mod render;
