//! Build-time code generation for Tempo chip crates.
//!
//! Reads chip descriptions from `codegen.toml` and emits `no_std` Rust
//! source containing each chip's static timer descriptor table.

pub mod config;
pub mod descriptors;
pub mod error;

/// Most timers a generated table may hold (the driver's bitmap width).
pub const MAX_TIMERS: usize = 32;
