//! Code generation command for `cargo xtask codegen`.
//!
//! Reads `codegen.toml` from the workspace root, generates a descriptor
//! table for each configured chip, and writes it to the chip's output path.

use anyhow::{Context, Result};
use std::path::Path;

use tempo_codegen::config::CodegenConfig;
use tempo_codegen::descriptors;

/// Runs the code generation pipeline.
///
/// With `check`, nothing is written and stale outputs are an error.
pub fn run_codegen(workspace_root: &Path, check: bool) -> Result<()> {
    let config_path = workspace_root.join("codegen.toml");
    let config_str = std::fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read {}", config_path.display()))?;
    let config: CodegenConfig =
        toml::from_str(&config_str).context("Failed to parse codegen.toml")?;

    let mut stale = Vec::new();
    for chip in &config.chips {
        println!("Generating descriptor table '{}'...", chip.name);

        let source = descriptors::generate(chip)
            .with_context(|| format!("Failed to generate chip '{}'", chip.name))?;
        let output_path = workspace_root.join(&chip.output);

        if check {
            let current = std::fs::read_to_string(&output_path).unwrap_or_default();
            if current != source {
                stale.push(chip.output.display().to_string());
            }
            continue;
        }

        if let Some(parent) = output_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
        std::fs::write(&output_path, source)
            .with_context(|| format!("Failed to write {}", output_path.display()))?;

        println!("  -> {}", chip.output.display());
    }

    if !stale.is_empty() {
        anyhow::bail!("Generated files are out of date: {}", stale.join(", "));
    }

    println!("Code generation complete.");
    Ok(())
}
