//! Configuration loading from workspace metadata.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;

/// Tempo workspace metadata from Cargo.toml.
#[derive(Debug, Deserialize)]
struct TempoMetadata {
    /// Crates whose test suites run on the host.
    #[serde(rename = "host-test-crates")]
    host_test_crates: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct WorkspaceConfig {
    workspace: WorkspaceSection,
}

#[derive(Debug, Deserialize)]
struct WorkspaceSection {
    metadata: Option<MetadataSection>,
}

#[derive(Debug, Deserialize)]
struct MetadataSection {
    tempo: Option<TempoMetadata>,
}

/// Configuration for xtask commands.
#[derive(Debug, Clone)]
pub struct Config {
    /// Workspace root directory.
    pub workspace_root: PathBuf,
    /// Crates `cargo xtask test` runs by default.
    pub host_test_crates: Vec<String>,
}

impl Config {
    /// Load configuration from the workspace.
    pub fn load() -> Result<Self> {
        let workspace_root = find_workspace_root()?;
        let cargo_toml = workspace_root.join("Cargo.toml");
        let content = std::fs::read_to_string(&cargo_toml)
            .with_context(|| format!("Failed to read {}", cargo_toml.display()))?;

        let config: WorkspaceConfig =
            toml::from_str(&content).context("Failed to parse Cargo.toml")?;

        let host_test_crates = config
            .workspace
            .metadata
            .and_then(|m| m.tempo)
            .map(|t| t.host_test_crates)
            .context("Cargo.toml lacks [workspace.metadata.tempo] host-test-crates")?;

        Ok(Self {
            workspace_root,
            host_test_crates,
        })
    }
}

/// Find the workspace root by looking for Cargo.toml with [workspace].
fn find_workspace_root() -> Result<PathBuf> {
    let mut dir = std::env::current_dir().context("Failed to get current directory")?;

    loop {
        let cargo_toml = dir.join("Cargo.toml");
        if cargo_toml.exists() {
            let content = std::fs::read_to_string(&cargo_toml)?;
            if content.contains("[workspace]") {
                return Ok(dir);
            }
        }

        if !dir.pop() {
            anyhow::bail!("Could not find workspace root (no Cargo.toml with [workspace] found)");
        }
    }
}
