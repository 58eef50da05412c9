//! Host test execution.
//!
//! Every crate in the workspace builds for the host: register access goes
//! through `tempo-mmio`'s simulated bus, so no target hardware is needed.

use crate::config::Config;
use anyhow::Result;
use xshell::{Shell, cmd};

/// Crates with loom model checks, and the test target that holds them.
const LOOM_TESTS: &[(&str, &str)] = &[("tempo-timer", "loom_registry")];

/// Run host tests for one package or every host-testable crate.
pub fn run_tests(
    config: &Config,
    package: Option<&str>,
    loom: bool,
    extra_args: &[String],
) -> Result<()> {
    let sh = Shell::new()?;
    sh.change_dir(&config.workspace_root);

    let crates: Vec<&str> = match package {
        Some(p) => vec![p],
        None => config.host_test_crates.iter().map(String::as_str).collect(),
    };

    println!("Running host tests...");
    for crate_name in &crates {
        println!("  Testing {crate_name}...");
        cmd!(sh, "cargo test -p {crate_name} -- {extra_args...}")
            .run()
            .map_err(|e| anyhow::anyhow!("cargo test -p {crate_name} failed: {e}"))?;
    }

    if loom {
        for (crate_name, test) in LOOM_TESTS {
            if !crates.contains(crate_name) {
                continue;
            }
            println!("  Model checking {crate_name} ({test})...");
            cmd!(sh, "cargo test -p {crate_name} --release --test {test}")
                .env("RUSTFLAGS", "--cfg loom")
                .run()
                .map_err(|e| anyhow::anyhow!("loom check {crate_name}/{test} failed: {e}"))?;
        }
    }

    println!("All host tests passed.");
    Ok(())
}
