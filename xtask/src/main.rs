//! Build automation for the Tempo workspace.
//!
//! Usage:
//!   cargo xtask codegen          - Regenerate chip descriptor tables from codegen.toml
//!   cargo xtask test             - Run host unit and integration tests
//!   cargo xtask test --loom      - Also run the loom model checks
//!   cargo xtask test -p <crate>  - Test a single crate

mod codegen;
mod config;
mod test;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::config::Config;

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Build automation for the Tempo timer workspace")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run code generators from codegen.toml
    Codegen {
        /// Fail instead of writing if a generated file is out of date
        #[arg(long)]
        check: bool,
    },

    /// Run host tests
    Test {
        /// Package to test (default: every host-testable crate)
        #[arg(short, long)]
        package: Option<String>,

        /// Also run the loom model checks (`--cfg loom`)
        #[arg(long)]
        loom: bool,

        /// Extra arguments passed after -- (forwarded to the test binaries)
        #[arg(last = true)]
        extra_args: Vec<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Commands::Codegen { check } => codegen::run_codegen(&config.workspace_root, check)?,
        Commands::Test {
            package,
            loom,
            extra_args,
        } => test::run_tests(&config, package.as_deref(), loom, &extra_args)?,
    }

    Ok(())
}
