use anyhow::Context;
use clap::Parser;
use std::process::ExitCode;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

use create_playwright::cli::{Cli, LogLevel};
use create_playwright::prompt::TerminalPrompt;
use create_playwright::runner::ProcessRunner;
use create_playwright::Generator;

/// RUST_LOG wins over --log-level when set
fn initialize_tracing(log_level: LogLevel) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.to_filter_directive()));

    // stdout carries the scaffold's own output
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let cwd = std::env::current_dir().context("Failed to read the current directory")?;
    let generator = Generator::new(cli, cwd);
    debug!(root = %generator.root().display(), "Starting scaffold");

    let mut prompt = TerminalPrompt::stdio();
    generator
        .run(&mut prompt, &ProcessRunner)
        .await
        .with_context(|| format!("Failed to set up Playwright in {}", generator.root().display()))?;
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    initialize_tracing(cli.log_level);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            eprintln!("Error: {e:#}");
            ExitCode::from(1)
        }
    }
}
