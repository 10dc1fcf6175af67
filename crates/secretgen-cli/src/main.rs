//! secretgen CLI entry point.

use anyhow::{Context as _, Result};
use clap::Parser;
use colored::Colorize;
use secretgen_core::{log, Settings};
use secretgen_types::SecretGenError;

mod cli;
mod commands;

use cli::Cli;

/// Exit code when a delete left a version disabled but not destroyed.
const EXIT_PARTIAL: i32 = 2;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match run(&cli).await {
        Ok(_) => Ok(()),
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            let partial = e
                .downcast_ref::<SecretGenError>()
                .map_or(false, SecretGenError::is_partial);
            std::process::exit(if partial { EXIT_PARTIAL } else { 1 });
        }
    }
}

async fn run(cli: &Cli) -> Result<()> {
    let mut settings = Settings::load(cli.config.as_deref()).context("Failed to load settings")?;
    if let Some(level) = cli.log_level() {
        settings.log.level = level;
    }
    log::init(&settings.log)?;

    let ctx = commands::Context::new(settings);
    cli.execute(&ctx).await
}
