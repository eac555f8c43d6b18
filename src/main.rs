//! regwatch
//!
//! Resolves the watcher configuration from a YAML file, `REGWATCH_*`
//! environment variables and built-in defaults, and prints the result.

use anyhow::{Context, Result};
use clap::Parser;
use regwatch::cli::{Cli, Command};
use regwatch::config::{ConfigLoader, render};
use std::fs::OpenOptions;
use tracing::{debug, error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// `RUST_LOG` when set, otherwise `debug` with `--verbose` and `info` without.
fn log_filter(cli: &Cli) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if cli.verbose { "debug" } else { "info" }))
}

fn init_logging(cli: &Cli) -> Result<()> {
    match cli.log.as_str() {
        "0" | "off" => {
            // No logging
        }
        "1" | "stdout" => {
            let subscriber = FmtSubscriber::builder()
                .with_env_filter(log_filter(cli))
                .with_writer(std::io::stdout)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
        "2" | "stderr" => {
            let subscriber = FmtSubscriber::builder()
                .with_env_filter(log_filter(cli))
                .with_writer(std::io::stderr)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
        filename => {
            // Log to file (append mode)
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(filename)
                .with_context(|| format!("failed to open log file {}", filename))?;
            let subscriber = FmtSubscriber::builder()
                .with_env_filter(log_filter(cli))
                .with_writer(file)
                .with_ansi(false)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    let loader = match ConfigLoader::load(&cli.load_options()) {
        Ok(loader) => loader,
        Err(err) => {
            error!(code = ?err.code(), error = %err, "Configuration rejected");
            return Err(err).context("failed to load configuration");
        }
    };
    if let Some(path) = loader.config_path() {
        debug!(path = %path.display(), "Configuration resolved");
    }
    let config = loader.into_config();

    match cli.command.unwrap_or(Command::Print) {
        Command::Print => {
            print!("{}", render(&config, cli.format.into())?);
        }
        Command::Check => {
            let providers = config
                .providers
                .as_ref()
                .map(|p| p.enabled().join(","))
                .unwrap_or_default();
            let channels = config
                .notif
                .as_ref()
                .map(|n| n.channels().join(","))
                .unwrap_or_default();
            info!(
                providers = %providers,
                notif = %channels,
                regopts = config.regopts.len(),
                "Configuration is valid"
            );
            println!(
                "ok: providers=[{}] notif=[{}] regopts={}",
                providers,
                channels,
                config.regopts.len()
            );
        }
    }

    Ok(())
}
