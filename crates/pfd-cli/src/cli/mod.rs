//! CLI for the pfd parallel file downloader.

mod commands;

use anyhow::Result;
use clap::builder::RangedU64ValueParser;
use clap::{Parser, Subcommand};
use pfd_core::config;
use std::path::{Path, PathBuf};

use commands::{run_checksum, run_index, run_probe};

/// Top-level CLI for pfd.
#[derive(Debug, Parser)]
#[command(name = "pfd")]
#[command(
    about = "pfd: download every file listed in an index over parallel HTTP range requests",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Download every file listed in an index document.
    Run {
        /// Index location as host/path (e.g. www.example.com/files/index.txt).
        index: String,

        /// Parallel connections per file (default: `workers` from config.toml).
        #[arg(value_parser = RangedU64ValueParser::<usize>::new().range(1..))]
        workers: Option<usize>,

        /// Directory to write downloaded files into (default: current directory).
        #[arg(long, value_name = "DIR")]
        download_dir: Option<PathBuf>,
    },

    /// Send a HEAD request for one resource and print its status and size.
    Probe {
        /// Resource location as host/path.
        resource: String,
    },

    /// Compute SHA-256 of a file (e.g. after download).
    Checksum {
        /// Path to the file.
        path: String,
    },
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Run {
                index,
                workers,
                download_dir,
            } => {
                let workers = workers.unwrap_or(cfg.workers);
                let download_dir = match download_dir.or_else(|| cfg.download_dir.clone()) {
                    Some(dir) => dir,
                    None => std::env::current_dir()?,
                };
                run_index(&cfg, &index, workers, download_dir).await?;
            }
            CliCommand::Probe { resource } => run_probe(&cfg, &resource).await?,
            CliCommand::Checksum { path } => run_checksum(Path::new(&path)).await?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
