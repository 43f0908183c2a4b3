//! `pfd run <index> [workers]` – download every file in an index.

use anyhow::{Context, Result};
use pfd_core::config::PfdConfig;
use pfd_core::orchestrator::{Downloader, FileOutcome, FileReport, RunEvent};
use pfd_core::segmenter::format_parts;
use pfd_core::url_model::ResourceLocation;
use std::path::PathBuf;

fn print_file_report(report: &FileReport) {
    let n = report.number;
    let loc = &report.location;
    match &report.outcome {
        FileOutcome::Downloaded { size, ranges, .. } => {
            println!("{}- {} (size = {}) is downloaded", n, loc, size);
            println!("File parts: {}", format_parts(ranges));
        }
        FileOutcome::NotFound { .. } => println!("{}- {} is not found", n, loc),
        FileOutcome::NoSizeInformation => println!(
            "{}- {} no information about the size found on the HEAD request, not downloaded",
            n, loc
        ),
    }
}

pub async fn run_index(
    cfg: &PfdConfig,
    index: &str,
    workers: usize,
    download_dir: PathBuf,
) -> Result<()> {
    let location = ResourceLocation::parse(index).context("invalid index location")?;
    println!("URL of the index file: {}", location);
    println!("Number of parallel connections: {}", workers);

    let (events_tx, mut events_rx) = tokio::sync::mpsc::channel::<RunEvent>(16);
    let printer = tokio::spawn(async move {
        while let Some(event) = events_rx.recv().await {
            match event {
                RunEvent::IndexLoaded { entries, .. } => {
                    println!("Index file is downloaded");
                    println!("There are {} files in the index", entries);
                }
                RunEvent::FileDone(report) => print_file_report(&report),
            }
        }
    });

    let result = {
        let downloader = Downloader::new(cfg, workers, download_dir).with_events(events_tx);
        downloader.run(&location).await
    };
    // The downloader (and its sender) is gone, so the printer drains and exits.
    printer.await.context("progress printer join")?;

    let summary = result.with_context(|| format!("download from index {} failed", location))?;
    tracing::info!(
        downloaded = summary.downloaded(),
        skipped = summary.skipped(),
        "index {} done",
        location
    );
    Ok(())
}
