//! Download orchestrator.
//!
//! Fetches the index, then walks its entries one at a time:
//! probe → plan → parallel range fetch → reassemble → persist.
//! Not-found and size-less entries are skipped; every other failure ends
//! the run.

mod report;

pub use report::{FileOutcome, FileReport, RunEvent, RunSummary};

use crate::checksum;
use crate::config::PfdConfig;
use crate::error::{DownloadError, Result};
use crate::fetch_head;
use crate::fetcher::{fetch_ranges, reassemble};
use crate::http::HttpClient;
use crate::index::IndexList;
use crate::segmenter::DownloadPlan;
use crate::storage;
use crate::url_model::ResourceLocation;
use std::path::PathBuf;
use tokio::sync::mpsc;

pub struct Downloader {
    client: HttpClient,
    workers: usize,
    download_dir: PathBuf,
    events: Option<mpsc::Sender<RunEvent>>,
}

impl Downloader {
    pub fn new(cfg: &PfdConfig, workers: usize, download_dir: PathBuf) -> Self {
        Self {
            client: HttpClient::new(cfg),
            workers,
            download_dir,
            events: None,
        }
    }

    /// Send `RunEvent`s to `tx` as the run progresses.
    pub fn with_events(mut self, tx: mpsc::Sender<RunEvent>) -> Self {
        self.events = Some(tx);
        self
    }

    async fn emit(&self, event: RunEvent) {
        if let Some(tx) = &self.events {
            // A listener that went away does not stop the download.
            let _ = tx.send(event).await;
        }
    }

    /// One full pass over the index at `index_location`.
    pub async fn run(&self, index_location: &ResourceLocation) -> Result<RunSummary> {
        if self.workers == 0 {
            return Err(DownloadError::InvalidPartition {
                size: 0,
                workers: 0,
            });
        }

        let index = IndexList::fetch(&self.client, index_location).await?;
        self.emit(RunEvent::IndexLoaded {
            location: index_location.clone(),
            workers: self.workers,
            entries: index.len(),
        })
        .await;

        let mut summary = RunSummary::default();
        for (i, location) in index.entries().iter().enumerate() {
            let report = self.download_entry(i + 1, location).await?;
            self.emit(RunEvent::FileDone(report.clone())).await;
            summary.files.push(report);
        }

        tracing::info!(
            downloaded = summary.downloaded(),
            skipped = summary.skipped(),
            "run complete"
        );
        Ok(summary)
    }

    /// Downloads one entry. `Ok` covers skipped entries; `Err` is always fatal.
    pub async fn download_entry(
        &self,
        number: usize,
        location: &ResourceLocation,
    ) -> Result<FileReport> {
        let report = |outcome| FileReport {
            number,
            location: location.clone(),
            outcome,
        };

        let head = match fetch_head::probe(&self.client, location).await {
            Ok(head) => head,
            Err(DownloadError::Protocol(msg)) => {
                tracing::warn!(%location, "unreadable HEAD response: {}", msg);
                return Ok(report(FileOutcome::NotFound { status: None }));
            }
            Err(e) => return Err(e),
        };
        if !head.is_ok() {
            tracing::info!(%location, status = head.status_code, "not found");
            return Ok(report(FileOutcome::NotFound {
                status: Some(head.status_code),
            }));
        }

        let plan = match self.plan(location, head.content_length) {
            Ok(plan) => plan,
            Err(e) if !e.is_fatal() => {
                tracing::info!(%location, "{}", e);
                return Ok(report(FileOutcome::NoSizeInformation));
            }
            Err(e) => return Err(e),
        };

        let bodies = fetch_ranges(&self.client, location, &plan.ranges).await?;
        let bytes = reassemble(bodies);
        let path = storage::persist(&self.download_dir, &location.file_name(), &bytes).await?;
        let sha256 = checksum::sha256_bytes(&bytes);

        tracing::info!(
            %location,
            size = plan.size,
            received = bytes.len(),
            parts = %plan.parts_summary(),
            path = %path.display(),
            "downloaded"
        );

        Ok(report(FileOutcome::Downloaded {
            size: plan.size,
            ranges: plan.ranges,
            path,
            sha256,
        }))
    }

    fn plan(&self, location: &ResourceLocation, size: Option<u64>) -> Result<DownloadPlan> {
        match size {
            Some(size) if size > 0 => DownloadPlan::new(location.clone(), size, self.workers),
            _ => Err(DownloadError::NoSizeInformation(location.to_string())),
        }
    }
}
