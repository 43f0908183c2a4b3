//! What a run reports: per-file outcomes and progress events.

use crate::segmenter::ByteRange;
use crate::url_model::ResourceLocation;
use std::path::PathBuf;

/// How one index entry ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// Reassembled and written to `path`.
    Downloaded {
        size: u64,
        ranges: Vec<ByteRange>,
        path: PathBuf,
        sha256: String,
    },
    /// HEAD returned a non-200 status, or no parseable response (`status: None`).
    NotFound { status: Option<u16> },
    /// HEAD was 200 but gave no usable `Content-Length`.
    NoSizeInformation,
}

/// One index entry's result; `number` is 1-based in index order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    pub number: usize,
    pub location: ResourceLocation,
    pub outcome: FileOutcome,
}

impl FileReport {
    pub fn is_downloaded(&self) -> bool {
        matches!(self.outcome, FileOutcome::Downloaded { .. })
    }
}

/// Progress events sent to an optional listener while a run proceeds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunEvent {
    IndexLoaded {
        location: ResourceLocation,
        workers: usize,
        entries: usize,
    },
    FileDone(FileReport),
}

/// Everything a completed run did, in index order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub files: Vec<FileReport>,
}

impl RunSummary {
    pub fn downloaded(&self) -> usize {
        self.files.iter().filter(|f| f.is_downloaded()).count()
    }

    pub fn skipped(&self) -> usize {
        self.files.len() - self.downloaded()
    }
}
