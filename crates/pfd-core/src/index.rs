//! Index document: one `host/path` entry per line.

use crate::error::{DownloadError, Result};
use crate::http::HttpClient;
use crate::url_model::ResourceLocation;

/// Resources named by the index, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexList {
    entries: Vec<ResourceLocation>,
}

impl IndexList {
    /// Builds the list from body lines. Blank lines are ignored; lines that
    /// are not `host/path` are logged and skipped.
    pub fn from_lines<S: AsRef<str>>(lines: &[S]) -> Self {
        let entries = lines
            .iter()
            .map(|l| l.as_ref().trim())
            .filter(|l| !l.is_empty())
            .filter_map(|l| match ResourceLocation::parse(l) {
                Ok(loc) => Some(loc),
                Err(e) => {
                    tracing::warn!("skipping index entry: {}", e);
                    None
                }
            })
            .collect();
        Self { entries }
    }

    /// GETs the index document; anything but `200` is fatal.
    pub async fn fetch(client: &HttpClient, location: &ResourceLocation) -> Result<Self> {
        let response = client.get(location).await?;
        if response.status_code != 200 {
            return Err(DownloadError::IndexUnavailable {
                location: location.to_string(),
                status: response.status_code,
            });
        }
        let index = Self::from_lines(&response.body_lines()[..]);
        tracing::info!(%location, entries = index.len(), "index downloaded");
        Ok(index)
    }

    pub fn entries(&self) -> &[ResourceLocation] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
