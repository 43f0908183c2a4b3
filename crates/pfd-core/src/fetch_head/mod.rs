//! HTTP HEAD probing.
//!
//! Sends a HEAD request over a fresh connection and reports the status code
//! and declared `Content-Length`. The caller decides what a non-200 status
//! or a missing size means.

mod parse;

use crate::error::Result;
use crate::http::HttpClient;
use crate::url_model::ResourceLocation;

/// Result of a HEAD request: what the orchestrator needs to plan a download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadResult {
    pub status_code: u16,
    /// Total size in bytes, if `Content-Length` is present and numeric.
    pub content_length: Option<u64>,
    /// True if server sent `Accept-Ranges: bytes`.
    pub accept_ranges: bool,
}

impl HeadResult {
    pub fn is_ok(&self) -> bool {
        self.status_code == 200
    }
}

/// Performs a HEAD request and returns parsed metadata.
pub async fn probe(client: &HttpClient, location: &ResourceLocation) -> Result<HeadResult> {
    let response = client.head(location).await?;
    let result = parse::head_result(&response);
    tracing::debug!(
        %location,
        status = result.status_code,
        content_length = ?result.content_length,
        accept_ranges = result.accept_ranges,
        "HEAD probe"
    );
    Ok(result)
}
