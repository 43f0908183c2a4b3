//! `pfd probe <resource>` – HEAD one resource.

use anyhow::{Context, Result};
use pfd_core::config::PfdConfig;
use pfd_core::fetch_head;
use pfd_core::http::HttpClient;
use pfd_core::url_model::ResourceLocation;

pub async fn run_probe(cfg: &PfdConfig, resource: &str) -> Result<()> {
    let location = ResourceLocation::parse(resource).context("invalid resource")?;
    let client = HttpClient::new(cfg);
    let head = fetch_head::probe(&client, &location)
        .await
        .with_context(|| format!("HEAD {}", location))?;

    let size = head
        .content_length
        .map(|n| n.to_string())
        .unwrap_or_else(|| "unknown".to_string());
    println!(
        "{}: HTTP {}, size = {}, byte ranges: {}",
        location,
        head.status_code,
        size,
        if head.accept_ranges { "yes" } else { "not advertised" }
    );
    Ok(())
}
