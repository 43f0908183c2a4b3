//! Parallel range fetcher.
//!
//! Fans out one task per byte range, each over its own connection, and fans
//! back in by range index. The first failing task aborts the rest.

use crate::error::{DownloadError, Result};
use crate::http::HttpClient;
use crate::segmenter::ByteRange;
use crate::url_model::ResourceLocation;
use tokio::task::{JoinError, JoinSet};

/// GETs a single range and checks the server honored it.
///
/// `200` is accepted only when this range is the whole plan (the server
/// ignored `Range` but the full body is what we want anyway).
async fn fetch_one_range(
    client: &HttpClient,
    location: &ResourceLocation,
    index: usize,
    range: ByteRange,
    whole_resource: bool,
) -> Result<Vec<u8>> {
    tracing::debug!(%location, index, range = %range.range_header_value(), "range GET");
    let response = client.get_range(location, range).await?;

    match response.status_code {
        206 => {}
        200 if whole_resource => {}
        code => {
            return Err(DownloadError::protocol(format!(
                "range {} of {} returned HTTP {}",
                range.range_header_value(),
                location,
                code
            )))
        }
    }
    if response.body.len() as u64 > range.len() {
        return Err(DownloadError::protocol(format!(
            "range {} of {} returned {} bytes",
            range.range_header_value(),
            location,
            response.body.len()
        )));
    }

    tracing::debug!(%location, index, bytes = response.body.len(), "range done");
    Ok(response.body)
}

/// Fetches every range concurrently. `result[i]` is the body for `ranges[i]`,
/// whatever order the tasks finish in.
pub async fn fetch_ranges(
    client: &HttpClient,
    location: &ResourceLocation,
    ranges: &[ByteRange],
) -> Result<Vec<Vec<u8>>> {
    let whole_resource = ranges.len() == 1;
    let mut tasks = JoinSet::new();
    for (index, &range) in ranges.iter().enumerate() {
        let client = client.clone();
        let location = location.clone();
        tasks.spawn(async move {
            let body = fetch_one_range(&client, &location, index, range, whole_resource).await;
            (index, body)
        });
    }

    let mut slots: Vec<Option<Vec<u8>>> = vec![None; ranges.len()];
    while let Some(joined) = tasks.join_next().await {
        let (index, body) = joined.map_err(|e| task_failure(location, &e))?;
        // Returning early drops `tasks`, which aborts the ranges still in flight.
        slots[index] = Some(body?);
    }

    slots
        .into_iter()
        .collect::<Option<Vec<_>>>()
        .ok_or_else(|| DownloadError::protocol("range task finished without a result"))
}

fn task_failure(location: &ResourceLocation, err: &JoinError) -> DownloadError {
    let reason = if err.is_panic() {
        "panicked"
    } else {
        "was cancelled"
    };
    DownloadError::RangeTask {
        location: location.to_string(),
        reason,
    }
}

/// Concatenates range bodies in range order.
pub fn reassemble(bodies: Vec<Vec<u8>>) -> Vec<u8> {
    let total = bodies.iter().map(Vec::len).sum();
    bodies.into_iter().fold(Vec::with_capacity(total), |mut acc, b| {
        acc.extend_from_slice(&b);
        acc
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reassemble_keeps_order_and_bytes() {
        let bodies = vec![b"ab".to_vec(), vec![0, 255], b"\n".to_vec()];
        assert_eq!(reassemble(bodies), vec![b'a', b'b', 0, 255, b'\n']);
        assert!(reassemble(Vec::new()).is_empty());
    }

    #[tokio::test]
    async fn panicking_range_task_is_reported_as_such() {
        let location = ResourceLocation::parse("example.com/a.bin").unwrap();
        let joined = tokio::spawn(async { panic!("range worker blew up") }).await;
        let err = task_failure(&location, &joined.unwrap_err());
        assert!(matches!(
            err,
            DownloadError::RangeTask { reason: "panicked", .. }
        ));
        assert_eq!(err.to_string(), "range task for example.com/a.bin panicked");
    }
}
