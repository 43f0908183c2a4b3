//! Byte range type and partitioning.

use crate::error::DownloadError;
use std::fmt;

/// An inclusive byte range `[start, end]`, as sent in `Range: bytes=start-end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub start: u64,
    pub end: u64,
}

impl ByteRange {
    /// Number of bytes covered (both bounds inclusive).
    pub fn len(&self) -> u64 {
        self.end - self.start + 1
    }

    /// HTTP Range header value: `bytes=start-end`.
    pub fn range_header_value(&self) -> String {
        format!("bytes={}-{}", self.start, self.end)
    }
}

impl fmt::Display for ByteRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {} ({})", self.start, self.end, self.len())
    }
}

/// Range boundaries for reports, e.g. `0 - 250 (251), 251 - 500 (250)`.
pub fn format_parts(ranges: &[ByteRange]) -> String {
    ranges
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Splits `size` bytes into `workers` contiguous inclusive ranges.
///
/// Every worker gets `size / workers` bytes; the last range absorbs the
/// remainder and ends at `size` itself, so the union is `[0, size]`.
/// Servers clamp the trailing index to the real last byte.
pub fn partition(size: u64, workers: usize) -> Result<Vec<ByteRange>, DownloadError> {
    if workers == 0 || size < workers as u64 {
        return Err(DownloadError::InvalidPartition { size, workers });
    }

    let count = workers as u64;
    let share = size / count;

    let mut out = Vec::with_capacity(workers);
    let mut start = 0u64;
    for i in 0..count {
        let boundary = if i == count - 1 { size } else { share * (i + 1) };
        out.push(ByteRange {
            start,
            end: boundary,
        });
        start = boundary + 1;
    }

    Ok(out)
}
