//! Range math and download planning.
//!
//! Splits a resource of known size into one inclusive byte range per worker
//! and bundles the result with its location as a `DownloadPlan`.

mod plan;
mod range;

pub use plan::DownloadPlan;
pub use range::{format_parts, partition, ByteRange};
