//! Parallel, range-partitioned file downloads over hand-rolled HTTP/1.1.

pub mod config;
pub mod error;
pub mod logging;

pub mod checksum;
pub mod fetch_head;
pub mod fetcher;
pub mod http;
pub mod index;
pub mod orchestrator;
pub mod segmenter;
pub mod storage;
pub mod url_model;

pub use error::DownloadError;
