//! Hand-rolled HTTP/1.1 over raw TCP.
//!
//! `request` builds the three request shapes the engine sends, `response`
//! splits and parses what comes back, and `client` owns the socket round trip
//! (one connection per request, closed before returning).

mod client;
mod request;
mod response;

pub use client::HttpClient;
pub use request::{build_get_request, build_head_request, build_range_get_request};
pub use response::{parse_response, split_response, HttpResponse, RawParts};

/// Request method; decides whether a response may carry a body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Head,
}
