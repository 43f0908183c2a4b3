//! Raw request framing.

use crate::segmenter::ByteRange;

/// `Accept` sent with HEAD probes.
const ACCEPT: &str = "text/html";
/// `Accept-Language` sent with HEAD probes.
const ACCEPT_LANGUAGE: &str = "en-US";

fn request_line(method: &str, path: &str) -> String {
    format!("{} /{} HTTP/1.1\r\n", method, path.trim_start_matches('/'))
}

/// `GET /{path}` with only a `Host` header.
pub fn build_get_request(host: &str, path: &str) -> Vec<u8> {
    let mut req = request_line("GET", path);
    req.push_str(&format!("Host: {}\r\n", host));
    req.push_str("\r\n");
    req.into_bytes()
}

/// `HEAD /{path}` asking the server to close the connection after the headers.
pub fn build_head_request(host: &str, path: &str, user_agent: &str) -> Vec<u8> {
    let mut req = request_line("HEAD", path);
    req.push_str(&format!("Host: {}\r\n", host));
    req.push_str(&format!("User-Agent: {}\r\n", user_agent));
    req.push_str(&format!("Accept: {}\r\n", ACCEPT));
    req.push_str(&format!("Accept-Language: {}\r\n", ACCEPT_LANGUAGE));
    req.push_str("Connection: close\r\n");
    req.push_str("\r\n");
    req.into_bytes()
}

/// `GET /{path}` for one inclusive byte range.
pub fn build_range_get_request(host: &str, path: &str, range: ByteRange) -> Vec<u8> {
    let mut req = request_line("GET", path);
    req.push_str(&format!("Host: {}\r\n", host));
    req.push_str(&format!("Range: {}\r\n", range.range_header_value()));
    req.push_str("\r\n");
    req.into_bytes()
}
