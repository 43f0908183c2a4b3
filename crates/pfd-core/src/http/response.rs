//! Response splitting, parsing and body framing.

use super::Method;
use crate::error::{DownloadError, Result};

/// A response split at the first empty line, before any header interpretation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawParts<'a> {
    pub status_line: &'a str,
    pub header_lines: Vec<&'a str>,
    /// Everything after the empty line, still framed (chunked or raw).
    pub body: &'a [u8],
}

/// A parsed response: numeric status, ordered headers and the decoded body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status_line: String,
    pub status_code: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// First header value with `name` (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// `Content-Length` as an integer, if present and well formed.
    pub fn content_length(&self) -> Option<u64> {
        self.header("content-length")?.parse().ok()
    }

    pub fn accepts_ranges(&self) -> bool {
        self.header("accept-ranges")
            .map(|v| v.eq_ignore_ascii_case("bytes"))
            .unwrap_or(false)
    }

    /// The body as text lines with terminators stripped.
    pub fn body_lines(&self) -> Vec<String> {
        String::from_utf8_lossy(&self.body)
            .lines()
            .map(str::to_string)
            .collect()
    }
}

/// Locates the empty line ending the head. Returns (head_len, body_start).
/// Accepts both CRLF and bare LF line endings.
fn find_head_end(buf: &[u8]) -> Option<(usize, usize)> {
    let mut line_start = 0;
    for (i, &b) in buf.iter().enumerate() {
        if b == b'\n' {
            let line = &buf[line_start..i];
            let line = line.strip_suffix(b"\r").unwrap_or(line);
            if line.is_empty() && line_start > 0 {
                return Some((line_start, i + 1));
            }
            line_start = i + 1;
        }
    }
    None
}

/// Separates status line, header lines and body.
///
/// A response that ends without an empty line (typical for HEAD when the
/// peer closes right after the headers) is all head and no body.
pub fn split_response(raw: &[u8]) -> Result<RawParts<'_>> {
    let (head, body) = match find_head_end(raw) {
        Some((head_len, body_start)) => (&raw[..head_len], &raw[body_start..]),
        None => (raw, &raw[raw.len()..]),
    };
    let head = std::str::from_utf8(head)
        .map_err(|_| DownloadError::protocol("response head is not valid UTF-8"))?;

    let mut lines = head.lines().filter(|l| !l.is_empty());
    let status_line = lines
        .next()
        .ok_or_else(|| DownloadError::protocol("empty response"))?;

    Ok(RawParts {
        status_line,
        header_lines: lines.collect(),
        body,
    })
}

fn parse_status_code(status_line: &str) -> Result<u16> {
    let mut parts = status_line.splitn(3, ' ');
    let version = parts.next().unwrap_or("");
    if !version.starts_with("HTTP/") {
        return Err(DownloadError::protocol(format!(
            "bad status line {:?}",
            status_line
        )));
    }
    parts
        .next()
        .filter(|code| code.len() == 3)
        .and_then(|code| code.parse::<u16>().ok())
        .ok_or_else(|| DownloadError::protocol(format!("bad status code in {:?}", status_line)))
}

fn parse_header_lines(lines: &[&str]) -> Result<Vec<(String, String)>> {
    lines
        .iter()
        .map(|line| -> Result<(String, String)> {
            let (name, value) = line
                .split_once(':')
                .filter(|(name, _)| !name.trim().is_empty())
                .ok_or_else(|| DownloadError::protocol(format!("malformed header {:?}", line)))?;
            Ok((name.trim().to_string(), value.trim().to_string()))
        })
        .collect()
}

fn has_body(method: Method, status_code: u16) -> bool {
    method != Method::Head && !matches!(status_code, 100..=199 | 204 | 304)
}

fn is_chunked(headers: &[(String, String)]) -> bool {
    headers.iter().any(|(k, v)| {
        k.eq_ignore_ascii_case("transfer-encoding") && v.to_ascii_lowercase().contains("chunked")
    })
}

fn declared_length(headers: &[(String, String)]) -> Result<Option<usize>> {
    match headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case("content-length"))
    {
        Some((_, v)) => v
            .parse::<usize>()
            .map(Some)
            .map_err(|_| DownloadError::protocol(format!("bad Content-Length {:?}", v))),
        None => Ok(None),
    }
}

/// Parses a complete raw response into a typed `HttpResponse`.
///
/// Body framing: chunked transfer coding, then `Content-Length`, then
/// everything up to connection close.
pub fn parse_response(raw: &[u8], method: Method) -> Result<HttpResponse> {
    let parts = split_response(raw)?;
    let status_code = parse_status_code(parts.status_line)?;
    let headers = parse_header_lines(&parts.header_lines)?;

    let body = if !has_body(method, status_code) {
        Vec::new()
    } else if is_chunked(&headers) {
        let mut out = Vec::new();
        let mut cursor = ChunkCursor::default();
        match scan_chunked(parts.body, &mut cursor, Some(&mut out)) {
            Ok(Some(_)) => out,
            Ok(None) => return Err(DownloadError::protocol("truncated chunked body")),
            Err(msg) => return Err(DownloadError::protocol(msg)),
        }
    } else if let Some(len) = declared_length(&headers)? {
        if parts.body.len() < len {
            return Err(DownloadError::protocol(format!(
                "truncated body: expected {} bytes, got {}",
                len,
                parts.body.len()
            )));
        }
        parts.body[..len].to_vec()
    } else {
        parts.body.to_vec()
    };

    Ok(HttpResponse {
        status_line: parts.status_line.to_string(),
        status_code,
        headers,
        body,
    })
}

/// Body framing of one response, decided once its head has arrived.
#[derive(Debug, Clone, Copy)]
enum BodyFraming {
    /// The message ends at this offset (no body, or `Content-Length`).
    EndsAt(usize),
    Chunked { body_start: usize, cursor: ChunkCursor },
    /// No self-delimiting framing: read until the peer closes.
    UntilClose,
}

/// Incremental completeness check for one response, fed the growing read
/// buffer after every read. Chunked bodies resume where the last call left
/// off, so each byte is walked once.
#[derive(Debug)]
pub(crate) struct Framing {
    method: Method,
    body: Option<BodyFraming>,
}

impl Framing {
    pub(crate) fn new(method: Method) -> Self {
        Self { method, body: None }
    }

    /// Length of the complete message at the start of `buf`, once it is known.
    ///
    /// Returns `None` while more bytes are needed, or when the message must be
    /// read until the peer closes. Malformed framing also ends the read
    /// (`Some(buf.len())`) and is left for `parse_response` to report.
    pub(crate) fn complete_len(&mut self, buf: &[u8]) -> Option<usize> {
        if self.body.is_none() {
            self.body = Some(body_framing(buf, self.method)?);
        }
        match self.body.as_mut()? {
            BodyFraming::EndsAt(end) => (buf.len() >= *end).then_some(*end),
            BodyFraming::Chunked { body_start, cursor } => {
                let start = *body_start;
                match scan_chunked(&buf[start..], cursor, None) {
                    Ok(done) => done.map(|n| start + n),
                    Err(_) => Some(buf.len()),
                }
            }
            BodyFraming::UntilClose => None,
        }
    }

    /// Whether the head declared a length (or chunking), so a close before
    /// `complete_len` returns means the message was cut short.
    pub(crate) fn is_self_delimiting(&self) -> bool {
        matches!(
            self.body,
            Some(BodyFraming::EndsAt(_) | BodyFraming::Chunked { .. })
        )
    }
}

fn body_framing(buf: &[u8], method: Method) -> Option<BodyFraming> {
    let (_, body_start) = find_head_end(buf)?;
    let head = split_response(&buf[..body_start]).and_then(|parts| {
        let status_code = parse_status_code(parts.status_line)?;
        let headers = parse_header_lines(&parts.header_lines)?;
        Ok((status_code, headers))
    });
    let Ok((status_code, headers)) = head else {
        return Some(BodyFraming::EndsAt(buf.len()));
    };

    if !has_body(method, status_code) {
        return Some(BodyFraming::EndsAt(body_start));
    }
    if is_chunked(&headers) {
        return Some(BodyFraming::Chunked {
            body_start,
            cursor: ChunkCursor::default(),
        });
    }
    Some(match declared_length(&headers) {
        Ok(Some(len)) => body_start
            .checked_add(len)
            .map_or(BodyFraming::EndsAt(buf.len()), BodyFraming::EndsAt),
        Ok(None) => BodyFraming::UntilClose,
        Err(_) => BodyFraming::EndsAt(buf.len()),
    })
}

fn find_crlf(data: &[u8], from: usize) -> Option<usize> {
    data.get(from..)?
        .windows(2)
        .position(|w| w == b"\r\n")
        .map(|i| i + from)
}

/// Position inside a chunked body: start of the next size line (or trailer
/// line once the last chunk has been seen).
#[derive(Debug, Clone, Copy, Default)]
struct ChunkCursor {
    pos: usize,
    in_trailers: bool,
}

/// Walks a chunked body from `cursor`, advancing it past every complete
/// chunk. Returns `Ok(Some(consumed))` when the terminating chunk and
/// trailers are present, `Ok(None)` when more data is needed. Decoded data is
/// appended to `out` when given.
fn scan_chunked(
    data: &[u8],
    cursor: &mut ChunkCursor,
    mut out: Option<&mut Vec<u8>>,
) -> std::result::Result<Option<usize>, String> {
    loop {
        let Some(line_end) = find_crlf(data, cursor.pos) else {
            return Ok(None);
        };
        if cursor.in_trailers {
            // Trailer section ends with an empty line.
            if line_end == cursor.pos {
                return Ok(Some(line_end + 2));
            }
            cursor.pos = line_end + 2;
            continue;
        }

        let size_line = std::str::from_utf8(&data[cursor.pos..line_end])
            .map_err(|_| "chunk size line is not valid UTF-8".to_string())?;
        let size_hex = size_line.split(';').next().unwrap_or("").trim();
        let size = usize::from_str_radix(size_hex, 16)
            .map_err(|_| format!("bad chunk size {:?}", size_line))?;
        let data_start = line_end + 2;

        if size == 0 {
            cursor.pos = data_start;
            cursor.in_trailers = true;
            continue;
        }

        let chunk_end = data_start
            .checked_add(size)
            .and_then(|n| n.checked_add(2))
            .ok_or_else(|| format!("bad chunk size {:?}", size_line))?;
        if data.len() < chunk_end {
            return Ok(None);
        }
        if &data[chunk_end - 2..chunk_end] != b"\r\n" {
            return Err("chunk data not followed by CRLF".to_string());
        }
        if let Some(out) = out.as_deref_mut() {
            out.extend_from_slice(&data[data_start..chunk_end - 2]);
        }
        cursor.pos = chunk_end;
    }
}
