//! Minimal HTTP/1.1 server that supports HEAD and Range GET for integration tests.
//!
//! Serves any number of static bodies by path. Unknown paths get 404.
//! Responds to HEAD with Content-Length (unless disabled per file) and
//! Accept-Ranges: bytes; responds to GET with Range with 206 Partial Content.
//! Per file, HEAD can be answered with garbage and one range can misbehave.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone, Copy, Default)]
pub struct RangeServerOptions {
    /// Sleep this long before answering a ranged GET that starts at byte 0.
    pub first_range_delay: Option<Duration>,
    /// Hold each connection open this long after responding (keep-alive peer).
    pub linger: Option<Duration>,
}

/// How a ranged GET starting at a chosen offset goes wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeFault {
    /// Send the headers and half the body, then close the connection.
    CutMidBody,
    /// Send the headers and one byte, then go silent for this long.
    Stall(Duration),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HeadStyle {
    WithLength,
    WithoutLength,
    Garbled,
}

#[derive(Debug, Clone)]
struct Served {
    body: Vec<u8>,
    head: HeadStyle,
    fault: Option<(u64, RangeFault)>,
}

#[derive(Default)]
struct Shared {
    files: Mutex<HashMap<String, Served>>,
    range_gets: AtomicUsize,
    head_requests: AtomicUsize,
}

/// Handle to a running server. The server runs until the process exits.
#[derive(Clone)]
pub struct RangeServer {
    pub addr: String,
    shared: Arc<Shared>,
}

impl RangeServer {
    /// Serve `body` at `/path`.
    pub fn add(&self, path: &str, body: Vec<u8>) {
        self.insert(path, body, HeadStyle::WithLength, None);
    }

    /// Serve `body` at `/path`, but leave Content-Length out of HEAD responses.
    pub fn add_without_length(&self, path: &str, body: Vec<u8>) {
        self.insert(path, body, HeadStyle::WithoutLength, None);
    }

    /// Serve `body` at `/path`, but answer HEAD with bytes that are not HTTP.
    pub fn add_with_garbled_head(&self, path: &str, body: Vec<u8>) {
        self.insert(path, body, HeadStyle::Garbled, None);
    }

    /// Serve `body` at `/path`; the ranged GET starting at `start` fails with `fault`.
    pub fn add_with_range_fault(&self, path: &str, body: Vec<u8>, start: u64, fault: RangeFault) {
        self.insert(path, body, HeadStyle::WithLength, Some((start, fault)));
    }

    fn insert(&self, path: &str, body: Vec<u8>, head: HeadStyle, fault: Option<(u64, RangeFault)>) {
        self.shared
            .files
            .lock()
            .unwrap()
            .insert(path.to_string(), Served { body, head, fault });
    }

    /// `host:port/path` for a served file.
    pub fn location(&self, path: &str) -> String {
        format!("{}/{}", self.addr, path)
    }

    /// Number of GET requests that carried a Range header.
    pub fn range_gets(&self) -> usize {
        self.shared.range_gets.load(Ordering::SeqCst)
    }

    pub fn head_requests(&self) -> usize {
        self.shared.head_requests.load(Ordering::SeqCst)
    }
}

pub fn start() -> RangeServer {
    start_with_options(RangeServerOptions::default())
}

pub fn start_with_options(opts: RangeServerOptions) -> RangeServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let shared = Arc::new(Shared::default());
    let server_shared = Arc::clone(&shared);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let shared = Arc::clone(&server_shared);
            thread::spawn(move || handle(stream, &shared, opts));
        }
    });
    RangeServer {
        addr: format!("127.0.0.1:{}", port),
        shared,
    }
}

fn read_request(stream: &mut TcpStream) -> Option<String> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = stream.read(&mut chunk).ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
    }
    String::from_utf8(buf).ok()
}

fn handle(mut stream: TcpStream, shared: &Shared, opts: RangeServerOptions) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));
    let request = match read_request(&mut stream) {
        Some(r) => r,
        None => return,
    };
    let (method, path, range) = parse_request(&request);
    let file = shared.files.lock().unwrap().get(path).cloned();

    let response = match (method, file) {
        (_, None) => b"HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\n\r\n".to_vec(),
        ("HEAD", Some(file)) => {
            shared.head_requests.fetch_add(1, Ordering::SeqCst);
            let length = match file.head {
                HeadStyle::WithLength => format!("Content-Length: {}\r\n", file.body.len()),
                HeadStyle::WithoutLength => String::new(),
                HeadStyle::Garbled => {
                    let _ = stream.write_all(b"SSH-2.0-OpenSSH_9.6\r\n\r\n");
                    return;
                }
            };
            format!("HTTP/1.1 200 OK\r\n{}Accept-Ranges: bytes\r\n\r\n", length).into_bytes()
        }
        ("GET", Some(file)) => match range {
            Some((start, end_incl)) => {
                shared.range_gets.fetch_add(1, Ordering::SeqCst);
                if start == 0 {
                    if let Some(delay) = opts.first_range_delay {
                        thread::sleep(delay);
                    }
                }
                let response = ranged(&file.body, start, end_incl);
                match file.fault {
                    Some((at, fault)) if at == start => {
                        misbehave(&mut stream, &response, fault);
                        return;
                    }
                    _ => response,
                }
            }
            None => {
                let mut out = format!(
                    "HTTP/1.1 200 OK\r\nContent-Length: {}\r\n\r\n",
                    file.body.len()
                )
                .into_bytes();
                out.extend_from_slice(&file.body);
                out
            }
        },
        _ => b"HTTP/1.1 405 Method Not Allowed\r\nContent-Length: 0\r\n\r\n".to_vec(),
    };

    if stream.write_all(&response).is_ok() {
        let _ = stream.flush();
    }
    if let Some(linger) = opts.linger {
        thread::sleep(linger);
    }
}

/// Writes a damaged version of `response` according to `fault`.
fn misbehave(stream: &mut TcpStream, response: &[u8], fault: RangeFault) {
    let head_len = response
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .map_or(response.len(), |i| i + 4);
    let body_len = response.len() - head_len;
    match fault {
        RangeFault::CutMidBody => {
            let _ = stream.write_all(&response[..head_len + body_len / 2]);
        }
        RangeFault::Stall(quiet) => {
            let _ = stream.write_all(&response[..head_len + body_len.min(1)]);
            let _ = stream.flush();
            thread::sleep(quiet);
        }
    }
}

fn ranged(body: &[u8], start: u64, end_incl: u64) -> Vec<u8> {
    let total = body.len() as u64;
    let end_incl = end_incl.min(total.saturating_sub(1));
    if start > end_incl || start >= total {
        return format!(
            "HTTP/1.1 416 Range Not Satisfiable\r\nContent-Range: bytes */{}\r\nContent-Length: 0\r\n\r\n",
            total
        )
        .into_bytes();
    }
    let slice = &body[start as usize..=end_incl as usize];
    let mut out = format!(
        "HTTP/1.1 206 Partial Content\r\nContent-Length: {}\r\nContent-Range: bytes {}-{}/{}\r\n\r\n",
        slice.len(),
        start,
        end_incl,
        total
    )
    .into_bytes();
    out.extend_from_slice(slice);
    out
}

/// Returns (method, path without leading slash, optional (start, end_inclusive)).
fn parse_request(request: &str) -> (&str, &str, Option<(u64, u64)>) {
    let mut lines = request.lines();
    let mut first = lines.next().unwrap_or("").split_whitespace();
    let method = first.next().unwrap_or("");
    let path = first.next().unwrap_or("/").trim_start_matches('/');

    let mut range = None;
    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            if name.trim().eq_ignore_ascii_case("range") {
                let spec = value.trim().trim_start_matches("bytes=");
                if let Some((a, b)) = spec.split_once('-') {
                    let start = a.trim().parse::<u64>().unwrap_or(0);
                    let end = b.trim().parse::<u64>().unwrap_or(u64::MAX);
                    range = Some((start, end));
                }
            }
        }
    }
    (method, path, range)
}
