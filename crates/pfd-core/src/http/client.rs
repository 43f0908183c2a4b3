//! Socket round trips: connect, write one request, read one response.

use super::request::{build_get_request, build_head_request, build_range_get_request};
use super::response::{parse_response, Framing, HttpResponse};
use super::Method;
use crate::config::PfdConfig;
use crate::error::{DownloadError, Result};
use crate::segmenter::ByteRange;
use crate::url_model::ResourceLocation;
use std::io;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;

const READ_BUF_SIZE: usize = 16 * 1024;

/// Minimal HTTP/1.1 client. Cheap to clone; every request opens its own
/// connection and closes it before returning.
#[derive(Debug, Clone)]
pub struct HttpClient {
    port: u16,
    connect_timeout: Duration,
    read_timeout: Option<Duration>,
    user_agent: String,
}

impl HttpClient {
    pub fn new(cfg: &PfdConfig) -> Self {
        Self {
            port: cfg.port,
            connect_timeout: cfg.connect_timeout(),
            read_timeout: cfg.read_timeout(),
            user_agent: cfg.user_agent.clone(),
        }
    }

    /// Plain `GET` of the whole resource.
    pub async fn get(&self, location: &ResourceLocation) -> Result<HttpResponse> {
        let request = build_get_request(&location.host, &location.path);
        self.round_trip(location, &request, Method::Get).await
    }

    /// `HEAD` probe.
    pub async fn head(&self, location: &ResourceLocation) -> Result<HttpResponse> {
        let request = build_head_request(&location.host, &location.path, &self.user_agent);
        self.round_trip(location, &request, Method::Head).await
    }

    /// `GET` of one inclusive byte range.
    pub async fn get_range(
        &self,
        location: &ResourceLocation,
        range: ByteRange,
    ) -> Result<HttpResponse> {
        let request = build_range_get_request(&location.host, &location.path, range);
        self.round_trip(location, &request, Method::Get).await
    }

    async fn round_trip(
        &self,
        location: &ResourceLocation,
        request: &[u8],
        method: Method,
    ) -> Result<HttpResponse> {
        let addr = location.socket_addr(self.port);
        let raw = self.send_and_receive(&addr, request, method).await?;
        parse_response(&raw, method)
    }

    /// Connects to `addr` (`host:port`), writes `request` and returns the raw
    /// response bytes. The connection is closed before returning.
    pub async fn send_and_receive(
        &self,
        addr: &str,
        request: &[u8],
        method: Method,
    ) -> Result<Vec<u8>> {
        let mut stream = match timeout(self.connect_timeout, TcpStream::connect(addr)).await {
            Ok(res) => res.map_err(|e| DownloadError::transport(addr, e))?,
            Err(_) => {
                return Err(DownloadError::Timeout {
                    addr: addr.to_string(),
                    secs: self.connect_timeout.as_secs(),
                })
            }
        };

        stream
            .write_all(request)
            .await
            .map_err(|e| DownloadError::transport(addr, e))?;

        let raw = read_message(&mut stream, method, addr, self.read_timeout).await?;

        // Peer may already be gone; the message is complete either way.
        let _ = stream.shutdown().await;
        tracing::trace!(addr, bytes = raw.len(), "response received");
        Ok(raw)
    }
}

/// Reads until the message framing says the response is complete, or until
/// the peer closes the connection.
///
/// `idle` bounds each single read, not the whole transfer: a slow peer that
/// keeps sending never times out. A close before a length-framed or chunked
/// body is complete is a transport failure.
async fn read_message<R>(
    reader: &mut R,
    method: Method,
    addr: &str,
    idle: Option<Duration>,
) -> Result<Vec<u8>>
where
    R: AsyncRead + Unpin,
{
    let mut framing = Framing::new(method);
    let mut buf = Vec::new();
    let mut chunk = vec![0u8; READ_BUF_SIZE];
    loop {
        let read = reader.read(&mut chunk);
        let n = match idle {
            Some(limit) => timeout(limit, read).await.map_err(|_| DownloadError::Timeout {
                addr: addr.to_string(),
                secs: limit.as_secs(),
            })?,
            None => read.await,
        }
        .map_err(|e| DownloadError::transport(addr, e))?;

        if n == 0 {
            if framing.is_self_delimiting() {
                let cut = io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    format!("connection closed after {} bytes of an unfinished response", buf.len()),
                );
                return Err(DownloadError::transport(addr, cut));
            }
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(len) = framing.complete_len(&buf) {
            buf.truncate(len);
            break;
        }
    }
    Ok(buf)
}
