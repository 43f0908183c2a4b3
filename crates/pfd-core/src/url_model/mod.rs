//! Resource locations and local filename derivation.
//!
//! A location is written `host/path` (optionally prefixed with `http://`);
//! the host may carry an explicit `:port`. The saved filename is the last
//! path segment, sanitized for Linux filesystems.

mod path;
mod sanitize;

pub use path::last_path_segment;
pub use sanitize::sanitize_filename_for_linux;

use crate::error::DownloadError;
use std::fmt;
use std::str::FromStr;

/// Default filename when the path yields nothing usable.
const DEFAULT_FILENAME: &str = "download.bin";

/// A remote resource: `host` (with optional `:port`) and `path` without the
/// leading slash.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceLocation {
    pub host: String,
    pub path: String,
}

impl ResourceLocation {
    /// Splits `host/path` on the first `/`. Both halves must be non-empty.
    pub fn parse(s: &str) -> Result<Self, DownloadError> {
        let trimmed = s.trim();
        let without_scheme = trimmed.strip_prefix("http://").unwrap_or(trimmed);
        let (host, path) = without_scheme
            .split_once('/')
            .ok_or_else(|| DownloadError::InvalidLocation(s.to_string()))?;
        if host.is_empty() || path.is_empty() {
            return Err(DownloadError::InvalidLocation(s.to_string()));
        }
        Ok(Self {
            host: host.to_string(),
            path: path.to_string(),
        })
    }

    /// `host:port` to connect to; an explicit port in `host` wins over `default_port`.
    pub fn socket_addr(&self, default_port: u16) -> String {
        match self.host.rsplit_once(':') {
            Some((_, port)) if port.parse::<u16>().is_ok() => self.host.clone(),
            _ => format!("{}:{}", self.host, default_port),
        }
    }

    /// Safe local filename for this resource.
    pub fn file_name(&self) -> String {
        derive_filename(&self.path)
    }
}

impl FromStr for ResourceLocation {
    type Err = DownloadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ResourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.host, self.path)
    }
}

/// Derives a safe filename from a resource path's last segment.
///
/// # Examples
///
/// - `derive_filename("~cs421/files/large.txt")` → `"large.txt"`
/// - `derive_filename("dir/")` → `"dir"`
pub fn derive_filename(path: &str) -> String {
    let raw = match last_path_segment(path) {
        Some(s) => s,
        None => return DEFAULT_FILENAME.to_string(),
    };

    let sanitized = sanitize_filename_for_linux(&raw);
    if sanitized.is_empty() || sanitized == "." || sanitized == ".." {
        DEFAULT_FILENAME.to_string()
    } else {
        sanitized
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_splits_on_first_slash() {
        let loc = ResourceLocation::parse("www.example.com/~cs421/files/a.txt").unwrap();
        assert_eq!(loc.host, "www.example.com");
        assert_eq!(loc.path, "~cs421/files/a.txt");
        assert_eq!(loc.to_string(), "www.example.com/~cs421/files/a.txt");
    }

    #[test]
    fn parse_accepts_scheme_and_whitespace() {
        let loc: ResourceLocation = "  http://example.com/index.txt\r".parse().unwrap();
        assert_eq!(loc.host, "example.com");
        assert_eq!(loc.path, "index.txt");
    }

    #[test]
    fn parse_rejects_missing_parts() {
        assert!(matches!(
            ResourceLocation::parse("example.com"),
            Err(DownloadError::InvalidLocation(_))
        ));
        assert!(ResourceLocation::parse("/index.txt").is_err());
        assert!(ResourceLocation::parse("example.com/").is_err());
    }

    #[test]
    fn socket_addr_uses_default_or_explicit_port() {
        let loc = ResourceLocation::parse("example.com/a").unwrap();
        assert_eq!(loc.socket_addr(80), "example.com:80");
        let loc = ResourceLocation::parse("127.0.0.1:8080/a").unwrap();
        assert_eq!(loc.socket_addr(80), "127.0.0.1:8080");
    }

    #[test]
    fn derive_filename_from_path() {
        assert_eq!(derive_filename("~cs421/files/large.txt"), "large.txt");
        assert_eq!(derive_filename("single"), "single");
        assert_eq!(derive_filename("dir/"), "dir");
    }

    #[test]
    fn derive_filename_reserved_names_fallback() {
        assert_eq!(derive_filename("a/.."), "download.bin");
        assert_eq!(derive_filename("?x=1"), "download.bin");
    }
}
