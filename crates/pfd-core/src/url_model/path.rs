//! Filename extraction from a resource path.

/// Returns the last non-empty segment of `path`, ignoring any query or fragment.
///
/// Returns `None` for an empty path or a `.`/`..` segment.
pub fn last_path_segment(path: &str) -> Option<String> {
    let path = path.split(['?', '#']).next().unwrap_or("");
    let segment = path.split('/').filter(|s| !s.is_empty()).last()?;
    if segment == "." || segment == ".." {
        return None;
    }
    Some(segment.to_string())
}
