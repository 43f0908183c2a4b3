//! Linux-safe filename sanitization.

const NAME_MAX: usize = 255;

/// Sanitizes a candidate filename for safe use on Linux.
///
/// Separators, NUL, whitespace and control characters become a single `_`;
/// leading/trailing dots and underscores are trimmed; the result is capped
/// at NAME_MAX bytes.
pub fn sanitize_filename_for_linux(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        let unsafe_char = matches!(c, '/' | '\\' | ' ' | '\t') || c.is_control();
        if unsafe_char {
            if !out.ends_with('_') {
                out.push('_');
            }
        } else {
            out.push(c);
        }
    }

    let trimmed = out.trim_matches(|c| c == '.' || c == '_');
    let mut take = trimmed.len().min(NAME_MAX);
    while !trimmed.is_char_boundary(take) {
        take -= 1;
    }
    trimmed[..take].to_string()
}
