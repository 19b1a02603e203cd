//! Route pattern parsing.
//!
//! # Responsibilities
//! - Turn a pattern string (`/user/{name}/image/{id}`) into typed segments
//! - Split request paths into raw segments the same way
//!
//! # Design Decisions
//! - One leading and one trailing `/` are optional and discarded
//! - `/` alone is the root pattern (zero segments)
//! - Placeholders must span a whole segment; no partial captures
//! - Literal text is kept verbatim (no decoding, case-sensitive)

use std::collections::HashSet;
use std::fmt;

use crate::routing::error::PatternError;

/// One parsed segment of a route pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// Matched by exact text equality.
    Literal(String),
    /// Matched by any non-empty segment, captured under this name.
    Placeholder(String),
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Literal(text) => f.write_str(text),
            Segment::Placeholder(name) => write!(f, "{{{}}}", name),
        }
    }
}

/// Parse a route pattern into its segment descriptors.
pub fn parse_pattern(pattern: &str) -> Result<Vec<Segment>, PatternError> {
    if pattern.is_empty() {
        return Err(PatternError::Empty);
    }
    if pattern == "/" {
        return Ok(Vec::new());
    }

    let mut seen = HashSet::new();
    let mut segments = Vec::new();

    for (position, raw) in trim_delimiters(pattern).split('/').enumerate() {
        let segment = parse_segment(raw, position)?;
        if let Segment::Placeholder(name) = &segment {
            if !seen.insert(name.clone()) {
                return Err(PatternError::DuplicatePlaceholder { name: name.clone() });
            }
        }
        segments.push(segment);
    }

    Ok(segments)
}

/// Split a request path into raw segments.
///
/// `""` and `"/"` yield no segments. Empty segments (from `//`) are kept so the
/// matcher can reject them.
pub fn split_path(path: &str) -> Vec<&str> {
    if path.is_empty() || path == "/" {
        return Vec::new();
    }
    trim_delimiters(path).split('/').collect()
}

/// Render segments back into canonical pattern form.
pub fn render_pattern(segments: &[Segment]) -> String {
    if segments.is_empty() {
        return "/".to_string();
    }
    segments.iter().fold(String::new(), |mut out, segment| {
        out.push('/');
        out.push_str(&segment.to_string());
        out
    })
}

fn trim_delimiters(s: &str) -> &str {
    let s = s.strip_prefix('/').unwrap_or(s);
    s.strip_suffix('/').unwrap_or(s)
}

fn parse_segment(raw: &str, position: usize) -> Result<Segment, PatternError> {
    if raw.is_empty() {
        return Err(PatternError::EmptySegment { position });
    }

    if let Some(inner) = raw.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
        if has_brace(inner) {
            return Err(PatternError::UnmatchedBrace {
                segment: raw.to_string(),
            });
        }
        if inner.is_empty() {
            return Err(PatternError::EmptyPlaceholder { position });
        }
        if !inner.chars().all(is_name_char) {
            return Err(PatternError::InvalidPlaceholderName {
                name: inner.to_string(),
            });
        }
        return Ok(Segment::Placeholder(inner.to_string()));
    }

    if has_brace(raw) {
        return Err(PatternError::UnmatchedBrace {
            segment: raw.to_string(),
        });
    }

    Ok(Segment::Literal(raw.to_string()))
}

fn has_brace(s: &str) -> bool {
    s.contains(|c: char| c == '{' || c == '}')
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.')
}
