//! Registration and pattern error definitions.

use thiserror::Error;

/// Syntax errors found while parsing a route pattern.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    /// The pattern string was empty.
    #[error("pattern is empty")]
    Empty,

    /// A segment between two slashes was empty (e.g. `/a//b`).
    #[error("empty segment at position {position}")]
    EmptySegment { position: usize },

    /// A `{` or `}` that does not wrap a whole segment.
    #[error("unmatched or misplaced brace in segment `{segment}`")]
    UnmatchedBrace { segment: String },

    /// `{}` with nothing inside.
    #[error("empty placeholder name at position {position}")]
    EmptyPlaceholder { position: usize },

    /// Placeholder names are limited to ASCII alphanumerics, `_`, `-` and `.`.
    #[error("invalid placeholder name `{name}`")]
    InvalidPlaceholderName { name: String },

    /// The same placeholder name appears twice in one pattern.
    #[error("placeholder `{name}` declared more than once")]
    DuplicatePlaceholder { name: String },
}

/// Errors raised while registering a route into a [`RouteTree`](super::RouteTree).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    /// The pattern could not be parsed.
    #[error("invalid pattern `{pattern}`: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: PatternError,
    },

    /// Two patterns disagree on the placeholder name at the same trie position.
    #[error("placeholder conflict in `{pattern}`: `{{{requested}}}` collides with existing `{{{existing}}}`")]
    PlaceholderConflict {
        pattern: String,
        existing: String,
        requested: String,
    },

    /// A different route identity already ends at this position.
    #[error("route `{pattern}` is already registered with a different identity")]
    DuplicateRoute { pattern: String },
}

/// Result type for registration operations.
pub type RegistrationResult<T> = Result<T, RegistrationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RegistrationError::PlaceholderConflict {
            pattern: "/user/{id}".into(),
            existing: "name".into(),
            requested: "id".into(),
        };
        assert_eq!(
            err.to_string(),
            "placeholder conflict in `/user/{id}`: `{id}` collides with existing `{name}`"
        );

        let err = RegistrationError::InvalidPattern {
            pattern: "/a//b".into(),
            source: PatternError::EmptySegment { position: 1 },
        };
        assert!(err.to_string().contains("empty segment at position 1"));
    }
}
