//! Pattern and path segmentation.
//!
//! Patterns and request paths are split on `/` with empty pieces discarded, so
//! leading, trailing and duplicate slashes are insignificant: `/a/b`, `a/b/`
//! and `//a//b//` all produce `["a", "b"]`.
//!
//! Pattern pieces are classified by their first character:
//!
//! | Piece    | Segment                         |
//! |----------|---------------------------------|
//! | `users`  | `Literal("users")`              |
//! | `:id`    | `Param("id")`                   |
//! | `*`      | `Wildcard(None)` (bound to `*`) |
//! | `*path`  | `Wildcard(Some("path"))`        |
//!
//! There is no escaping syntax. A literal that starts with `:` or `*` is
//! always read as a capture.

use smallvec::SmallVec;
use std::fmt;
use std::sync::Arc;

/// Name a wildcard binds to when the pattern leaves it anonymous.
pub const ANONYMOUS_WILDCARD: &str = "*";

/// Inline capacity for split paths; deeper paths spill to the heap.
pub const MAX_INLINE_SEGMENTS: usize = 16;

/// Request path split into borrowed segments.
pub type SegmentVec<'p> = SmallVec<[&'p str; MAX_INLINE_SEGMENTS]>;

/// One parsed piece of a route pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// Matches only identical text.
    Literal(String),
    /// Matches any single segment, binding it to the name.
    Param(String),
    /// Matches one or more trailing segments. `None` binds to `*`.
    Wildcard(Option<String>),
}

impl Segment {
    /// Classify a single non-empty pattern piece.
    #[must_use]
    pub fn parse(piece: &str) -> Self {
        if let Some(name) = piece.strip_prefix(':') {
            Segment::Param(name.to_string())
        } else if let Some(name) = piece.strip_prefix('*') {
            if name.is_empty() {
                Segment::Wildcard(None)
            } else {
                Segment::Wildcard(Some(name.to_string()))
            }
        } else {
            Segment::Literal(piece.to_string())
        }
    }

    /// Capture name for param and wildcard segments, `None` for literals.
    #[must_use]
    pub fn capture_name(&self) -> Option<&str> {
        match self {
            Segment::Literal(_) => None,
            Segment::Param(name) => Some(name.as_str()),
            Segment::Wildcard(name) => Some(name.as_deref().unwrap_or(ANONYMOUS_WILDCARD)),
        }
    }

    #[must_use]
    pub fn is_wildcard(&self) -> bool {
        matches!(self, Segment::Wildcard(_))
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Literal(text) => f.write_str(text),
            Segment::Param(name) => write!(f, ":{name}"),
            Segment::Wildcard(None) => f.write_str("*"),
            Segment::Wildcard(Some(name)) => write!(f, "*{name}"),
        }
    }
}

/// Split a request path into its non-empty segments.
#[inline]
#[must_use]
pub fn split_path(path: &str) -> SegmentVec<'_> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

/// Parse a route pattern into segments.
#[must_use]
pub fn parse_pattern(pattern: &str) -> Vec<Segment> {
    split_path(pattern).into_iter().map(Segment::parse).collect()
}

/// Capture names in path order, up to and including the first wildcard.
#[must_use]
pub fn capture_names(segments: &[Segment]) -> Arc<[Arc<str>]> {
    let mut names: Vec<Arc<str>> = Vec::new();
    for segment in segments {
        if let Some(name) = segment.capture_name() {
            names.push(Arc::from(name));
        }
        if segment.is_wildcard() {
            break;
        }
    }
    names.into()
}

/// Render segments back into a canonical pattern with a leading slash.
#[must_use]
pub fn render_pattern(segments: &[Segment]) -> String {
    if segments.is_empty() {
        return "/".to_string();
    }
    let mut out = String::new();
    for segment in segments {
        out.push('/');
        out.push_str(&segment.to_string());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_path_elides_empty_segments() {
        let expected: Vec<&str> = vec!["a", "b"];
        for path in ["/a/b", "/a/b/", "//a//b//", "a/b"] {
            assert_eq!(split_path(path).to_vec(), expected, "path {path:?}");
        }
        assert!(split_path("").is_empty());
        assert!(split_path("/").is_empty());
        assert!(split_path("///").is_empty());
    }

    #[test]
    fn test_segment_classification() {
        assert_eq!(Segment::parse("users"), Segment::Literal("users".into()));
        assert_eq!(Segment::parse(":id"), Segment::Param("id".into()));
        assert_eq!(Segment::parse("*"), Segment::Wildcard(None));
        assert_eq!(Segment::parse("*path"), Segment::Wildcard(Some("path".into())));
    }

    #[test]
    fn test_capture_names() {
        assert_eq!(Segment::parse("users").capture_name(), None);
        assert_eq!(Segment::parse(":id").capture_name(), Some("id"));
        assert_eq!(Segment::parse("*").capture_name(), Some("*"));
        assert_eq!(Segment::parse("*rest").capture_name(), Some("rest"));
    }

    #[test]
    fn test_capture_names_stop_at_wildcard() {
        let names = capture_names(&parse_pattern("/orgs/:org/files/*path/:ignored"));
        let names: Vec<&str> = names.iter().map(|n| n.as_ref()).collect();
        assert_eq!(names, vec!["org", "path"]);
    }

    #[test]
    fn test_render_pattern_canonicalizes_slashes() {
        assert_eq!(render_pattern(&parse_pattern("//files//:name/")), "/files/:name");
        assert_eq!(render_pattern(&parse_pattern("static/*")), "/static/*");
        assert_eq!(render_pattern(&parse_pattern("/")), "/");
    }

    #[test]
    fn test_no_escaping_for_capture_prefixes() {
        // A literal that starts with ':' cannot be expressed
        assert_eq!(parse_pattern("/a/:b"), vec![
            Segment::Literal("a".into()),
            Segment::Param("b".into()),
        ]);
    }
}
