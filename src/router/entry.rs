use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Human-readable description attached to a route for introspection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteMetadata {
    /// One-line summary (e.g. "Fetch a single session")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Free-form grouping tags
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl RouteMetadata {
    #[must_use]
    pub fn summary(summary: impl Into<String>) -> Self {
        Self {
            summary: Some(summary.into()),
            tags: Vec::new(),
        }
    }
}

/// Everything registered for one (terminal node, method) pair.
///
/// Capture names live here rather than on the shared tree edges, so two
/// routes that reach the same param edge under different names each report
/// their own names when matched.
#[derive(Clone)]
pub(crate) struct RouteEntry<H, M, D> {
    pub(crate) handler: H,
    pub(crate) middleware: Vec<M>,
    /// Capture names in path order, one per param/wildcard edge on the way here
    pub(crate) captures: Arc<[Arc<str>]>,
    /// Memoized dispatcher, filled by `precompile_all` or on first match
    pub(crate) compiled: OnceCell<D>,
    pub(crate) metadata: Option<RouteMetadata>,
}

impl<H, M, D> RouteEntry<H, M, D> {
    pub(crate) fn new(
        handler: H,
        middleware: Vec<M>,
        captures: Arc<[Arc<str>]>,
        metadata: Option<RouteMetadata>,
    ) -> Self {
        Self {
            handler,
            middleware,
            captures,
            compiled: OnceCell::new(),
            metadata,
        }
    }
}
