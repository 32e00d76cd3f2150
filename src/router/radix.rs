//! Segment tree used for route matching
//!
//! Every node represents one level of a path. A node can be left through:
//! - any number of literal edges, keyed by exact segment text
//! - at most one param edge (`:name`), which consumes exactly one segment
//! - at most one wildcard edge (`*` / `*name`), which consumes the whole remainder
//!
//! Route entries are stored on the node where a pattern ends, keyed by HTTP
//! method. Wildcard nodes are leaves; nothing is ever inserted below them.
//!
//! ## Matching
//!
//! Lookup is a depth-first search that consumes one segment per level and
//! tries the edges in priority order: literal, then param, then wildcard.
//! A branch that fails to produce an entry for the requested method (dead
//! end, or terminal node without that method) hands control back to the
//! caller, which carries on with the next edge at the same level. Each
//! level has at most three options and is never revisited once exhausted,
//! so the cost is linear in the number of path segments.
//!
//! ```text
//! /users/admin/dashboard   GET
//! /users/:id/profile       GET
//!
//! (root) ── users ──┬── admin ── dashboard  {GET}
//!                   └── :id ──── profile    {GET}
//!
//! GET /users/admin/profile
//!   users → admin → (no "profile" literal, no param, no wildcard) → miss
//!   users → :id=admin → profile → GET  ✓
//! ```

use http::Method;
use smallvec::SmallVec;
use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::warn;

use super::entry::RouteEntry;
use super::segment::{Segment, ANONYMOUS_WILDCARD};

/// Maximum captures kept inline while descending.
pub const MAX_INLINE_CAPTURES: usize = 8;

/// Captured values in path order. Params borrow from the request path;
/// wildcard values are re-joined and therefore owned.
pub(crate) type CaptureVec<'p> = SmallVec<[Cow<'p, str>; MAX_INLINE_CAPTURES]>;

/// Outcome of a subtree search.
pub(crate) enum Descent<'t, H, M, D> {
    Found(&'t RouteEntry<H, M, D>),
    Miss,
}

/// Which kind of capture edge a diagnostic refers to.
#[derive(Debug, Clone, Copy)]
enum EdgeKind {
    Param,
    Wildcard,
}

impl EdgeKind {
    fn as_str(self) -> &'static str {
        match self {
            EdgeKind::Param => "param",
            EdgeKind::Wildcard => "wildcard",
        }
    }
}

/// Param or wildcard edge together with the node it leads to.
#[derive(Clone)]
pub(crate) struct CaptureEdge<H, M, D> {
    /// Name bound by the most recent registration through this edge
    pub(crate) name: Arc<str>,
    pub(crate) node: RadixNode<H, M, D>,
}

/// Node in the segment tree
#[derive(Clone)]
pub(crate) struct RadixNode<H, M, D> {
    literals: HashMap<String, RadixNode<H, M, D>>,
    param: Option<Box<CaptureEdge<H, M, D>>>,
    wildcard: Option<Box<CaptureEdge<H, M, D>>>,
    /// Entries for routes ending here, in registration order
    methods: Vec<(Method, RouteEntry<H, M, D>)>,
}

impl<H, M, D> Default for RadixNode<H, M, D> {
    fn default() -> Self {
        Self {
            literals: HashMap::new(),
            param: None,
            wildcard: None,
            methods: Vec::new(),
        }
    }
}

/// Label of an edge on the way down, used to rebuild patterns.
#[derive(Clone, Copy)]
enum EdgeLabel<'t> {
    Literal(&'t str),
    Param,
    Wildcard,
}

/// Route reconstructed from the tree.
pub(crate) struct CollectedRoute<'t, H, M, D> {
    pub(crate) method: &'t Method,
    pub(crate) pattern: String,
    pub(crate) entry: &'t RouteEntry<H, M, D>,
}

/// Structural counters gathered by a full walk.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct RouterStats {
    pub total_nodes: usize,
    pub total_routes: usize,
    pub param_edges: usize,
    pub wildcard_edges: usize,
    pub max_depth: usize,
}

impl<H, M, D> RadixNode<H, M, D> {
    /// Entry registered here for `method`, if any.
    #[inline]
    pub(crate) fn entry(&self, method: &Method) -> Option<&RouteEntry<H, M, D>> {
        self.methods
            .iter()
            .find(|(m, _)| m == method)
            .map(|(_, entry)| entry)
    }

    /// Store an entry, replacing any previous one for the same method.
    /// Returns `true` when the (node, method) pair is new.
    fn set_entry(&mut self, method: Method, entry: RouteEntry<H, M, D>) -> bool {
        if let Some(slot) = self.methods.iter_mut().find(|(m, _)| *m == method) {
            slot.1 = entry;
            return false;
        }
        self.methods.push((method, entry));
        true
    }

    /// Take the existing capture edge from `slot` or create it, rebinding its
    /// name when a registration supplies a different one.
    fn capture_edge<'a>(
        slot: &'a mut Option<Box<CaptureEdge<H, M, D>>>,
        name: &str,
        kind: EdgeKind,
        pattern: &str,
        warn_on_rename: bool,
    ) -> &'a mut CaptureEdge<H, M, D> {
        let existed = slot.is_some();
        let edge = slot.get_or_insert_with(|| {
            Box::new(CaptureEdge {
                name: Arc::from(name),
                node: RadixNode::default(),
            })
        });
        if existed && edge.name.as_ref() != name {
            if warn_on_rename {
                warn!(
                    edge = kind.as_str(),
                    previous_name = %edge.name,
                    new_name = %name,
                    pattern = %pattern,
                    "Capture name differs from an earlier route sharing this position"
                );
            }
            edge.name = Arc::from(name);
        }
        &mut **edge
    }

    /// Insert a route entry below this node.
    ///
    /// Segments following a wildcard are dropped (wildcards are leaves).
    /// Returns `true` when a new (node, method) pair was created, `false`
    /// when an existing entry was overwritten.
    pub(crate) fn insert(
        &mut self,
        segments: &[Segment],
        method: Method,
        entry: RouteEntry<H, M, D>,
        pattern: &str,
        warn_on_rename: bool,
    ) -> bool {
        let mut node = self;

        for (index, segment) in segments.iter().enumerate() {
            match segment {
                Segment::Literal(text) => {
                    node = node.literals.entry(text.clone()).or_default();
                }
                Segment::Param(name) => {
                    let edge = Self::capture_edge(
                        &mut node.param,
                        name,
                        EdgeKind::Param,
                        pattern,
                        warn_on_rename,
                    );
                    node = &mut edge.node;
                }
                Segment::Wildcard(name) => {
                    let edge = Self::capture_edge(
                        &mut node.wildcard,
                        name.as_deref().unwrap_or(ANONYMOUS_WILDCARD),
                        EdgeKind::Wildcard,
                        pattern,
                        warn_on_rename,
                    );
                    node = &mut edge.node;

                    let dropped = segments.len() - index - 1;
                    if dropped > 0 {
                        warn!(
                            pattern = %pattern,
                            dropped_segments = dropped,
                            "Segments after a wildcard are ignored"
                        );
                    }
                    break;
                }
            }
        }

        node.set_entry(method, entry)
    }

    /// Search for the entry matching `segments` under `method`.
    ///
    /// On `Found`, `captures` holds one value per capture edge taken. On
    /// `Miss`, `captures` is left exactly as it was passed in.
    pub(crate) fn search<'t, 'p>(
        &'t self,
        segments: &[&'p str],
        method: &Method,
        captures: &mut CaptureVec<'p>,
    ) -> Descent<'t, H, M, D> {
        let Some((&segment, rest)) = segments.split_first() else {
            return match self.entry(method) {
                Some(entry) => Descent::Found(entry),
                None => Descent::Miss,
            };
        };

        if let Some(child) = self.literals.get(segment) {
            if let Descent::Found(entry) = child.search(rest, method, captures) {
                return Descent::Found(entry);
            }
        }

        if let Some(edge) = &self.param {
            captures.push(Cow::Borrowed(segment));
            if let Descent::Found(entry) = edge.node.search(rest, method, captures) {
                return Descent::Found(entry);
            }
            // Backtrack
            captures.pop();
        }

        if let Some(edge) = &self.wildcard {
            if let Some(entry) = edge.node.entry(method) {
                captures.push(Cow::Owned(segments.join("/")));
                return Descent::Found(entry);
            }
        }

        Descent::Miss
    }

    /// Node a path resolves to when the method is ignored.
    ///
    /// Uses the same edge priority as [`search`](Self::search); nodes without
    /// any registered method are not resolutions and the search moves on.
    pub(crate) fn resolve(&self, segments: &[&str]) -> Option<&Self> {
        let Some((&segment, rest)) = segments.split_first() else {
            return (!self.methods.is_empty()).then_some(self);
        };

        self.literals
            .get(segment)
            .and_then(|child| child.resolve(rest))
            .or_else(|| self.param.as_ref().and_then(|edge| edge.node.resolve(rest)))
            .or_else(|| {
                self.wildcard
                    .as_ref()
                    .map(|edge| &edge.node)
                    .filter(|node| !node.methods.is_empty())
            })
    }

    /// Methods registered at this node, in registration order.
    pub(crate) fn methods(&self) -> impl Iterator<Item = &Method> {
        self.methods.iter().map(|(method, _)| method)
    }

    /// Every route below this node. Literal children are visited in sorted
    /// order so the listing is stable.
    pub(crate) fn collect_routes<'t>(&'t self, out: &mut Vec<CollectedRoute<'t, H, M, D>>) {
        let mut labels = Vec::new();
        self.collect_into(&mut labels, out);
    }

    fn collect_into<'t>(
        &'t self,
        labels: &mut Vec<EdgeLabel<'t>>,
        out: &mut Vec<CollectedRoute<'t, H, M, D>>,
    ) {
        for (method, entry) in &self.methods {
            out.push(CollectedRoute {
                method,
                pattern: render_labels(labels, &entry.captures),
                entry,
            });
        }

        let mut children: Vec<(&'t String, &'t Self)> = self.literals.iter().collect();
        children.sort_by(|a, b| a.0.cmp(b.0));
        for (text, child) in children {
            labels.push(EdgeLabel::Literal(text));
            child.collect_into(labels, out);
            labels.pop();
        }

        if let Some(edge) = &self.param {
            labels.push(EdgeLabel::Param);
            edge.node.collect_into(labels, out);
            labels.pop();
        }

        if let Some(edge) = &self.wildcard {
            labels.push(EdgeLabel::Wildcard);
            edge.node.collect_into(labels, out);
            labels.pop();
        }
    }

    /// Apply `f` to every entry in the subtree.
    pub(crate) fn for_each_entry_mut(&mut self, f: &mut impl FnMut(&mut RouteEntry<H, M, D>)) {
        for (_, entry) in &mut self.methods {
            f(entry);
        }
        for child in self.literals.values_mut() {
            child.for_each_entry_mut(f);
        }
        if let Some(edge) = &mut self.param {
            edge.node.for_each_entry_mut(f);
        }
        if let Some(edge) = &mut self.wildcard {
            edge.node.for_each_entry_mut(f);
        }
    }

    pub(crate) fn collect_stats(&self, depth: usize, stats: &mut RouterStats) {
        stats.total_nodes += 1;
        stats.max_depth = stats.max_depth.max(depth);
        stats.total_routes += self.methods.len();

        for child in self.literals.values() {
            child.collect_stats(depth + 1, stats);
        }
        if let Some(edge) = &self.param {
            stats.param_edges += 1;
            edge.node.collect_stats(depth + 1, stats);
        }
        if let Some(edge) = &self.wildcard {
            stats.wildcard_edges += 1;
            edge.node.collect_stats(depth + 1, stats);
        }
    }
}

/// Rebuild a pattern from edge labels, naming captures from the entry.
fn render_labels(labels: &[EdgeLabel<'_>], captures: &[Arc<str>]) -> String {
    if labels.is_empty() {
        return "/".to_string();
    }

    let mut names = captures.iter();
    let mut out = String::new();
    for label in labels {
        out.push('/');
        match label {
            EdgeLabel::Literal(text) => out.push_str(text),
            EdgeLabel::Param => {
                out.push(':');
                if let Some(name) = names.next() {
                    out.push_str(name);
                }
            }
            EdgeLabel::Wildcard => {
                out.push('*');
                match names.next() {
                    Some(name) if name.as_ref() != ANONYMOUS_WILDCARD => out.push_str(name),
                    _ => {}
                }
            }
        }
    }
    out
}
