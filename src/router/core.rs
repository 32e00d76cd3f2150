//! Router core module - hot path for request routing.
//!
//! `match_route` splits the path into borrowed segments, walks the tree and
//! only allocates for the returned parameter values (and for wildcard values,
//! which are re-joined from several segments).

#![deny(clippy::inefficient_to_string)]
#![deny(clippy::format_push_string)]
#![deny(clippy::unnecessary_to_owned)]

use http::Method;
use once_cell::sync::OnceCell;
use smallvec::SmallVec;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use super::entry::{RouteEntry, RouteMetadata};
use super::radix::{CaptureVec, CollectedRoute, Descent, RadixNode, RouterStats};
use super::segment::{capture_names, parse_pattern, render_pattern, split_path};
use crate::runtime_config::RuntimeConfig;

/// Maximum number of path parameters before heap allocation.
pub const MAX_INLINE_PARAMS: usize = 8;

/// Stack-allocated parameter storage for the hot path.
///
/// Names are `Arc<str>` shared with the route entry they came from, so
/// building the list is an atomic increment per name plus the value copy.
pub type ParamVec = SmallVec<[(Arc<str>, String); MAX_INLINE_PARAMS]>;

/// Builds a dispatcher from the full middleware chain and the handler.
pub type Compiler<H, M, D> = Arc<dyn Fn(&[M], &H) -> D + Send + Sync>;

/// Tuning knobs for a [`Router`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouterConfig {
    /// Matches slower than this are logged at `warn`
    pub slow_match_threshold: Duration,
    /// Warn when a param/wildcard edge is re-registered under another name
    pub warn_on_rename: bool,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            slow_match_threshold: Duration::from_millis(1),
            warn_on_rename: true,
        }
    }
}

impl From<RuntimeConfig> for RouterConfig {
    fn from(config: RuntimeConfig) -> Self {
        Self {
            slow_match_threshold: Duration::from_micros(config.slow_match_us),
            warn_on_rename: config.warn_on_rename,
        }
    }
}

/// Result of successfully matching a request to a route.
///
/// Borrows the handler, middleware and dispatcher from the router; only the
/// parameter values are owned.
#[derive(Debug)]
pub struct RouteMatch<'r, H, M, D> {
    pub handler: &'r H,
    /// Captures of the matched route, named as that route registered them
    pub params: ParamVec,
    /// Route-specific middleware, in registration order
    pub middleware: &'r [M],
    /// Precompiled dispatcher; `None` when no compiler is installed
    pub compiled: Option<&'r D>,
    pub metadata: Option<&'r RouteMetadata>,
}

impl<H, M, D> RouteMatch<'_, H, M, D> {
    /// Get a path parameter by name.
    ///
    /// Uses "last write wins" semantics when a pattern reuses a name
    /// (e.g. `/org/:id/user/:id` returns the user id).
    #[inline]
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .rfind(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }

    /// Convert params to a HashMap.
    /// Note: This allocates - use param() in hot paths instead
    #[must_use]
    pub fn params_map(&self) -> HashMap<String, String> {
        self.params
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }
}

/// Outcome of [`Router::resolve`]: what a framework needs to pick between
/// dispatching, 405 and 404.
#[derive(Debug)]
pub enum Resolution<'r, H, M, D> {
    Matched(RouteMatch<'r, H, M, D>),
    /// The path exists but not for this method; carries the allowed ones
    MethodNotAllowed(Vec<Method>),
    NotFound,
}

/// One registered route, as reported by [`Router::routes`].
#[derive(Debug)]
pub struct RouteInfo<'r, H, M> {
    pub method: Method,
    /// Canonical pattern (`/users/:id`), captures named by this route
    pub pattern: String,
    pub handler: &'r H,
    pub middleware: &'r [M],
    pub metadata: Option<&'r RouteMetadata>,
}

/// HTTP request router over a segment tree.
///
/// `H` is the handler reference, `M` the middleware reference and `D` the
/// dispatcher produced by an installed compiler. The router stores and
/// returns them but never inspects them.
///
/// Registration mutates the tree and must finish before matching starts;
/// matching takes `&self` and is safe to run from many threads at once.
/// For live updates see [`SharedRouter`](super::SharedRouter).
#[derive(Clone)]
pub struct Router<H, M = (), D = ()> {
    root: RadixNode<H, M, D>,
    compiler: Option<Compiler<H, M, D>>,
    /// Prepended to every route's middleware when compiling
    global_middleware: Vec<M>,
    config: RouterConfig,
    route_count: usize,
}

impl<H, M, D> Default for Router<H, M, D> {
    fn default() -> Self {
        Self::with_config(RouterConfig::default())
    }
}

impl<H, M, D> Router<H, M, D> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_config(config: RouterConfig) -> Self {
        Self {
            root: RadixNode::default(),
            compiler: None,
            global_middleware: Vec::new(),
            config,
            route_count: 0,
        }
    }

    #[must_use]
    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// Number of registered (pattern, method) pairs
    #[must_use]
    pub fn len(&self) -> usize {
        self.route_count
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.route_count == 0
    }

    /// Register a handler for `method` on `pattern`.
    ///
    /// Pattern syntax: literal segments, `:name` for a single-segment capture,
    /// `*` or `*name` for the rest of the path. Leading, trailing and
    /// duplicate slashes are ignored. Registering the same pattern and method
    /// again replaces the previous entry.
    pub fn register(&mut self, method: Method, pattern: &str, handler: H, middleware: Option<Vec<M>>) {
        self.insert(method, pattern, handler, middleware.unwrap_or_default(), None);
    }

    /// Like [`register`](Self::register), attaching introspection metadata.
    pub fn register_with_metadata(
        &mut self,
        method: Method,
        pattern: &str,
        handler: H,
        middleware: Option<Vec<M>>,
        metadata: RouteMetadata,
    ) {
        self.insert(
            method,
            pattern,
            handler,
            middleware.unwrap_or_default(),
            Some(metadata),
        );
    }

    fn insert(
        &mut self,
        method: Method,
        pattern: &str,
        handler: H,
        middleware: Vec<M>,
        metadata: Option<RouteMetadata>,
    ) {
        let segments = parse_pattern(pattern);
        let entry = RouteEntry::new(handler, middleware, capture_names(&segments), metadata);

        debug!(
            method = %method,
            pattern = %render_pattern(&segments),
            "Registering route"
        );

        let created = self
            .root
            .insert(&segments, method, entry, pattern, self.config.warn_on_rename);
        if created {
            self.route_count += 1;
        }
    }

    /// Methods registered at the node `path` resolves to, ignoring the
    /// request method. Empty when the path resolves to no route at all.
    ///
    /// Lets a caller tell "no such path" (404) from "wrong method" (405).
    #[must_use]
    pub fn allowed_methods(&self, path: &str) -> Vec<Method> {
        let segments = split_path(path);
        self.root
            .resolve(&segments)
            .map(|node| node.methods().cloned().collect())
            .unwrap_or_default()
    }

    /// Every registered route. Order is stable but otherwise unspecified.
    #[must_use]
    pub fn routes(&self) -> Vec<RouteInfo<'_, H, M>> {
        let mut collected: Vec<CollectedRoute<'_, H, M, D>> = Vec::with_capacity(self.route_count);
        self.root.collect_routes(&mut collected);
        collected
            .into_iter()
            .map(|route| RouteInfo {
                method: route.method.clone(),
                pattern: route.pattern,
                handler: &route.entry.handler,
                middleware: &route.entry.middleware,
                metadata: route.entry.metadata.as_ref(),
            })
            .collect()
    }

    /// Registered patterns, one per (pattern, method) pair.
    #[must_use]
    pub fn path_patterns(&self) -> Vec<String> {
        self.routes().into_iter().map(|r| r.pattern).collect()
    }

    #[must_use]
    pub fn stats(&self) -> RouterStats {
        let mut stats = RouterStats::default();
        self.root.collect_stats(0, &mut stats);
        stats
    }

    /// Install the function used to build dispatchers.
    ///
    /// Dispatchers built by a previous compiler are discarded.
    pub fn set_compiler<F>(&mut self, compiler: F)
    where
        F: Fn(&[M], &H) -> D + Send + Sync + 'static,
    {
        self.compiler = Some(Arc::new(compiler));
        self.clear_compiled();
    }

    #[must_use]
    pub fn has_compiler(&self) -> bool {
        self.compiler.is_some()
    }

    fn clear_compiled(&mut self) {
        self.root
            .for_each_entry_mut(&mut |entry| entry.compiled = OnceCell::new());
    }
}

impl<H, M: Clone, D> Router<H, M, D> {
    /// Set the middleware prepended to every route when compiling lazily.
    ///
    /// Dispatchers built with the previous global chain are discarded.
    pub fn set_global_middleware(&mut self, global_middleware: Vec<M>) {
        self.global_middleware = global_middleware;
        self.clear_compiled();
    }

    /// Eagerly build the dispatcher of every route with
    /// `global_middleware ++ route middleware`.
    ///
    /// The global chain is kept for routes compiled lazily afterwards.
    /// Returns the number of routes compiled, 0 when no compiler is set.
    pub fn precompile_all(&mut self, global_middleware: Vec<M>) -> usize {
        self.global_middleware = global_middleware;
        let Some(compiler) = self.compiler.as_ref().map(Arc::clone) else {
            warn!("precompile_all called without a compiler; nothing compiled");
            return 0;
        };

        let global = &self.global_middleware;
        let mut compiled = 0usize;
        self.root.for_each_entry_mut(&mut |entry| {
            let chain = full_chain(global, &entry.middleware);
            entry.compiled = OnceCell::with_value(compiler(&chain, &entry.handler));
            compiled += 1;
        });

        info!(
            routes_compiled = compiled,
            global_middleware = self.global_middleware.len(),
            "Precompiled route dispatchers"
        );
        compiled
    }

    /// Match a request to a route.
    ///
    /// Returns `None` when no route matches the path and method; use
    /// [`allowed_methods`](Self::allowed_methods) or [`resolve`](Self::resolve)
    /// to tell 404 from 405. When a compiler is installed and the route has no
    /// dispatcher yet, it is built here and memoized on the route.
    #[must_use]
    pub fn match_route(&self, method: &Method, path: &str) -> Option<RouteMatch<'_, H, M, D>> {
        let match_start = Instant::now();

        let segments = split_path(path);
        let mut captures = CaptureVec::new();
        let result = match self.root.search(&segments, method, &mut captures) {
            Descent::Found(entry) => Some(self.build_match(entry, captures)),
            Descent::Miss => None,
        };

        let match_duration = match_start.elapsed();
        if match_duration > self.config.slow_match_threshold {
            warn!(
                method = %method,
                path = %path,
                segments = segments.len(),
                matched = result.is_some(),
                duration_us = match_duration.as_micros(),
                "Slow route matching detected"
            );
        } else if let Some(matched) = &result {
            debug!(
                method = %method,
                path = %path,
                path_params = ?matched.params,
                duration_us = match_duration.as_micros(),
                "Route matched"
            );
        } else {
            debug!(
                method = %method,
                path = %path,
                duration_us = match_duration.as_micros(),
                "No route matched"
            );
        }

        result
    }

    /// Match and, on a miss, classify it as 405 or 404.
    #[must_use]
    pub fn resolve(&self, method: &Method, path: &str) -> Resolution<'_, H, M, D> {
        if let Some(matched) = self.match_route(method, path) {
            return Resolution::Matched(matched);
        }
        let allowed = self.allowed_methods(path);
        if allowed.is_empty() {
            Resolution::NotFound
        } else {
            Resolution::MethodNotAllowed(allowed)
        }
    }

    fn build_match<'r>(
        &'r self,
        entry: &'r RouteEntry<H, M, D>,
        captures: CaptureVec<'_>,
    ) -> RouteMatch<'r, H, M, D> {
        let params: ParamVec = entry
            .captures
            .iter()
            .zip(captures)
            .map(|(name, value)| (Arc::clone(name), value.into_owned()))
            .collect();

        let compiled = match &self.compiler {
            Some(compiler) => Some(entry.compiled.get_or_init(|| {
                let chain = full_chain(&self.global_middleware, &entry.middleware);
                compiler(&chain, &entry.handler)
            })),
            None => entry.compiled.get(),
        };

        RouteMatch {
            handler: &entry.handler,
            params,
            middleware: &entry.middleware,
            compiled,
            metadata: entry.metadata.as_ref(),
        }
    }
}

impl<H, M, D> fmt::Debug for Router<H, M, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("routes", &self.route_count)
            .field("has_compiler", &self.compiler.is_some())
            .field("global_middleware", &self.global_middleware.len())
            .field("config", &self.config)
            .finish()
    }
}

impl<H: fmt::Debug, M, D> Router<H, M, D> {
    /// Print all registered routes to stdout
    pub fn dump_routes(&self) {
        println!("[routes] count={}", self.route_count);
        for route in self.routes() {
            println!(
                "[route] {} {} -> {:?}",
                route.method, route.pattern, route.handler
            );
        }
    }
}

fn full_chain<M: Clone>(global: &[M], route: &[M]) -> Vec<M> {
    global.iter().chain(route).cloned().collect()
}
