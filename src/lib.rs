//! # trierouter
//!
//! A segment-trie HTTP request router with priority-ordered backtracking
//! matching.
//!
//! ## Overview
//!
//! Route patterns are split on `/` into segments of three kinds:
//!
//! - **literal** - `users` matches only `users`
//! - **param** - `:id` captures exactly one segment
//! - **wildcard** - `*path` captures one or more trailing segments
//!
//! Matching tries literal, then param, then wildcard at every level and
//! backtracks when a branch dead-ends, so the most specific route always wins.
//!
//! Each route carries a handler, a middleware list and a lazily compiled
//! dispatcher built by a user-supplied compiler function.
//!
//! ## Architecture
//!
//! - **[`router`]** - the trie, matching, method lookup and compiled dispatchers
//! - **[`table`]** - route tables loaded from YAML, JSON or TOML files
//! - **[`hot_reload`]** - rebuild and swap a shared router when its table changes
//! - **[`runtime_config`]** - environment-driven runtime knobs
//! - **[`logging`]** - `tracing-subscriber` setup for binaries
//! - **[`cli`]** - the `trierouter` command-line tool
//!
//! ## Quick Start
//!
//! ```rust
//! use http::Method;
//! use trierouter::Router;
//!
//! let mut router: Router<&str> = Router::new();
//! router.register(Method::GET, "/users/:id", "get_user", None);
//! router.register(Method::GET, "/files/*path", "serve_file", None);
//!
//! let matched = router.match_route(&Method::GET, "/users/42").unwrap();
//! assert_eq!(*matched.handler, "get_user");
//! assert_eq!(matched.param("id"), Some("42"));
//!
//! let matched = router.match_route(&Method::GET, "/files/a/b.txt").unwrap();
//! assert_eq!(matched.param("path"), Some("a/b.txt"));
//! ```

pub mod cli;
pub mod hot_reload;
pub mod logging;
pub mod router;
pub mod runtime_config;
pub mod table;

pub use router::{
    Resolution, RouteInfo, RouteMatch, RouteMetadata, Router, RouterConfig, RouterStats,
    SharedRouter,
};
pub use runtime_config::RuntimeConfig;
