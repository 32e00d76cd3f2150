//! # Router Module
//!
//! The router module provides path matching and route resolution for trierouter.
//! Routes are stored in a segment tree and matched with a priority-ordered,
//! backtracking depth-first search.
//!
//! ## Overview
//!
//! The router is responsible for:
//! - Parsing route patterns (`/users/:id`, `/files/*path`) into segments
//! - Building the segment tree and attaching route entries per HTTP method
//! - Matching incoming requests and extracting named path parameters
//! - Answering "which methods exist for this path" so callers can tell 404 from 405
//! - Enumerating registered routes for introspection
//! - Memoizing precompiled dispatchers per route
//!
//! ## Matching Priority
//!
//! At every level the matcher tries, in order:
//!
//! 1. the literal child equal to the current segment
//! 2. the param child, binding the current segment
//! 3. the wildcard child, binding all remaining segments joined with `/`
//!
//! A branch that cannot be completed for the requested method falls back to
//! the next option at the same level, so `/users/admin/profile` still reaches
//! `/users/:id/profile` when `/users/admin/dashboard` is also registered.
//!
//! ## Example
//!
//! ```rust
//! use http::Method;
//! use trierouter::router::Router;
//!
//! let mut router: Router<&str> = Router::new();
//! router.register(Method::GET, "/sessions/:id", "get_session", None);
//! router.register(Method::GET, "/files/*path", "get_file", None);
//!
//! let matched = router.match_route(&Method::GET, "/sessions/42").unwrap();
//! assert_eq!(*matched.handler, "get_session");
//! assert_eq!(matched.param("id"), Some("42"));
//!
//! let matched = router.match_route(&Method::GET, "/files/a/b/c.txt").unwrap();
//! assert_eq!(matched.param("path"), Some("a/b/c.txt"));
//!
//! assert!(router.match_route(&Method::POST, "/sessions/42").is_none());
//! assert_eq!(router.allowed_methods("/sessions/42"), vec![Method::GET]);
//! ```
//!
//! ## Performance
//!
//! - Lookup cost is linear in the number of path segments; at most three
//!   options are tried per level and no level is revisited once exhausted
//! - Path segments are borrowed from the request path; parameter storage is
//!   inline for up to [`MAX_INLINE_PARAMS`] captures

mod core;
mod entry;
mod radix;
pub mod segment;
mod shared;

pub use self::core::{
    Compiler, ParamVec, Resolution, RouteInfo, RouteMatch, Router, RouterConfig, MAX_INLINE_PARAMS,
};
pub use entry::RouteMetadata;
pub use radix::RouterStats;
pub use segment::Segment;
pub use shared::SharedRouter;
