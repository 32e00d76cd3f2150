//! # Route Table Module
//!
//! Loads route definitions from a YAML, JSON or TOML file and builds a
//! [`Router`](crate::router::Router) whose handlers, middleware and
//! dispatchers are plain names.
//!
//! ## File Format
//!
//! ```yaml
//! base_path: /api/v1
//! global_middleware: [cors, request_log]
//! routes:
//!   - method: GET
//!     path: /sessions/:id
//!     handler: get_session
//!     middleware: [auth]
//!     summary: Fetch a single session
//!     tags: [sessions]
//!   - method: GET
//!     path: /assets/*path
//!     handler: serve_asset
//! ```
//!
//! The format is picked from the file extension (`.json`, `.toml`, anything
//! else is read as YAML).

mod load;
mod types;

pub use load::{
    chain_compiler, load_router, load_table, parse_table, NamedRouter, TableFormat,
};
pub(crate) use types::is_standard_method;
pub use types::{RouteDef, RouteTable, TableError};
