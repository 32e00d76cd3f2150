//! # CLI Module
//!
//! Command-line access to route tables.
//!
//! ## Commands
//!
//! ### `routes`
//!
//! List every route in a table:
//!
//! ```bash
//! trierouter routes --table routes.yaml
//! trierouter routes --table routes.yaml --json
//! ```
//!
//! ### `match`
//!
//! Resolve a request the way a framework would, reporting the handler and
//! params, a 405 with the allowed methods, or a 404:
//!
//! ```bash
//! trierouter match --table routes.yaml GET /sessions/42/messages
//! ```
//!
//! ### `stats`
//!
//! Print node, route and edge counts of the built tree:
//!
//! ```bash
//! trierouter stats --table routes.yaml
//! ```

mod commands;

#[cfg(test)]
mod tests;

pub use commands::{
    resolve_view, route_views, run_cli, Cli, Commands, ResolutionView, RouteView,
};
