use anyhow::Context;
use clap::{Parser, Subcommand};
use http::Method;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::router::{Resolution, RouterConfig};
use crate::runtime_config::RuntimeConfig;
use crate::table::{is_standard_method, load_router, NamedRouter};

/// Command-line interface for trierouter
///
/// Loads a route table and answers questions about it.
#[derive(Parser)]
#[command(name = "trierouter")]
#[command(about = "Inspect and exercise route tables", long_about = None)]
pub struct Cli {
    /// Log level: trace/debug/info/warn/error
    #[arg(long, env = "TRIEROUTER_LOG_LEVEL", default_value = "warn", global = true)]
    pub log_level: String,

    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// List every registered route
    Routes {
        /// Route table file (YAML, JSON or TOML)
        #[arg(short, long)]
        table: PathBuf,

        /// Print JSON instead of one route per line
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Resolve a single request against the table
    Match {
        /// Route table file (YAML, JSON or TOML)
        #[arg(short, long)]
        table: PathBuf,

        /// HTTP method, e.g. GET
        method: String,

        /// Request path, e.g. /users/42
        path: String,
    },
    /// Print structural statistics of the route tree
    Stats {
        /// Route table file (YAML, JSON or TOML)
        #[arg(short, long)]
        table: PathBuf,
    },
}

/// JSON view of a registered route.
#[derive(Debug, Serialize)]
pub struct RouteView {
    pub method: String,
    pub pattern: String,
    pub handler: String,
    pub middleware: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

/// JSON view of a resolution.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ResolutionView {
    Matched {
        handler: String,
        params: BTreeMap<String, String>,
        middleware: Vec<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        chain: Option<String>,
    },
    MethodNotAllowed {
        allowed: Vec<String>,
    },
    NotFound,
}

impl ResolutionView {
    /// HTTP status a framework would answer with
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            ResolutionView::Matched { .. } => 200,
            ResolutionView::MethodNotAllowed { .. } => 405,
            ResolutionView::NotFound => 404,
        }
    }
}

#[must_use]
pub fn route_views(router: &NamedRouter) -> Vec<RouteView> {
    router
        .routes()
        .into_iter()
        .map(|route| RouteView {
            method: route.method.to_string(),
            pattern: route.pattern,
            handler: route.handler.clone(),
            middleware: route.middleware.to_vec(),
            summary: route.metadata.and_then(|m| m.summary.clone()),
        })
        .collect()
}

#[must_use]
pub fn resolve_view(router: &NamedRouter, method: &Method, path: &str) -> ResolutionView {
    match router.resolve(method, path) {
        Resolution::Matched(matched) => ResolutionView::Matched {
            handler: matched.handler.clone(),
            params: matched
                .params
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
            middleware: matched.middleware.to_vec(),
            chain: matched.compiled.cloned(),
        },
        Resolution::MethodNotAllowed(allowed) => ResolutionView::MethodNotAllowed {
            allowed: allowed.iter().map(ToString::to_string).collect(),
        },
        Resolution::NotFound => ResolutionView::NotFound,
    }
}

/// Standard verbs in any case, extension methods as written.
fn parse_method(raw: &str) -> anyhow::Result<Method> {
    let upper = raw.to_ascii_uppercase();
    let candidate = if is_standard_method(&upper) { upper.as_str() } else { raw };
    Method::from_bytes(candidate.as_bytes())
        .with_context(|| format!("invalid HTTP method '{raw}'"))
}

/// Execute a parsed command.
pub fn run_cli(cli: Cli) -> anyhow::Result<()> {
    let config = RouterConfig::from(RuntimeConfig::from_env());

    match cli.command {
        Commands::Routes { table, json } => {
            let router = load_router(&table, config)?;
            let views = route_views(&router);
            if json {
                println!("{}", serde_json::to_string_pretty(&views)?);
            } else {
                for view in &views {
                    println!(
                        "{:<7} {:<40} -> {}",
                        view.method,
                        view.pattern,
                        view.handler
                    );
                }
            }
        }
        Commands::Match {
            table,
            method,
            path,
        } => {
            let router = load_router(&table, config)?;
            let method = parse_method(&method)?;
            let view = resolve_view(&router, &method, &path);
            println!("{}", serde_json::to_string_pretty(&view)?);
        }
        Commands::Stats { table } => {
            let router = load_router(&table, config)?;
            println!("{}", serde_json::to_string_pretty(&router.stats())?);
        }
    }
    Ok(())
}
