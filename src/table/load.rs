use anyhow::Context;
use std::path::Path;
use tracing::info;

use super::types::{RouteTable, TableError};
use crate::router::{Router, RouterConfig};

/// Router built from a route table: handlers, middleware and dispatchers are
/// all referred to by name.
pub type NamedRouter = Router<String, String, String>;

/// Serialization format of a route table file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    Yaml,
    Json,
    Toml,
}

impl TableFormat {
    /// Detect the format from a file extension, defaulting to YAML.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("json") => TableFormat::Json,
            Some("toml") => TableFormat::Toml,
            _ => TableFormat::Yaml,
        }
    }
}

/// Parse a route table from a string.
pub fn parse_table(content: &str, format: TableFormat) -> anyhow::Result<RouteTable> {
    let table: RouteTable = match format {
        TableFormat::Yaml => serde_yaml::from_str(content).context("invalid YAML route table")?,
        TableFormat::Json => serde_json::from_str(content).context("invalid JSON route table")?,
        TableFormat::Toml => toml::from_str(content).context("invalid TOML route table")?,
    };
    Ok(table)
}

/// Load a route table file, detecting the format from its extension.
pub fn load_table(path: impl AsRef<Path>) -> anyhow::Result<RouteTable> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read route table {}", path.display()))?;
    parse_table(&content, TableFormat::from_path(path))
        .with_context(|| format!("failed to parse route table {}", path.display()))
}

/// Load a route table file and build a router from it.
pub fn load_router(path: impl AsRef<Path>, config: RouterConfig) -> anyhow::Result<NamedRouter> {
    let path = path.as_ref();
    let table = load_table(path)?;
    let router = table.build_router(config)?;
    info!(
        table = %path.display(),
        routes_count = router.len(),
        base_path = %table.base_path,
        "Route table loaded"
    );
    Ok(router)
}

/// Compiler for named chains: renders `"mw1 -> mw2 -> handler"`.
#[allow(clippy::ptr_arg)] // signature is fixed by `Router::set_compiler`
#[must_use]
pub fn chain_compiler(middleware: &[String], handler: &String) -> String {
    middleware
        .iter()
        .chain(std::iter::once(handler))
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" -> ")
}

impl RouteTable {
    /// Register every route into a fresh router.
    ///
    /// The router gets [`chain_compiler`] installed and is precompiled with
    /// the table's global middleware.
    pub fn build_router(&self, config: RouterConfig) -> Result<NamedRouter, TableError> {
        let mut router = NamedRouter::with_config(config);
        let base = self.base_path.trim_end_matches('/');

        for def in &self.routes {
            let method = def.parsed_method()?;
            if def.handler.trim().is_empty() {
                return Err(TableError::MissingHandler {
                    path: def.path.clone(),
                });
            }

            let pattern = format!("{}/{}", base, def.path.trim_start_matches('/'));
            let middleware = Some(def.middleware.clone());
            match def.metadata() {
                Some(metadata) => router.register_with_metadata(
                    method,
                    &pattern,
                    def.handler.clone(),
                    middleware,
                    metadata,
                ),
                None => router.register(method, &pattern, def.handler.clone(), middleware),
            }
        }

        router.set_compiler(chain_compiler);
        router.precompile_all(self.global_middleware.clone());
        Ok(router)
    }
}
