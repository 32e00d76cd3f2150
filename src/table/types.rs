use http::Method;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::router::RouteMetadata;

/// One route as written in a route table file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteDef {
    /// HTTP method, case-insensitive for the standard verbs
    pub method: String,
    /// Route pattern, e.g. `/users/:id` or `/static/*path`
    pub path: String,
    /// Handler name
    pub handler: String,
    /// Route-specific middleware names, applied after the global ones
    #[serde(default)]
    pub middleware: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl RouteDef {
    /// Parsed method. Standard verbs are accepted in any case; anything else
    /// must be a valid extension token and is kept as written.
    pub fn parsed_method(&self) -> Result<Method, TableError> {
        let upper = self.method.to_ascii_uppercase();
        let candidate = if is_standard_method(&upper) {
            upper.as_str()
        } else {
            self.method.as_str()
        };
        Method::from_bytes(candidate.as_bytes()).map_err(|_| TableError::InvalidMethod {
            method: self.method.clone(),
            path: self.path.clone(),
        })
    }

    /// Metadata to attach, `None` when the definition has neither summary nor tags
    #[must_use]
    pub fn metadata(&self) -> Option<RouteMetadata> {
        if self.summary.is_none() && self.tags.is_empty() {
            return None;
        }
        Some(RouteMetadata {
            summary: self.summary.clone(),
            tags: self.tags.clone(),
        })
    }
}

pub(crate) fn is_standard_method(upper: &str) -> bool {
    matches!(
        upper,
        "GET" | "POST" | "PUT" | "DELETE" | "PATCH" | "OPTIONS" | "HEAD" | "TRACE" | "CONNECT"
    )
}

/// Contents of a route table file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteTable {
    /// Prefix prepended to every route path (e.g. `/api/v1`)
    #[serde(default)]
    pub base_path: String,
    /// Middleware names prepended to every route's chain
    #[serde(default)]
    pub global_middleware: Vec<String>,
    #[serde(default)]
    pub routes: Vec<RouteDef>,
}

/// Route table validation error
///
/// Returned when a table parses but describes a route that cannot be
/// registered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    /// The method string is not a valid HTTP method token
    InvalidMethod {
        /// The method as written in the table
        method: String,
        /// Path of the offending route
        path: String,
    },
    /// A route has an empty handler name
    MissingHandler {
        /// Path of the offending route
        path: String,
    },
}

impl fmt::Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableError::InvalidMethod { method, path } => {
                write!(
                    f,
                    "Route table error: invalid HTTP method '{}' for path '{}'",
                    method, path
                )
            }
            TableError::MissingHandler { path } => {
                write!(
                    f,
                    "Route table error: route '{}' has no handler name",
                    path
                )
            }
        }
    }
}

impl std::error::Error for TableError {}
