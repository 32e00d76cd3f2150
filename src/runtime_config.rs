//! # Runtime Configuration Module
//!
//! Environment variable based configuration for router behavior.
//!
//! ## Environment Variables
//!
//! ### `TRIEROUTER_SLOW_MATCH_US`
//!
//! Threshold in microseconds above which a single match is logged at `warn`
//! as a slow match. Accepts decimal values.
//!
//! Default: `1000` (1 ms)
//!
//! ### `TRIEROUTER_WARN_ON_RENAME`
//!
//! Whether to warn when two registrations reach the same param or wildcard
//! position under different capture names (`/users/:id` and
//! `/users/:user_id/posts`). Accepts `true`/`false`/`1`/`0`.
//!
//! Default: `true`
//!
//! ## Usage
//!
//! ```rust
//! use trierouter::router::{Router, RouterConfig};
//! use trierouter::runtime_config::RuntimeConfig;
//!
//! let config = RuntimeConfig::from_env();
//! let router: Router<&str> = Router::with_config(RouterConfig::from(config));
//! assert!(router.is_empty());
//! ```

use std::env;

const DEFAULT_SLOW_MATCH_US: u64 = 1000;

/// Runtime configuration loaded from environment variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Slow match threshold in microseconds (default: 1000)
    pub slow_match_us: u64,
    /// Warn on diverging capture names at a shared position (default: true)
    pub warn_on_rename: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            slow_match_us: DEFAULT_SLOW_MATCH_US,
            warn_on_rename: true,
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let slow_match_us = lookup("TRIEROUTER_SLOW_MATCH_US")
            .and_then(|val| val.trim().parse().ok())
            .unwrap_or(DEFAULT_SLOW_MATCH_US);
        let warn_on_rename = lookup("TRIEROUTER_WARN_ON_RENAME")
            .and_then(|val| parse_bool(&val))
            .unwrap_or(true);
        RuntimeConfig {
            slow_match_us,
            warn_on_rename,
        }
    }
}

fn parse_bool(val: &str) -> Option<bool> {
    match val.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = RuntimeConfig::from_lookup(lookup_from(&[]));
        assert_eq!(config, RuntimeConfig::default());
    }

    #[test]
    fn test_reads_values() {
        let config = RuntimeConfig::from_lookup(lookup_from(&[
            ("TRIEROUTER_SLOW_MATCH_US", "250"),
            ("TRIEROUTER_WARN_ON_RENAME", "off"),
        ]));
        assert_eq!(config.slow_match_us, 250);
        assert!(!config.warn_on_rename);
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = RuntimeConfig::from_lookup(lookup_from(&[
            ("TRIEROUTER_SLOW_MATCH_US", "fast"),
            ("TRIEROUTER_WARN_ON_RENAME", "maybe"),
        ]));
        assert_eq!(config, RuntimeConfig::default());
    }
}
