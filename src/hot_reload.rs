//! # Hot Reload Module
//!
//! Live reloading of route tables without restarting the process.
//!
//! ## Overview
//!
//! [`watch_table`] watches a route table file and on every modification:
//! 1. **Parse** - the table is loaded and validated
//! 2. **Build** - a complete new router is built and precompiled
//! 3. **Swap** - the new router is stored into the [`SharedRouter`]
//! 4. **Hook** - the caller's callback runs with the new router
//!
//! Requests keep matching against whichever snapshot they loaded; there is
//! no lock between the reloader and request workers.
//!
//! ## Error Handling
//!
//! If the new table fails to parse or validate, the error is logged and the
//! previous router stays active.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use trierouter::hot_reload::watch_table;
//! use trierouter::router::{RouterConfig, SharedRouter};
//! use trierouter::table::load_router;
//!
//! let config = RouterConfig::default();
//! let shared = Arc::new(SharedRouter::new(load_router("routes.yaml", config)?));
//! let _watcher = watch_table("routes.yaml", Arc::clone(&shared), config, |router| {
//!     println!("Reloaded {} routes", router.len());
//! })?;
//! ```

use notify::{Config, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info};

use crate::router::{RouterConfig, SharedRouter};
use crate::table::{load_router, NamedRouter};

/// Rebuild the router from `path` and swap it into `shared`.
///
/// On error `shared` is left untouched. Returns the new route count.
pub fn reload_table(
    path: &Path,
    shared: &SharedRouter<String, String, String>,
    config: RouterConfig,
) -> anyhow::Result<usize> {
    let router = load_router(path, config)?;
    let routes = router.len();
    shared.store(router);
    Ok(routes)
}

/// Watch a route table file and rebuild the shared router when it changes.
///
/// The returned watcher must be kept alive for as long as reloading should
/// happen.
pub fn watch_table<P, F>(
    table_path: P,
    shared: Arc<SharedRouter<String, String, String>>,
    config: RouterConfig,
    mut on_reload: F,
) -> notify::Result<RecommendedWatcher>
where
    P: AsRef<Path>,
    F: FnMut(&NamedRouter) + Send + 'static,
{
    let path: PathBuf = table_path.as_ref().to_path_buf();
    let watch_path = path.clone();

    let mut watcher = RecommendedWatcher::new(
        move |res: Result<notify::Event, notify::Error>| match res {
            Ok(event) => {
                if !matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_)) {
                    return;
                }
                match reload_table(&watch_path, &shared, config) {
                    Ok(routes) => {
                        info!(
                            table = %watch_path.display(),
                            routes_count = routes,
                            "hot-reload: route table applied"
                        );
                        on_reload(&shared.load());
                    }
                    Err(e) => {
                        error!(
                            table = %watch_path.display(),
                            error = %format!("{e:#}"),
                            "hot-reload: keeping previous routes"
                        );
                    }
                }
            }
            Err(e) => error!(error = %e, "hot-reload: watch error"),
        },
        Config::default(),
    )?;

    watcher.watch(&path, RecursiveMode::NonRecursive)?;
    info!(table = %path.display(), "hot-reload: watching route table");
    Ok(watcher)
}
