//! Copy-on-write router snapshots.
//!
//! Matching never locks: readers `load()` the current snapshot and match
//! against it, writers build a complete replacement and `store()` it. A
//! reader that loaded the old snapshot keeps using it until it drops the
//! guard.

use arc_swap::{ArcSwap, Guard};
use std::sync::Arc;
use tracing::info;

use super::core::Router;

/// Router handle shared between request workers and a reloader.
pub struct SharedRouter<H, M = (), D = ()> {
    current: ArcSwap<Router<H, M, D>>,
}

impl<H, M, D> SharedRouter<H, M, D> {
    #[must_use]
    pub fn new(router: Router<H, M, D>) -> Self {
        Self {
            current: ArcSwap::from_pointee(router),
        }
    }

    /// Current snapshot, cheap enough to call per request
    #[inline]
    #[must_use]
    pub fn load(&self) -> Guard<Arc<Router<H, M, D>>> {
        self.current.load()
    }

    /// Current snapshot as an owned `Arc`, for holding across calls
    #[must_use]
    pub fn load_full(&self) -> Arc<Router<H, M, D>> {
        self.current.load_full()
    }

    /// Atomically replace the snapshot.
    pub fn store(&self, router: Router<H, M, D>) {
        let routes = router.len();
        self.current.store(Arc::new(router));
        info!(routes_count = routes, "Router snapshot swapped");
    }

    /// Atomically replace the snapshot, returning the previous one.
    pub fn swap(&self, router: Router<H, M, D>) -> Arc<Router<H, M, D>> {
        self.current.swap(Arc::new(router))
    }
}

impl<H: Clone, M: Clone, D: Clone> SharedRouter<H, M, D> {
    /// Clone the current snapshot, apply `update` to the clone and publish it.
    ///
    /// `update` may run more than once if another writer publishes
    /// concurrently.
    pub fn update<F>(&self, mut update: F)
    where
        F: FnMut(&mut Router<H, M, D>),
    {
        self.current.rcu(|current| {
            let mut next = Router::clone(current);
            update(&mut next);
            next
        });
    }
}

impl<H, M, D> From<Router<H, M, D>> for SharedRouter<H, M, D> {
    fn from(router: Router<H, M, D>) -> Self {
        Self::new(router)
    }
}
