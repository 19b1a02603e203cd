//! Shared route table with copy-on-write replacement.
//!
//! # Responsibilities
//! - Publish a frozen [`RouteTree`] to any number of concurrent readers
//! - Build trees from configuration
//! - Swap in a freshly built tree on reload
//!
//! # Design Decisions
//! - `Router` is a handle: clones share one published tree and revision
//! - Readers `load` a snapshot; no locks on the match path
//! - Writers never mutate a published tree; they build a new one and `store` it
//! - A reload that fails to build keeps the current tree

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use arc_swap::ArcSwap;

use crate::config::RouterConfig;
use crate::observability::metrics;
use crate::routing::error::RegistrationError;
use crate::routing::params::MatchResult;
use crate::routing::tree::RouteTree;

/// Hot-swappable handle to the current route tree.
///
/// Cloning is cheap; every clone sees the same tree and revision.
#[derive(Debug)]
pub struct Router<T> {
    shared: Arc<Shared<T>>,
}

#[derive(Debug)]
struct Shared<T> {
    tree: ArcSwap<RouteTree<T>>,
    revision: AtomicU64,
}

impl<T> Router<T> {
    /// Publish `tree` as revision 0.
    pub fn new(tree: RouteTree<T>) -> Self {
        Self {
            shared: Arc::new(Shared {
                tree: ArcSwap::from_pointee(tree),
                revision: AtomicU64::new(0),
            }),
        }
    }

    /// Current tree snapshot. Stays valid even if a reload swaps it out.
    pub fn load(&self) -> Arc<RouteTree<T>> {
        self.shared.tree.load_full()
    }

    /// Atomically replace the published tree and return the new revision.
    pub fn replace(&self, tree: RouteTree<T>) -> u64 {
        let routes = tree.len();
        self.shared.tree.store(Arc::new(tree));
        let revision = self.shared.revision.fetch_add(1, Ordering::AcqRel) + 1;
        tracing::info!(revision, routes, "Route tree replaced");
        revision
    }

    /// Number of replacements since construction.
    pub fn revision(&self) -> u64 {
        self.shared.revision.load(Ordering::Acquire)
    }
}

// Manual impl: cloning the handle must not require `T: Clone`.
impl<T> Clone for Router<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T: Clone> Router<T> {
    /// Match `path` against the current tree.
    pub fn match_path(&self, path: &str) -> Option<MatchResult<T>> {
        let start = Instant::now();
        let result = self.shared.tree.load().match_path(path);

        match &result {
            Some(matched) => metrics::record_match(&matched.pattern, start),
            None => metrics::record_no_match(start),
        }
        result
    }
}

impl<T> Default for Router<T> {
    fn default() -> Self {
        Self::new(RouteTree::new())
    }
}

impl Router<String> {
    /// Build a router whose identities are the configured route names.
    pub fn from_config(config: &RouterConfig) -> Result<Self, Vec<RegistrationError>> {
        let tree = build_tree(config)?;
        metrics::record_routes(tree.len());
        Ok(Self::new(tree))
    }

    /// Rebuild from `config` and swap the result in.
    ///
    /// On failure the current tree stays published.
    pub fn reload(&self, config: &RouterConfig) -> Result<u64, Vec<RegistrationError>> {
        match build_tree(config) {
            Ok(tree) => {
                let routes = tree.len();
                let revision = self.replace(tree);
                metrics::record_reload(true, routes);
                Ok(revision)
            }
            Err(errors) => {
                tracing::error!(
                    errors = errors.len(),
                    "Failed to rebuild route tree. Keeping current routes."
                );
                metrics::record_reload(false, self.load().len());
                Err(errors)
            }
        }
    }
}

/// Build a tree from configuration, collecting every registration error.
pub fn build_tree(config: &RouterConfig) -> Result<RouteTree<String>, Vec<RegistrationError>> {
    let mut tree = RouteTree::with_policy(config.duplicate_policy);
    let mut errors = Vec::new();

    for route in &config.routes {
        if let Err(e) = tree.register(&route.pattern, route.name.clone()) {
            tracing::warn!(route = %route.name, error = %e, "Route rejected");
            errors.push(e);
        }
    }

    if errors.is_empty() {
        Ok(tree)
    } else {
        Err(errors)
    }
}
