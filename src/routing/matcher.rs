//! Request path matching.
//!
//! # Responsibilities
//! - Walk the trie depth-first, one path segment per level
//! - Prefer the literal edge, fall back to the placeholder edge
//! - Capture placeholder values along the winning branch only
//!
//! # Design Decisions
//! - A match requires every segment consumed and a terminal at the last node
//! - Backtracking pops the captures of an abandoned placeholder branch
//! - Each node is visited at most once per lookup: bounded by tree size
//! - Read-only: no locks, any number of concurrent lookups per tree

use crate::routing::params::{MatchResult, Params};
use crate::routing::pattern::split_path;
use crate::routing::tree::{Node, RouteTree, Terminal};

impl<T: Clone> RouteTree<T> {
    /// Match a request path. `None` is the ordinary "not found" outcome.
    pub fn match_path(&self, path: &str) -> Option<MatchResult<T>> {
        let segments = split_path(path);
        let mut captured = Vec::new();

        let Some(terminal) = search(&self.root, &segments, &mut captured) else {
            tracing::trace!(path, "No route matched");
            return None;
        };

        let mut params = Params::new();
        for (name, value) in captured {
            params.push(name, value);
        }

        tracing::trace!(path, route = %terminal.pattern, "Route matched");
        Some(MatchResult {
            route: terminal.route.clone(),
            pattern: terminal.pattern.clone(),
            params,
        })
    }
}

fn search<'t, 'p, T>(
    node: &'t Node<T>,
    segments: &[&'p str],
    captured: &mut Vec<(&'t str, &'p str)>,
) -> Option<&'t Terminal<T>> {
    let Some((&segment, remaining)) = segments.split_first() else {
        return node.terminal.as_ref();
    };

    // Neither edge kind accepts an empty segment.
    if segment.is_empty() {
        return None;
    }

    if let Some(child) = node.literal_children.get(segment) {
        if let Some(terminal) = search(child, remaining, captured) {
            return Some(terminal);
        }
    }

    if let Some(edge) = &node.placeholder_child {
        captured.push((edge.name.as_str(), segment));
        if let Some(terminal) = search(&edge.node, remaining, captured) {
            return Some(terminal);
        }
        captured.pop();
    }

    None
}
