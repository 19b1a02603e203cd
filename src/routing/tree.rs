//! Segment trie construction.
//!
//! # Responsibilities
//! - Own the trie of literal and placeholder edges
//! - Insert parsed patterns, reusing shared prefixes
//! - Detect placeholder conflicts and duplicate terminals
//!
//! # Design Decisions
//! - Strict ownership: every node has exactly one parent, no back-references
//! - At most one placeholder child per node
//! - Insertion validates the whole walk before mutating, so a failed
//!   registration leaves the tree untouched
//! - Only the build phase takes `&mut self`; matching borrows immutably

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::routing::error::{RegistrationError, RegistrationResult};
use crate::routing::pattern::{parse_pattern, render_pattern, Segment};

/// What to do when a second, different identity claims an existing terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Fail the registration with [`RegistrationError::DuplicateRoute`].
    #[default]
    Reject,
    /// Keep the first identity and ignore later ones.
    FirstWins,
}

/// A trie vertex: the path prefix matched so far.
#[derive(Debug)]
pub(crate) struct Node<T> {
    pub(crate) literal_children: HashMap<String, Node<T>>,
    pub(crate) placeholder_child: Option<Box<PlaceholderEdge<T>>>,
    pub(crate) terminal: Option<Terminal<T>>,
}

/// The single wildcard edge out of a node, with its declared name.
#[derive(Debug)]
pub(crate) struct PlaceholderEdge<T> {
    pub(crate) name: String,
    pub(crate) node: Node<T>,
}

/// Route bound to a node where a registered pattern ends.
#[derive(Debug)]
pub(crate) struct Terminal<T> {
    pub(crate) pattern: String,
    pub(crate) route: T,
}

impl<T> Node<T> {
    fn new() -> Self {
        Self {
            literal_children: HashMap::new(),
            placeholder_child: None,
            terminal: None,
        }
    }
}

/// Outcome of the read-only validation walk.
enum Planned {
    Insert,
    Unchanged,
}

/// A prefix tree of route patterns.
///
/// Built once with [`RouteTree::register`], then frozen and shared for
/// matching (see [`Router`](crate::routing::Router) for hot replacement).
#[derive(Debug)]
pub struct RouteTree<T> {
    pub(crate) root: Node<T>,
    policy: DuplicatePolicy,
    len: usize,
}

impl<T> RouteTree<T> {
    /// Create an empty tree that rejects duplicate terminals.
    pub fn new() -> Self {
        Self::with_policy(DuplicatePolicy::default())
    }

    /// Create an empty tree with an explicit duplicate policy.
    pub fn with_policy(policy: DuplicatePolicy) -> Self {
        Self {
            root: Node::new(),
            policy,
            len: 0,
        }
    }

    pub fn policy(&self) -> DuplicatePolicy {
        self.policy
    }

    /// Number of registered routes (terminal nodes).
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Registered `(pattern, route)` pairs in deterministic order:
    /// depth-first, literal children by key, then the placeholder child.
    pub fn routes(&self) -> Vec<(&str, &T)> {
        let mut out = Vec::with_capacity(self.len);
        collect_routes(&self.root, &mut out);
        out
    }
}

impl<T: PartialEq> RouteTree<T> {
    /// Parse `pattern` and bind `route` to it.
    pub fn register(&mut self, pattern: &str, route: T) -> RegistrationResult<()> {
        let segments = parse_pattern(pattern).map_err(|source| RegistrationError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;
        self.insert(&segments, route)
    }

    /// Insert already parsed segments and bind `route` to the final node.
    pub fn insert(&mut self, segments: &[Segment], route: T) -> RegistrationResult<()> {
        let pattern = render_pattern(segments);

        match self.plan(segments, &pattern, &route)? {
            Planned::Unchanged => return Ok(()),
            Planned::Insert => {}
        }

        let mut current = &mut self.root;
        for segment in segments {
            current = match segment {
                Segment::Literal(text) => current
                    .literal_children
                    .entry(text.clone())
                    .or_insert_with(Node::new),
                Segment::Placeholder(name) => {
                    &mut current
                        .placeholder_child
                        .get_or_insert_with(|| {
                            Box::new(PlaceholderEdge {
                                name: name.clone(),
                                node: Node::new(),
                            })
                        })
                        .node
                }
            };
        }

        tracing::debug!(pattern = %pattern, "Route registered");
        current.terminal = Some(Terminal { pattern, route });
        self.len += 1;
        Ok(())
    }

    /// Walk the existing trie without mutating it and decide whether the
    /// insertion may proceed.
    fn plan(&self, segments: &[Segment], pattern: &str, route: &T) -> RegistrationResult<Planned> {
        let mut current = &self.root;

        for segment in segments {
            let next = match segment {
                Segment::Literal(text) => current.literal_children.get(text),
                Segment::Placeholder(name) => match &current.placeholder_child {
                    Some(edge) if edge.name != *name => {
                        tracing::warn!(
                            pattern = %pattern,
                            existing = %edge.name,
                            requested = %name,
                            "Placeholder conflict"
                        );
                        return Err(RegistrationError::PlaceholderConflict {
                            pattern: pattern.to_string(),
                            existing: edge.name.clone(),
                            requested: name.clone(),
                        });
                    }
                    Some(edge) => Some(&edge.node),
                    None => None,
                },
            };

            match next {
                Some(node) => current = node,
                // The rest of the path is new, nothing left to collide with.
                None => return Ok(Planned::Insert),
            }
        }

        match &current.terminal {
            None => Ok(Planned::Insert),
            Some(existing) if existing.route == *route => Ok(Planned::Unchanged),
            Some(_) => match self.policy {
                DuplicatePolicy::Reject => Err(RegistrationError::DuplicateRoute {
                    pattern: pattern.to_string(),
                }),
                DuplicatePolicy::FirstWins => {
                    tracing::warn!(pattern = %pattern, "Duplicate route ignored, keeping first registration");
                    Ok(Planned::Unchanged)
                }
            },
        }
    }
}

impl<T> Default for RouteTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

fn collect_routes<'a, T>(node: &'a Node<T>, out: &mut Vec<(&'a str, &'a T)>) {
    if let Some(terminal) = &node.terminal {
        out.push((terminal.pattern.as_str(), &terminal.route));
    }

    let mut keys: Vec<&String> = node.literal_children.keys().collect();
    keys.sort();
    for key in keys {
        collect_routes(&node.literal_children[key], out);
    }

    if let Some(edge) = &node.placeholder_child {
        collect_routes(&edge.node, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::error::PatternError;

    fn count_nodes<T>(node: &Node<T>) -> usize {
        1 + node.literal_children.values().map(count_nodes).sum::<usize>()
            + node.placeholder_child.as_ref().map_or(0, |edge| count_nodes(&edge.node))
    }

    #[test]
    fn test_shared_prefixes_reuse_nodes() {
        let mut tree = RouteTree::new();
        tree.register("/users", 1).unwrap();
        tree.register("/users/scores", 2).unwrap();
        tree.register("/users/{id}", 3).unwrap();

        // root, users, scores, {id}
        assert_eq!(count_nodes(&tree.root), 4);
        assert_eq!(tree.len(), 3);
        assert_eq!(tree.root.literal_children.len(), 1);
    }

    #[test]
    fn test_root_only_terminal_when_registered() {
        let mut tree = RouteTree::new();
        tree.register("/a", "a").unwrap();
        assert!(tree.root.terminal.is_none());

        tree.register("/", "root").unwrap();
        assert_eq!(tree.root.terminal.as_ref().map(|t| t.route), Some("root"));
    }

    #[test]
    fn test_placeholder_conflict_leaves_tree_untouched() {
        let mut tree = RouteTree::new();
        tree.register("/user/{name}", "by-name").unwrap();
        let before = count_nodes(&tree.root);

        let err = tree.register("/user/{id}/posts", "by-id").unwrap_err();
        assert_eq!(
            err,
            RegistrationError::PlaceholderConflict {
                pattern: "/user/{id}/posts".into(),
                existing: "name".into(),
                requested: "id".into(),
            }
        );
        assert_eq!(count_nodes(&tree.root), before);
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_duplicate_reject_policy() {
        let mut tree = RouteTree::new();
        tree.register("/a/{x}", "first").unwrap();
        tree.register("/a/{x}", "first").unwrap();
        assert_eq!(tree.len(), 1);

        let err = tree.register("a/{x}/", "second").unwrap_err();
        assert_eq!(err, RegistrationError::DuplicateRoute { pattern: "/a/{x}".into() });
    }

    #[test]
    fn test_duplicate_first_wins_policy() {
        let mut tree = RouteTree::with_policy(DuplicatePolicy::FirstWins);
        tree.register("/a", "first").unwrap();
        tree.register("/a", "second").unwrap();

        assert_eq!(tree.len(), 1);
        assert_eq!(tree.routes(), vec![("/a", &"first")]);
    }

    #[test]
    fn test_invalid_pattern_reported() {
        let mut tree: RouteTree<u8> = RouteTree::new();
        let err = tree.register("/a//b", 1).unwrap_err();
        assert_eq!(
            err,
            RegistrationError::InvalidPattern {
                pattern: "/a//b".into(),
                source: PatternError::EmptySegment { position: 1 },
            }
        );
        assert!(tree.is_empty());
    }

    #[test]
    fn test_routes_deterministic_order() {
        let mut tree = RouteTree::new();
        tree.register("/user/{name}/image/{id}", 4).unwrap();
        tree.register("/users", 5).unwrap();
        tree.register("/user/profile", 2).unwrap();
        tree.register("/user/{name}", 3).unwrap();
        tree.register("/", 1).unwrap();

        let patterns: Vec<&str> = tree.routes().into_iter().map(|(p, _)| p).collect();
        assert_eq!(
            patterns,
            vec!["/", "/user/profile", "/user/{name}", "/user/{name}/image/{id}", "/users"]
        );
    }

    #[test]
    fn test_insert_parsed_segments() {
        let mut tree = RouteTree::new();
        let segments = vec![
            Segment::Literal("images".into()),
            Segment::Placeholder("id".into()),
        ];
        tree.insert(&segments, "image").unwrap();
        assert_eq!(tree.routes(), vec![("/images/{id}", &"image")]);
    }
}
