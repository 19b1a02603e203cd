//! Shared utilities for integration tests.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use segment_router::RouteTree;

/// A route table in its own temporary directory, removed on drop.
#[allow(dead_code)]
pub struct ConfigFile {
    _dir: TempDir,
    path: PathBuf,
}

#[allow(dead_code)]
impl ConfigFile {
    pub fn new(contents: &str) -> Self {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("routes.toml");
        fs::write(&path, contents).unwrap();
        Self { _dir: dir, path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Overwrite the table in place.
    pub fn write(&self, contents: &str) {
        fs::write(&self.path, contents).unwrap();
    }

    /// Save the way editors do: write a sibling file, then rename it over the table.
    pub fn atomic_save(&self, contents: &str) {
        let staged = self.path.with_extension("toml.swp");
        fs::write(&staged, contents).unwrap();
        fs::rename(&staged, &self.path).unwrap();
    }
}

/// Build a tree whose route identity is the pattern itself.
#[allow(dead_code)]
pub fn tree_of(patterns: &[&'static str]) -> RouteTree<&'static str> {
    let mut tree = RouteTree::new();
    for pattern in patterns {
        tree.register(pattern, *pattern).unwrap();
    }
    tree
}

/// The route set from the original routing sketch.
#[allow(dead_code)]
pub const SKETCH_ROUTES: &[&str] = &[
    "/user/{name}",
    "/user/profile",
    "/user/settings",
    "/user/{name}/image/{id}",
    "/users",
    "/users/scores",
    "/images",
    "/images/{id}",
];
