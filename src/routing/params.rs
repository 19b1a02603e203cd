//! Match results and captured path parameters.

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

/// Ordered `(name, value)` bindings captured by placeholder edges,
/// shallow to deep along the matched route.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    bindings: Vec<(String, String)>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value bound to `name`, if the matched route declares it.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.bindings
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.bindings
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub(crate) fn push(&mut self, name: &str, value: &str) {
        self.bindings.push((name.to_string(), value.to_string()));
    }
}

impl From<Vec<(String, String)>> for Params {
    fn from(bindings: Vec<(String, String)>) -> Self {
        Self { bindings }
    }
}

// Serialized as a JSON object; key order follows declaration order.
impl Serialize for Params {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.bindings.len()))?;
        for (key, value) in &self.bindings {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// A successful match, owned by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchResult<T> {
    /// Identity bound to the matched route.
    pub route: T,
    /// Canonical form of the matched pattern.
    pub pattern: String,
    /// Captured placeholder values.
    pub params: Params,
}

/// Outcome of resolving one request path, for line-oriented JSON output.
#[derive(Debug, Clone, Serialize)]
pub struct PathResolution<'a, T> {
    pub path: &'a str,
    pub matched: bool,
    #[serde(flatten)]
    pub result: Option<MatchResult<T>>,
}

impl<'a, T> PathResolution<'a, T> {
    pub fn new(path: &'a str, result: Option<MatchResult<T>>) -> Self {
        Self {
            path,
            matched: result.is_some(),
            result,
        }
    }
}
