//! Dependency graph construction and load-order resolution.
//!
//! - [`builder`] — breadth-first walk producing a [`DependencyGraph`].
//! - [`order`] — depth-first post-order walk producing a load order.

pub mod builder;
pub mod order;

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use crate::descriptor::{descriptor_path, read_descriptor, DEFAULT_DESCRIPTOR};
use crate::models::{DependencyRecord, PackageKey};

/// Knobs shared by both traversals.
#[derive(Debug, Clone)]
pub struct TraversalOptions {
    /// Dependencies whose name contains this substring are skipped.
    pub filter: Option<String>,
    /// File name of the descriptor inside `repo/name/version/`.
    pub descriptor_name: String,
}

impl Default for TraversalOptions {
    fn default() -> Self {
        Self {
            filter: None,
            descriptor_name: DEFAULT_DESCRIPTOR.to_string(),
        }
    }
}

impl TraversalOptions {
    #[cfg(test)]
    pub fn with_filter(filter: impl Into<String>) -> Self {
        Self {
            filter: Some(filter.into()),
            ..Self::default()
        }
    }

    /// `true` when `name` must be left out of the traversal.
    ///
    /// The filter excludes matches; it never restricts the walk to them.
    pub fn excludes(&self, name: &str) -> bool {
        match self.filter.as_deref() {
            Some(filter) if !filter.is_empty() => name.contains(filter),
            _ => false,
        }
    }

    /// Turn a declared dependency into a traversable key, or `None` if it is
    /// unnamed or filtered out.
    pub(crate) fn admit(&self, record: &DependencyRecord) -> Option<PackageKey> {
        let key = record.key()?;
        if self.excludes(&key.name) {
            tracing::trace!("filtered out {}", key);
            return None;
        }
        Some(key)
    }

    /// Declared dependencies of a versioned package, `None` if it has no descriptor.
    pub(crate) fn dependencies_of(
        &self,
        repo: &Path,
        name: &str,
        version: &str,
    ) -> Result<Option<Vec<DependencyRecord>>> {
        let path = descriptor_path(repo, name, version, &self.descriptor_name);
        read_descriptor(&path)
            .with_context(|| format!("Failed to load dependencies of {}:{}", name, version))
    }
}

/// Direct dependencies of one package, exactly as declared.
pub fn direct_dependencies(
    root: &PackageKey,
    repo: &Path,
    options: &TraversalOptions,
) -> Result<Option<Vec<DependencyRecord>>> {
    match &root.version {
        Some(version) => options.dependencies_of(repo, &root.name, version),
        None => Ok(None),
    }
}

/// Adjacency map from canonical package key to its neighbour keys.
///
/// Nodes keep their insertion order. Neighbour lists keep declaration order
/// and may contain keys that never become nodes themselves.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyGraph {
    nodes: Vec<(String, Vec<String>)>,
    index: HashMap<String, usize>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Neighbour list of `key`, inserting an empty one first if needed.
    pub fn entry(&mut self, key: &str) -> &mut Vec<String> {
        let idx = match self.index.get(key) {
            Some(&idx) => idx,
            None => {
                self.nodes.push((key.to_string(), Vec::new()));
                self.index.insert(key.to_string(), self.nodes.len() - 1);
                self.nodes.len() - 1
            }
        };
        &mut self.nodes[idx].1
    }

    pub fn add_edge(&mut self, from: &str, to: &str) {
        self.entry(from).push(to.to_string());
    }

    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.index.get(key).map(|&idx| self.nodes[idx].1.as_slice())
    }

    /// Neighbours of `key`; empty for unknown keys.
    pub fn neighbors(&self, key: &str) -> &[String] {
        self.get(key).unwrap_or(&[])
    }

    #[cfg(test)]
    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.nodes
            .iter()
            .map(|(key, neighbors)| (key.as_str(), neighbors.as_slice()))
    }

    #[cfg(test)]
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(|(key, _)| key.as_str())
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn edge_count(&self) -> usize {
        self.nodes.iter().map(|(_, n)| n.len()).sum()
    }
}

/// Serialized as a JSON object whose key order follows insertion order.
impl Serialize for DependencyGraph {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.nodes.len()))?;
        for (key, neighbors) in &self.nodes {
            map.serialize_entry(key, neighbors)?;
        }
        map.end()
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Helpers for laying out throwaway repositories on disk.

    use std::path::Path;

    /// Write `repo/name/version/pom.xml` declaring `deps` as `(artifact, version)`.
    pub fn write_pom(repo: &Path, name: &str, version: &str, deps: &[(&str, &str)]) {
        let mut body = String::new();
        for (artifact, dep_version) in deps {
            body.push_str("    <dependency>\n      <groupId>org.example</groupId>\n");
            body.push_str(&format!("      <artifactId>{}</artifactId>\n", artifact));
            if !dep_version.is_empty() {
                body.push_str(&format!("      <version>{}</version>\n", dep_version));
            }
            body.push_str("    </dependency>\n");
        }
        let xml = format!(
            "<project xmlns=\"http://maven.apache.org/POM/4.0.0\">\n  <dependencies>\n{}  </dependencies>\n</project>\n",
            body
        );
        let dir = repo.join(name).join(version);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("pom.xml"), xml).unwrap();
    }
}
