//! File-backed resolved dependency tree
//!
//! The build tool exports its resolved tree as JSON:
//!
//! ```json
//! {
//!   "root": { "groupId": "com.acme", "artifactId": "app", "version": "1.0" },
//!   "dependencies": [
//!     {
//!       "artifact": { "groupId": "org.lib", "artifactId": "core", "version": "2.1" },
//!       "scope": "compile",
//!       "exclusions": [ { "groupId": "commons-logging", "artifactId": "*" } ],
//!       "children": []
//!     }
//!   ]
//! }
//! ```

use super::traits::{ResolvedGraph, ResolvedNode};
use crate::models::{ArtifactCoordinate, Exclusion, Scope};
use anyhow::{Context, Result};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::collections::hash_map::Entry;
use std::collections::VecDeque;
use std::path::Path;
use tracing::debug;

/// One node of the exported tree
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeNode {
    pub artifact: ArtifactCoordinate,
    #[serde(default)]
    pub scope: Scope,
    #[serde(default)]
    pub exclusions: Vec<Exclusion>,
    #[serde(default)]
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    pub fn new(artifact: ArtifactCoordinate, scope: Scope) -> Self {
        Self {
            artifact,
            scope,
            exclusions: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_exclusion(mut self, exclusion: Exclusion) -> Self {
        self.exclusions.push(exclusion);
        self
    }

    pub fn with_child(mut self, child: TreeNode) -> Self {
        self.children.push(child);
        self
    }

    fn to_resolved(&self) -> ResolvedNode {
        ResolvedNode {
            artifact: self.artifact.clone(),
            scope: self.scope,
            exclusions: self.exclusions.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct TreeFile {
    root: ArtifactCoordinate,
    #[serde(default)]
    dependencies: Vec<TreeNode>,
}

/// Resolved graph flattened for management-key lookups
#[derive(Debug, Clone)]
pub struct DependencyTree {
    root: ArtifactCoordinate,
    direct: Vec<ResolvedNode>,
    nodes: FxHashMap<String, ResolvedNode>,
}

impl DependencyTree {
    /// Flatten a tree. When an artifact occurs more than once, the occurrence
    /// nearest to the root (breadth-first) wins.
    pub fn new(root: ArtifactCoordinate, dependencies: Vec<TreeNode>) -> Self {
        let direct = dependencies.iter().map(TreeNode::to_resolved).collect();
        let mut nodes: FxHashMap<String, ResolvedNode> = FxHashMap::default();

        let mut queue: VecDeque<&TreeNode> = dependencies.iter().collect();
        while let Some(node) = queue.pop_front() {
            match nodes.entry(node.artifact.management_key()) {
                Entry::Occupied(_) => continue,
                Entry::Vacant(slot) => {
                    slot.insert(node.to_resolved());
                }
            }
            queue.extend(node.children.iter());
        }

        Self {
            root,
            direct,
            nodes,
        }
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let file: TreeFile =
            serde_json::from_str(content).context("Malformed resolved dependency graph")?;
        Ok(Self::new(file.root, file.dependencies))
    }

    /// Load a tree exported by the build tool
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read resolved graph {}", path.display()))?;
        let tree = Self::from_json(&content)
            .with_context(|| format!("Failed to parse resolved graph {}", path.display()))?;
        debug!(
            "Loaded resolved graph for {} ({} nodes, {} direct)",
            tree.root,
            tree.len(),
            tree.direct.len()
        );
        Ok(tree)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[allow(dead_code)] // Public API helper
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl ResolvedGraph for DependencyTree {
    fn root(&self) -> &ArtifactCoordinate {
        &self.root
    }

    fn direct_dependencies(&self) -> &[ResolvedNode] {
        &self.direct
    }

    fn node(&self, artifact: &ArtifactCoordinate) -> Option<&ResolvedNode> {
        self.nodes.get(&artifact.management_key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coord(s: &str) -> ArtifactCoordinate {
        s.parse().expect("valid coordinate")
    }

    #[test]
    fn test_lookup_ignores_version() {
        let tree = DependencyTree::new(
            coord("com.acme:app:1.0"),
            vec![TreeNode::new(coord("org.lib:core:2.1"), Scope::Compile)],
        );
        let node = tree.node(&coord("org.lib:core:1.0")).expect("mediated node");
        assert_eq!(node.artifact.version, "2.1");
        assert_eq!(tree.actual_scope(&coord("org.lib:core:9.9")), Some(Scope::Compile));
        assert!(!tree.contains(&coord("org.lib:other:2.1")));
    }

    #[test]
    fn test_nearest_occurrence_wins() {
        let tree = DependencyTree::new(
            coord("com.acme:app:1.0"),
            vec![
                TreeNode::new(coord("org.a:a:1"), Scope::Compile)
                    .with_child(TreeNode::new(coord("org.z:z:1"), Scope::Compile)),
                TreeNode::new(coord("org.z:z:2"), Scope::Test),
            ],
        );
        let z = tree.node(&coord("org.z:z:1")).expect("z present");
        assert_eq!(z.scope, Scope::Test);
        assert_eq!(z.artifact.version, "2");
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn test_from_json() {
        let json = r#"{
            "root": {"groupId": "com.acme", "artifactId": "app", "version": "1.0"},
            "dependencies": [{
                "artifact": {"groupId": "org.a", "artifactId": "a", "version": "1"},
                "scope": "runtime",
                "exclusions": [{"groupId": "org.x", "artifactId": "*"}],
                "children": [{
                    "artifact": {"groupId": "org.b", "artifactId": "b", "version": "1", "classifier": "tests"},
                    "scope": "test"
                }]
            }]
        }"#;
        let tree = DependencyTree::from_json(json).expect("parse tree");
        assert_eq!(tree.root().artifact_id, "app");
        assert_eq!(tree.direct_dependencies().len(), 1);
        assert_eq!(tree.direct_dependencies()[0].exclusions.len(), 1);
        assert_eq!(
            tree.actual_scope(&coord("org.b:b:jar:tests:1")),
            Some(Scope::Test)
        );
        assert!(!tree.contains(&coord("org.b:b:1")));
    }

    #[test]
    fn test_from_json_rejects_missing_root() {
        assert!(DependencyTree::from_json(r#"{"dependencies": []}"#).is_err());
    }
}
