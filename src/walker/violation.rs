//! Detected scope violations

use super::context::{PathStep, TraversalContext};
use crate::models::{ArtifactCoordinate, DependencyEdge, Scope};
use rustc_hash::FxHashSet;
use std::sync::Arc;

/// A runtime-required edge whose target the build demoted to `test`
///
/// Identity is the source path plus the edge: the same target reached from
/// two different parents yields two violations.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Violation {
    source: Arc<[PathStep]>,
    edge: DependencyEdge,
}

/// Unordered result of a walk
pub type ViolationSet = FxHashSet<Violation>;

impl Violation {
    pub fn new(source: &TraversalContext, edge: DependencyEdge) -> Self {
        Self {
            source: Arc::clone(source.path()),
            edge,
        }
    }

    /// Path from the root to the artifact whose descriptor declared the edge
    pub fn source_path(&self) -> &[PathStep] {
        &self.source
    }

    /// Artifact whose descriptor declared the violating edge
    pub fn source(&self) -> &ArtifactCoordinate {
        // A source path always contains at least the root.
        let path = self.source_path();
        &path[path.len() - 1].artifact
    }

    /// Direct dependency of the root through which the requirement arrived
    pub fn introduced_by(&self) -> &ArtifactCoordinate {
        self.source_path()
            .get(1)
            .map(|step| &step.artifact)
            .unwrap_or_else(|| self.source())
    }

    pub fn target(&self) -> &ArtifactCoordinate {
        &self.edge.target
    }

    pub fn declared_scope(&self) -> Scope {
        self.edge.scope
    }

    /// `coordinate:scope` strings from the root to the violating edge inclusive
    pub fn path_strings(&self) -> Vec<String> {
        self.source_path()
            .iter()
            .map(ToString::to_string)
            .chain(std::iter::once(format!("{}:{}", self.edge.target, self.edge.scope)))
            .collect()
    }
}
