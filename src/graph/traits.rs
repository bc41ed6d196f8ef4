//! Resolved-graph provider interface

use crate::models::{ArtifactCoordinate, Exclusion, Scope};

/// A node of the build's resolved dependency graph
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedNode {
    /// The artifact the build actually selected (after version mediation)
    pub artifact: ArtifactCoordinate,
    /// Scope the build actually assigned to the artifact
    pub scope: Scope,
    /// Exclusions the consuming build declared on this dependency
    pub exclusions: Vec<Exclusion>,
}

/// Read-only view of the authoritative resolved graph
///
/// Implementations are queried concurrently by walker threads.
pub trait ResolvedGraph: Send + Sync {
    /// Root project artifact
    fn root(&self) -> &ArtifactCoordinate;

    /// Direct dependencies of the root, in declaration order
    fn direct_dependencies(&self) -> &[ResolvedNode];

    /// Look up the node for an artifact, ignoring its version
    fn node(&self, artifact: &ArtifactCoordinate) -> Option<&ResolvedNode>;

    /// Whether a node for the artifact exists at all
    fn contains(&self, artifact: &ArtifactCoordinate) -> bool {
        self.node(artifact).is_some()
    }

    /// Scope the artifact actually has in this build
    fn actual_scope(&self, artifact: &ArtifactCoordinate) -> Option<Scope> {
        self.node(artifact).map(|n| n.scope)
    }
}
