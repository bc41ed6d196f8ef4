//! Immutable, path-carrying traversal state

use crate::graph::ResolvedGraph;
use crate::models::{ArtifactCoordinate, DependencyEdge, Exclusion, Scope};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// One hop of a traversal path
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct PathStep {
    pub artifact: ArtifactCoordinate,
    /// Scope declared on the edge that led here; `None` for the root
    pub scope: Option<Scope>,
}

impl fmt::Display for PathStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.scope {
            Some(scope) => write!(f, "{}:{}", self.artifact, scope),
            None => write!(f, "{}", self.artifact),
        }
    }
}

/// Where a walk currently is
///
/// Contexts are never mutated: descending produces a new context that shares
/// the resolved graph and copies the path.
#[derive(Clone)]
pub struct TraversalContext {
    artifact: ArtifactCoordinate,
    exclusions: Arc<BTreeSet<Exclusion>>,
    path: Arc<[PathStep]>,
    graph: Arc<dyn ResolvedGraph>,
}

impl TraversalContext {
    /// Context positioned at the root project artifact
    pub fn root(root: ArtifactCoordinate, graph: Arc<dyn ResolvedGraph>) -> Self {
        let path: Arc<[PathStep]> = Arc::from(vec![PathStep {
            artifact: root.clone(),
            scope: None,
        }]);
        Self {
            artifact: root,
            exclusions: Arc::new(BTreeSet::new()),
            path,
            graph,
        }
    }

    /// One context per direct, non-test dependency of the graph's root
    ///
    /// Test-scoped direct dependencies are never traversed.
    pub fn seeds(graph: Arc<dyn ResolvedGraph>) -> Vec<Self> {
        let root = Self::root(graph.root().clone(), Arc::clone(&graph));
        graph
            .direct_dependencies()
            .iter()
            .filter(|node| {
                let keep = node.scope != Scope::Test;
                if !keep {
                    debug!("Not traversing test-scoped dependency {}", node.artifact);
                }
                keep
            })
            .filter_map(|node| {
                let edge = DependencyEdge {
                    target: node.artifact.clone(),
                    scope: node.scope,
                    optional: false,
                    exclusions: node.exclusions.iter().cloned().collect(),
                };
                root.step_into(&edge)
            })
            .collect()
    }

    pub fn artifact(&self) -> &ArtifactCoordinate {
        &self.artifact
    }

    /// Root-inclusive path, root first
    pub fn path(&self) -> &Arc<[PathStep]> {
        &self.path
    }

    pub fn exclusions(&self) -> &BTreeSet<Exclusion> {
        &self.exclusions
    }

    pub fn depth(&self) -> usize {
        self.path.len() - 1
    }

    /// Descend along `edge`
    ///
    /// Returns `None` when the target has no node in the resolved graph; the
    /// caller should not recurse. The child inherits this context's
    /// exclusions plus those on the edge and those the build declared on the
    /// target node.
    pub fn step_into(&self, edge: &DependencyEdge) -> Option<Self> {
        let node = self.graph.node(&edge.target)?;

        let mut exclusions = (*self.exclusions).clone();
        exclusions.extend(edge.exclusions.iter().cloned());
        exclusions.extend(node.exclusions.iter().cloned());

        let mut path = Vec::with_capacity(self.path.len() + 1);
        path.extend(self.path.iter().cloned());
        path.push(PathStep {
            artifact: node.artifact.clone(),
            scope: Some(edge.scope),
        });

        Some(Self {
            artifact: node.artifact.clone(),
            exclusions: Arc::new(exclusions),
            path: Arc::from(path),
            graph: Arc::clone(&self.graph),
        })
    }

    /// Same position, with additional exclusions
    pub fn with_exclusions<'a, I>(&self, extra: I) -> Self
    where
        I: IntoIterator<Item = &'a Exclusion>,
    {
        let fresh: Vec<&Exclusion> = extra
            .into_iter()
            .filter(|e| !self.exclusions.contains(*e))
            .collect();
        if fresh.is_empty() {
            return self.clone();
        }

        let mut exclusions = (*self.exclusions).clone();
        exclusions.extend(fresh.into_iter().cloned());
        Self {
            exclusions: Arc::new(exclusions),
            ..self.clone()
        }
    }

    pub fn is_excluded(&self, edge: &DependencyEdge) -> bool {
        self.exclusions.iter().any(|e| e.matches(&edge.target))
    }

    /// Scope the current artifact actually has in the build
    pub fn actual_scope_in_build(&self) -> Option<Scope> {
        self.graph.actual_scope(&self.artifact)
    }

    /// The build demoted a runtime-required edge's target to `test`
    pub fn is_overridden_to_test_scope(&self, edge: &DependencyEdge) -> bool {
        edge.scope.is_runtime_required() && self.graph.actual_scope(&edge.target) == Some(Scope::Test)
    }
}

impl fmt::Debug for TraversalContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TraversalContext")
            .field("artifact", &self.artifact)
            .field("exclusions", &self.exclusions)
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}
