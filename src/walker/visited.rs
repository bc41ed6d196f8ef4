//! Run-scoped registry of expanded artifacts

use crate::models::ArtifactCoordinate;
use dashmap::DashSet;

/// Claims artifacts for descriptor expansion, at most once each
#[derive(Debug, Default)]
pub struct VisitedSet {
    claimed: DashSet<String>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically mark the artifact as expanded. Returns `false` if some
    /// other context already claimed it.
    pub fn claim(&self, artifact: &ArtifactCoordinate) -> bool {
        self.claimed.insert(artifact.id())
    }

    pub fn contains(&self, artifact: &ArtifactCoordinate) -> bool {
        self.claimed.contains(&artifact.id())
    }

    pub fn len(&self) -> usize {
        self.claimed.len()
    }

    #[allow(dead_code)] // Public API helper
    pub fn is_empty(&self) -> bool {
        self.claimed.is_empty()
    }
}
