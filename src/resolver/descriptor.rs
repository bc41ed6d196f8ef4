//! Descriptor file format
//!
//! ```json
//! {
//!   "dependencies": [
//!     { "groupId": "org.lib", "artifactId": "util", "version": "1.4",
//!       "scope": "runtime", "optional": false,
//!       "exclusions": [ { "groupId": "org.unwanted", "artifactId": "*" } ] }
//!   ]
//! }
//! ```
//!
//! `scope` defaults to `compile` and `type` to `jar`.

use super::{ResolveError, ResolveResult};
use crate::models::{ArtifactCoordinate, DependencyEdge, Exclusion, Scope};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeclaredDependency {
    #[serde(flatten)]
    pub artifact: ArtifactCoordinate,
    #[serde(default)]
    pub scope: Scope,
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub exclusions: Vec<Exclusion>,
}

impl From<DeclaredDependency> for DependencyEdge {
    fn from(dep: DeclaredDependency) -> Self {
        DependencyEdge {
            target: dep.artifact,
            scope: dep.scope,
            optional: dep.optional,
            exclusions: dep.exclusions.into_iter().collect(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Descriptor {
    #[serde(default)]
    pub dependencies: Vec<DeclaredDependency>,
}

impl Descriptor {
    /// Parse a descriptor document fetched for `artifact`
    pub fn parse(artifact: &ArtifactCoordinate, content: &str) -> ResolveResult<Self> {
        serde_json::from_str(content).map_err(|e| ResolveError::Malformed {
            artifact: artifact.to_string(),
            details: e.to_string(),
        })
    }

    pub fn into_edges(self) -> Vec<DependencyEdge> {
        self.dependencies.into_iter().map(DependencyEdge::from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_defaults() {
        let owner = ArtifactCoordinate::new("org.a", "a", "1");
        let descriptor = Descriptor::parse(
            &owner,
            r#"{"dependencies": [
                {"groupId": "org.b", "artifactId": "b", "version": "2"},
                {"groupId": "org.c", "artifactId": "c", "version": "3", "type": "pom",
                 "scope": "test", "optional": true,
                 "exclusions": [{"groupId": "*", "artifactId": "*"}]}
            ]}"#,
        )
        .expect("valid descriptor");

        let edges = descriptor.into_edges();
        assert_eq!(edges.len(), 2);
        assert_eq!(edges[0].scope, Scope::Compile);
        assert!(!edges[0].optional);
        assert_eq!(edges[0].target.extension, "jar");
        assert_eq!(edges[1].target.extension, "pom");
        assert_eq!(edges[1].scope, Scope::Test);
        assert!(edges[1].optional);
        assert_eq!(edges[1].exclusions.len(), 1);
    }

    #[test]
    fn test_parse_empty_document() {
        let owner = ArtifactCoordinate::new("org.a", "a", "1");
        let descriptor = Descriptor::parse(&owner, "{}").expect("empty descriptor");
        assert!(descriptor.into_edges().is_empty());
    }

    #[test]
    fn test_parse_malformed() {
        let owner = ArtifactCoordinate::new("org.a", "a", "1");
        let err = Descriptor::parse(&owner, r#"{"dependencies": [{"groupId": 1}]}"#)
            .expect_err("malformed");
        assert!(matches!(err, ResolveError::Malformed { .. }));
        assert!(err.to_string().contains("org.a:a:jar:1"));
    }
}
