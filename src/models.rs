//! Core data models for depscope
//!
//! These models describe artifact identities and the labeled edges between
//! them. They are immutable values shared freely across walker threads.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors produced when parsing coordinates, scopes or exclusions from strings
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("invalid artifact coordinate '{0}', expected group:artifact[:type[:classifier]]:version")]
    Coordinate(String),

    #[error("unknown scope '{0}', expected one of compile, runtime, provided, system, test")]
    Scope(String),

    #[error("invalid exclusion '{0}', expected group:artifact (either side may be '*')")]
    Exclusion(String),
}

/// Scope of a dependency edge
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    #[default]
    Compile,
    Runtime,
    Provided,
    System,
    Test,
}

impl Scope {
    /// Whether an edge at this scope must be present on the runtime classpath
    pub fn is_runtime_required(&self) -> bool {
        matches!(self, Scope::Compile | Scope::Runtime)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::Compile => "compile",
            Scope::Runtime => "runtime",
            Scope::Provided => "provided",
            Scope::System => "system",
            Scope::Test => "test",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scope {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "compile" => Ok(Scope::Compile),
            "runtime" => Ok(Scope::Runtime),
            "provided" => Ok(Scope::Provided),
            "system" => Ok(Scope::System),
            "test" => Ok(Scope::Test),
            _ => Err(ParseError::Scope(s.to_string())),
        }
    }
}

fn default_extension() -> String {
    "jar".to_string()
}

/// Identity of an artifact in a repository
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactCoordinate {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classifier: Option<String>,
    /// Packaging type / file extension (`jar` unless stated otherwise)
    #[serde(rename = "type", default = "default_extension")]
    pub extension: String,
}

impl ArtifactCoordinate {
    pub fn new(
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            version: version.into(),
            classifier: None,
            extension: default_extension(),
        }
    }

    pub fn with_classifier(mut self, classifier: impl Into<String>) -> Self {
        let classifier = classifier.into();
        self.classifier = (!classifier.is_empty()).then_some(classifier);
        self
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Full identity key: `group:artifact:type[:classifier]:version`
    pub fn id(&self) -> String {
        format!("{}:{}", self.management_key(), self.version)
    }

    /// Versionless key: `group:artifact:type[:classifier]`
    ///
    /// Used to look artifacts up in the resolved build graph, where the
    /// version may have been mediated away from the one a descriptor asks for.
    pub fn management_key(&self) -> String {
        match &self.classifier {
            Some(classifier) => format!(
                "{}:{}:{}:{}",
                self.group_id, self.artifact_id, self.extension, classifier
            ),
            None => format!("{}:{}:{}", self.group_id, self.artifact_id, self.extension),
        }
    }
}

impl fmt::Display for ArtifactCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id())
    }
}

impl FromStr for ArtifactCoordinate {
    type Err = ParseError;

    /// Parses `group:artifact[:type[:classifier]]:version`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.trim().split(':').collect();
        if parts.iter().any(|p| p.is_empty()) {
            return Err(ParseError::Coordinate(s.to_string()));
        }
        let coordinate = match parts.as_slice() {
            [g, a, v] => ArtifactCoordinate::new(*g, *a, *v),
            [g, a, t, v] => ArtifactCoordinate::new(*g, *a, *v).with_extension(*t),
            [g, a, t, c, v] => ArtifactCoordinate::new(*g, *a, *v)
                .with_extension(*t)
                .with_classifier(*c),
            _ => return Err(ParseError::Coordinate(s.to_string())),
        };
        Ok(coordinate)
    }
}

/// A rule suppressing a transitive `group:artifact` pair
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exclusion {
    pub group_id: String,
    pub artifact_id: String,
}

impl Exclusion {
    pub const WILDCARD: &'static str = "*";

    pub fn new(group_id: impl Into<String>, artifact_id: impl Into<String>) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
        }
    }

    /// Group and artifact are matched independently; `*` matches anything
    pub fn matches(&self, artifact: &ArtifactCoordinate) -> bool {
        let side = |pattern: &str, value: &str| pattern == Self::WILDCARD || pattern == value;
        side(&self.group_id, &artifact.group_id) && side(&self.artifact_id, &artifact.artifact_id)
    }
}

impl fmt::Display for Exclusion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.group_id, self.artifact_id)
    }
}

impl FromStr for Exclusion {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().split_once(':') {
            Some((g, a)) if !g.is_empty() && !a.is_empty() && !a.contains(':') => {
                Ok(Exclusion::new(g, a))
            }
            _ => Err(ParseError::Exclusion(s.to_string())),
        }
    }
}

/// A labeled edge from an owning artifact to one of its dependencies
///
/// The source is implicit: it is whichever artifact's descriptor declared
/// the edge.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DependencyEdge {
    pub target: ArtifactCoordinate,
    pub scope: Scope,
    pub optional: bool,
    pub exclusions: BTreeSet<Exclusion>,
}

impl DependencyEdge {
    pub fn new(target: ArtifactCoordinate, scope: Scope) -> Self {
        Self {
            target,
            scope,
            optional: false,
            exclusions: BTreeSet::new(),
        }
    }

    pub fn optional(mut self, optional: bool) -> Self {
        self.optional = optional;
        self
    }

    pub fn with_exclusion(mut self, exclusion: Exclusion) -> Self {
        self.exclusions.insert(exclusion);
        self
    }

    /// Non-optional and declared at a scope that reaches the runtime classpath
    pub fn is_runtime_required(&self) -> bool {
        !self.optional && self.scope.is_runtime_required()
    }
}

impl fmt::Display for DependencyEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.target, self.scope)?;
        if self.optional {
            f.write_str(" (optional)")?;
        }
        Ok(())
    }
}
