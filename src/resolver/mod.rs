//! Artifact descriptor resolution
//!
//! A descriptor is the list of dependency edges an artifact declares in its
//! own metadata. Resolution is the only blocking step of a walk: it may hit
//! the local disk or a remote repository over HTTP.

mod descriptor;
mod repository;

pub use descriptor::{DeclaredDependency, Descriptor};
pub use repository::{Repository, RepositoryResolver};

use crate::models::{ArtifactCoordinate, DependencyEdge};
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while resolving a descriptor
#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("No descriptor for {artifact} in {searched} repositories")]
    NotFound { artifact: String, searched: usize },

    #[error("Failed to read descriptor {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("HTTP {status} fetching {url}")]
    Http { url: String, status: u16 },

    #[error("Transport failure fetching {url}: {details}")]
    Transport { url: String, details: String },

    #[error("Malformed descriptor for {artifact}: {details}")]
    Malformed { artifact: String, details: String },
}

pub type ResolveResult<T> = Result<T, ResolveError>;

/// Resolves an artifact's directly-declared dependency edges
///
/// Called concurrently from walker threads. Retries, caching and timeouts
/// belong to implementations; the walker never retries.
pub trait DescriptorResolver: Send + Sync {
    fn resolve(
        &self,
        artifact: &ArtifactCoordinate,
        repositories: &[Repository],
    ) -> ResolveResult<Vec<DependencyEdge>>;
}
