//! Repository-backed descriptor resolver
//!
//! Repositories use the usual layout: the descriptor for `g:a:v` is stored at
//! `g/with/slashes/a/v/a-v.deps.json`. Local directories are read from disk;
//! `http://` and `https://` locations are fetched with a blocking GET.

use super::{DescriptorResolver, Descriptor, ResolveError, ResolveResult};
use crate::models::{ArtifactCoordinate, DependencyEdge};
use std::fmt;
use std::io::ErrorKind;
use std::path::PathBuf;
use tracing::{debug, trace};

/// Descriptor file suffix
pub const DESCRIPTOR_SUFFIX: &str = ".deps.json";

/// A place descriptors can be fetched from
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Repository {
    Local(PathBuf),
    Remote(String),
}

impl Repository {
    /// Interpret a configured location: URLs are remote, anything else a
    /// directory (a leading `~/` means the home directory)
    pub fn parse(location: &str) -> Self {
        let location = location.trim();
        if location.starts_with("http://") || location.starts_with("https://") {
            return Repository::Remote(location.trim_end_matches('/').to_string());
        }
        match (location.strip_prefix("~/"), dirs::home_dir()) {
            (Some(rest), Some(home)) => Repository::Local(home.join(rest)),
            _ => Repository::Local(PathBuf::from(location)),
        }
    }

    /// Path of an artifact's descriptor relative to the repository root
    pub fn descriptor_path(artifact: &ArtifactCoordinate) -> String {
        format!(
            "{}/{}/{}/{}-{}{}",
            artifact.group_id.replace('.', "/"),
            artifact.artifact_id,
            artifact.version,
            artifact.artifact_id,
            artifact.version,
            DESCRIPTOR_SUFFIX
        )
    }
}

impl fmt::Display for Repository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Repository::Local(path) => write!(f, "{}", path.display()),
            Repository::Remote(url) => f.write_str(url),
        }
    }
}

/// Resolves descriptors by searching repositories in order
pub struct RepositoryResolver {
    agent: ureq::Agent,
}

impl RepositoryResolver {
    pub fn new() -> Self {
        // Status codes are inspected by hand so a 404 can fall through to the
        // next repository.
        let agent = ureq::config::Config::builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }

    /// Fetch the raw descriptor from one repository. `Ok(None)` means the
    /// repository does not have it.
    fn fetch(
        &self,
        repository: &Repository,
        artifact: &ArtifactCoordinate,
    ) -> ResolveResult<Option<String>> {
        let relative = Repository::descriptor_path(artifact);
        match repository {
            Repository::Local(root) => {
                let path = root.join(&relative);
                match std::fs::read_to_string(&path) {
                    Ok(content) => Ok(Some(content)),
                    Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
                    Err(source) => Err(ResolveError::Io { path, source }),
                }
            }
            Repository::Remote(base) => {
                let url = format!("{}/{}", base, relative);
                let response = self
                    .agent
                    .get(&url)
                    .call()
                    .map_err(|e| ResolveError::Transport {
                        url: url.clone(),
                        details: e.to_string(),
                    })?;

                let status = response.status().as_u16();
                if status == 404 || status == 410 {
                    return Ok(None);
                }
                if !(200..300).contains(&status) {
                    return Err(ResolveError::Http { url, status });
                }

                response
                    .into_body()
                    .read_to_string()
                    .map(Some)
                    .map_err(|e| ResolveError::Transport {
                        url,
                        details: e.to_string(),
                    })
            }
        }
    }
}

impl Default for RepositoryResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl DescriptorResolver for RepositoryResolver {
    fn resolve(
        &self,
        artifact: &ArtifactCoordinate,
        repositories: &[Repository],
    ) -> ResolveResult<Vec<DependencyEdge>> {
        for repository in repositories {
            trace!("Looking up {} in {}", artifact, repository);
            if let Some(content) = self.fetch(repository, artifact)? {
                debug!("Resolved descriptor for {} from {}", artifact, repository);
                return Ok(Descriptor::parse(artifact, &content)?.into_edges());
            }
        }
        Err(ResolveError::NotFound {
            artifact: artifact.to_string(),
            searched: repositories.len(),
        })
    }
}
