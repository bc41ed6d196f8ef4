//! Project-level configuration support
//!
//! Loads per-project configuration from `depscope.toml` or `.depscoperc.json`
//! in the project directory.
//!
//! # Configuration Format
//!
//! ```toml
//! # depscope.toml
//!
//! [check]
//! parallel = true
//! workers = 12
//! fail_on_violation = true
//! verbose = false
//! skip = false
//! graph = "target/resolved-graph.json"
//! repositories = ["/home/me/.m2/repository", "https://repo.example.org/maven2"]
//! documentation_url = "https://wiki.example.org/build/scopes"
//! format = "text"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Preferred config file name
pub const CONFIG_FILE: &str = "depscope.toml";

/// Alternative JSON config file name
pub const JSON_CONFIG_FILE: &str = ".depscoperc.json";

/// Default resolved graph file, relative to the project directory
pub const DEFAULT_GRAPH_FILE: &str = "resolved-graph.json";

/// Settings for the `check` command. Unset values fall back to CLI defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct CheckConfig {
    /// Resolve descriptors on a worker pool (default: true)
    #[serde(default)]
    pub parallel: Option<bool>,

    /// Pool size (default: min(5 × cores, 20))
    #[serde(default)]
    pub workers: Option<usize>,

    /// Exit non-zero when violations are found (default: false)
    #[serde(default)]
    pub fail_on_violation: Option<bool>,

    /// Print the full path of every violation
    #[serde(default)]
    pub verbose: Option<bool>,

    /// Skip the check entirely
    #[serde(default)]
    pub skip: Option<bool>,

    /// Link printed under the report
    #[serde(default)]
    pub documentation_url: Option<String>,

    /// Resolved graph file, relative to the project directory
    #[serde(default)]
    pub graph: Option<PathBuf>,

    /// Descriptor repositories, searched in order
    #[serde(default)]
    pub repositories: Vec<String>,

    /// Output format (text, json)
    #[serde(default)]
    pub format: Option<String>,
}

/// Project configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ProjectConfig {
    #[serde(default)]
    pub check: CheckConfig,
}

/// Load project configuration from the project directory.
///
/// Searches for configuration files in this order:
/// 1. `depscope.toml`
/// 2. `.depscoperc.json`
///
/// Returns default configuration if no config file is found.
pub fn load_project_config(project_path: &Path) -> ProjectConfig {
    let toml_path = project_path.join(CONFIG_FILE);
    if toml_path.exists() {
        match load_toml_config(&toml_path) {
            Ok(config) => {
                debug!("Loaded project config from {}", toml_path.display());
                return config;
            }
            Err(e) => {
                warn!("Failed to load {}: {}", toml_path.display(), e);
            }
        }
    }

    let json_path = project_path.join(JSON_CONFIG_FILE);
    if json_path.exists() {
        match load_json_config(&json_path) {
            Ok(config) => {
                debug!("Loaded project config from {}", json_path.display());
                return config;
            }
            Err(e) => {
                warn!("Failed to load {}: {}", json_path.display(), e);
            }
        }
    }

    debug!("No project config found, using defaults");
    ProjectConfig::default()
}

/// Load configuration from a TOML file
fn load_toml_config(path: &Path) -> anyhow::Result<ProjectConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: ProjectConfig = toml::from_str(&content)?;
    Ok(config)
}

/// Load configuration from a JSON file
fn load_json_config(path: &Path) -> anyhow::Result<ProjectConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: ProjectConfig = serde_json::from_str(&content)?;
    Ok(config)
}

/// The user's local repository, used when nothing is configured
pub fn default_repositories() -> Vec<String> {
    dirs::home_dir()
        .map(|home| home.join(".m2").join("repository"))
        .map(|path| vec![path.display().to_string()])
        .unwrap_or_default()
}

/// Template written by `depscope init`
pub const DEFAULT_CONFIG_TEMPLATE: &str = r#"# depscope configuration

[check]
# Resolve descriptors on a worker pool (false = single-threaded)
parallel = true

# Worker pool size (default: min(5 x cores, 20))
# workers = 8

# Exit with code 1 when violations are found (default: warn only)
fail_on_violation = false

# Print the full root-to-edge path of every violation
verbose = false

# Skip the check entirely
skip = false

# Resolved dependency graph exported by the build, relative to this directory
graph = "resolved-graph.json"

# Descriptor repositories, searched in order (directories or http(s) URLs)
# repositories = ["~/.m2/repository", "https://repo.example.org/maven2"]

# Link printed under the report
# documentation_url = "https://wiki.example.org/build/scopes"

# Output format: text or json
format = "text"
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_missing() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert_eq!(load_project_config(dir.path()), ProjectConfig::default());
    }

    #[test]
    fn test_load_toml() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            r#"
[check]
parallel = false
fail_on_violation = true
repositories = ["/srv/repo", "https://repo.example.org/maven2"]
documentation_url = "https://docs.example.org"
"#,
        )
        .expect("write config");

        let config = load_project_config(dir.path());
        assert_eq!(config.check.parallel, Some(false));
        assert_eq!(config.check.fail_on_violation, Some(true));
        assert_eq!(config.check.repositories.len(), 2);
        assert_eq!(config.check.verbose, None);
        assert_eq!(
            config.check.documentation_url.as_deref(),
            Some("https://docs.example.org")
        );
    }

    #[test]
    fn test_toml_preferred_over_json() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join(CONFIG_FILE), "[check]\nverbose = true\n").expect("write toml");
        std::fs::write(
            dir.path().join(JSON_CONFIG_FILE),
            r#"{"check": {"verbose": false}}"#,
        )
        .expect("write json");
        assert_eq!(load_project_config(dir.path()).check.verbose, Some(true));
    }

    #[test]
    fn test_broken_toml_falls_back_to_json() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join(CONFIG_FILE), "[check\nverbose = ").expect("write toml");
        std::fs::write(
            dir.path().join(JSON_CONFIG_FILE),
            r#"{"check": {"skip": true}}"#,
        )
        .expect("write json");
        assert_eq!(load_project_config(dir.path()).check.skip, Some(true));
    }

    #[test]
    fn test_template_parses() {
        let config: ProjectConfig = toml::from_str(DEFAULT_CONFIG_TEMPLATE).expect("template parses");
        assert_eq!(config.check.parallel, Some(true));
        assert_eq!(config.check.format.as_deref(), Some("text"));
    }
}
