//! Output reporters for scope-check results
//!
//! Supports two output formats:
//! - `text` - Terminal output with colors
//! - `json` - Machine-readable JSON

mod json;
mod text;

use crate::models::{ArtifactCoordinate, Scope};
use crate::walker::ViolationSet;
use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::str::FromStr;

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" | "terminal" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(anyhow!("Unknown format '{}'. Valid formats: text, json", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// One requirement on a demoted artifact
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViolationEntry {
    /// Direct dependency of the root the requirement came through
    pub introduced_by: String,
    /// Artifact whose descriptor declared the edge
    pub source: String,
    pub declared_scope: Scope,
    /// `coordinate:scope` steps from the root to the edge inclusive
    pub path: Vec<String>,
}

/// All requirements on one demoted artifact
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViolationGroup {
    pub target: String,
    pub actual_scope: Scope,
    pub entries: Vec<ViolationEntry>,
}

/// Presentation-ready view of a walk's violations
#[derive(Debug, Clone, Serialize)]
pub struct ViolationReport {
    pub generated_at: DateTime<Utc>,
    pub root: String,
    pub violation_count: usize,
    pub groups: Vec<ViolationGroup>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub documentation_url: Option<String>,
}

impl ViolationReport {
    /// Group by target artifact (versionless), groups sorted by target and
    /// entries sorted by the artifact that introduced the requirement
    pub fn from_violations(root: &ArtifactCoordinate, violations: &ViolationSet) -> Self {
        let mut grouped: BTreeMap<String, Vec<ViolationEntry>> = BTreeMap::new();
        for violation in violations {
            grouped
                .entry(violation.target().management_key())
                .or_default()
                .push(ViolationEntry {
                    introduced_by: violation.introduced_by().to_string(),
                    source: violation.source().to_string(),
                    declared_scope: violation.declared_scope(),
                    path: violation.path_strings(),
                });
        }

        let groups = grouped
            .into_iter()
            .map(|(target, mut entries)| {
                entries.sort_by(|a, b| {
                    a.introduced_by
                        .cmp(&b.introduced_by)
                        .then_with(|| a.path.cmp(&b.path))
                });
                ViolationGroup {
                    target,
                    actual_scope: Scope::Test,
                    entries,
                }
            })
            .collect();

        Self {
            generated_at: Utc::now(),
            root: root.to_string(),
            violation_count: violations.len(),
            groups,
            documentation_url: None,
        }
    }

    pub fn with_documentation_url(mut self, url: Option<String>) -> Self {
        self.documentation_url = url;
        self
    }

    pub fn is_clean(&self) -> bool {
        self.violation_count == 0
    }
}

/// Render a report using an OutputFormat enum
pub fn report_with_format(
    report: &ViolationReport,
    format: OutputFormat,
    verbose: bool,
) -> Result<String> {
    match format {
        OutputFormat::Text => text::render(report, verbose),
        OutputFormat::Json => json::render(report),
    }
}
