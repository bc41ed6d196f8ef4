//! Check command - walk descriptors and report scope violations

use crate::config::{default_repositories, load_project_config, CheckConfig, DEFAULT_GRAPH_FILE};
use crate::graph::{DependencyTree, ResolvedGraph};
use crate::models::ArtifactCoordinate;
use crate::reporters::{report_with_format, OutputFormat, ViolationReport};
use crate::resolver::{Repository, RepositoryResolver};
use crate::walker::{default_pool_size, ExecutionMode, GraphWalker, TraversalContext};
use anyhow::{bail, Context, Result};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Flags given on the command line; unset values fall back to the project config
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    pub graph: Option<PathBuf>,
    pub repositories: Vec<String>,
    pub no_parallel: bool,
    pub workers: Option<usize>,
    pub fail_on_violation: bool,
    pub verbose: bool,
    pub skip: bool,
    pub documentation_url: Option<String>,
    pub format: Option<String>,
    pub output: Option<PathBuf>,
}

/// Flags merged over config over defaults
#[derive(Debug, Clone, PartialEq)]
struct Settings {
    graph: PathBuf,
    repositories: Vec<Repository>,
    mode: ExecutionMode,
    fail_on_violation: bool,
    verbose: bool,
    skip: bool,
    documentation_url: Option<String>,
    format: OutputFormat,
}

impl Settings {
    fn resolve(project: &Path, options: &CheckOptions, config: CheckConfig) -> Result<Self> {
        let graph = match options.graph {
            Some(ref graph) => graph.clone(),
            None => project.join(config.graph.unwrap_or_else(|| PathBuf::from(DEFAULT_GRAPH_FILE))),
        };

        let locations = if !options.repositories.is_empty() {
            options.repositories.clone()
        } else if !config.repositories.is_empty() {
            config.repositories
        } else {
            default_repositories()
        };
        if locations.is_empty() {
            bail!("No descriptor repositories configured; pass --repository or set check.repositories");
        }

        let parallel = !options.no_parallel && config.parallel.unwrap_or(true);
        let mode = if parallel {
            let workers = options
                .workers
                .or(config.workers)
                .unwrap_or_else(default_pool_size);
            if workers == 0 || workers > 64 {
                bail!("check.workers must be between 1 and 64 (got {})", workers);
            }
            ExecutionMode::Pooled { workers }
        } else {
            ExecutionMode::Synchronous
        };

        let format = options
            .format
            .as_deref()
            .or(config.format.as_deref())
            .unwrap_or("text")
            .parse::<OutputFormat>()?;

        Ok(Self {
            graph,
            repositories: locations.iter().map(|l| Repository::parse(l)).collect(),
            mode,
            fail_on_violation: options.fail_on_violation || config.fail_on_violation.unwrap_or(false),
            verbose: options.verbose || config.verbose.unwrap_or(false),
            skip: options.skip || config.skip.unwrap_or(false),
            documentation_url: options.documentation_url.clone().or(config.documentation_url),
            format,
        })
    }
}

fn create_spinner_style() -> ProgressStyle {
    ProgressStyle::default_spinner()
        .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
        .template("{spinner:.green} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}

/// Run the check command
pub fn run(project: &Path, options: CheckOptions) -> Result<()> {
    let config = load_project_config(project).check;
    let settings = Settings::resolve(project, &options, config)?;

    if settings.skip {
        info!("Skipping dependency scope check");
        return Ok(());
    }

    let tree = DependencyTree::load(&settings.graph)?;
    let graph: Arc<dyn ResolvedGraph> = Arc::new(tree);
    let seeds = TraversalContext::seeds(Arc::clone(&graph));
    let mut walker = GraphWalker::new(Arc::new(RepositoryResolver::new()), settings.repositories.clone())
        .with_mode(settings.mode);
    info!(
        "Checking {} ({} seeds, {:?})",
        graph.root(),
        seeds.len(),
        walker.mode()
    );

    let spinner = (settings.format == OutputFormat::Text && console::Term::stderr().is_term())
        .then(ProgressBar::new_spinner);
    if let Some(ref bar) = spinner {
        bar.set_style(create_spinner_style());
        bar.set_message("Resolving dependency descriptors...");
        bar.enable_steady_tick(Duration::from_millis(100));
        let bar = bar.clone();
        walker = walker.with_progress_callback(Arc::new(
            move |artifact: &ArtifactCoordinate, done: usize| {
                bar.set_message(format!("Resolved {} descriptors ({})", done, artifact));
            },
        ));
    }

    let outcome = walker.walk(seeds);
    if let Some(bar) = spinner {
        bar.finish_and_clear();
    }
    let violations = outcome.context("Dependency scope check failed")?;

    let report = ViolationReport::from_violations(graph.root(), &violations)
        .with_documentation_url(settings.documentation_url.clone());
    let rendered = report_with_format(&report, settings.format, settings.verbose)?;

    match options.output {
        Some(ref path) => {
            std::fs::write(path, &rendered)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            eprintln!(
                "{} Report written to {}",
                style("✓").green(),
                style(path.display()).cyan()
            );
        }
        None => print!("{}", rendered),
    }

    if !report.is_clean() {
        if settings.fail_on_violation {
            eprintln!(
                "Failing due to {} dependency scope violation(s)",
                report.violation_count
            );
            std::process::exit(1);
        }
        warn!(
            "{} dependency scope violation(s) found (pass --fail-on-violation to fail)",
            report.violation_count
        );
    }

    Ok(())
}
