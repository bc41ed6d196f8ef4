//! CLI command definitions and handlers

mod check;
mod init;

pub use check::CheckOptions;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Parse and validate workers count (1-64)
fn parse_workers(s: &str) -> Result<usize, String> {
    let n: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;
    if n == 0 {
        Err("workers must be at least 1".to_string())
    } else if n > 64 {
        Err("workers cannot exceed 64".to_string())
    } else {
        Ok(n)
    }
}

/// depscope - find runtime dependencies your build demoted to test scope
#[derive(Parser, Debug)]
#[command(name = "depscope")]
#[command(
    version,
    about = "Audit a resolved dependency graph for artifacts required at runtime but demoted to test scope",
    long_about = "depscope walks the dependency descriptors of every direct, non-test \
dependency of a project and reports each runtime-required edge whose target the \
build resolved to test scope. Such builds compile and pass their tests, then fail \
at runtime for downstream consumers.\n\n\
Run without a subcommand to check the current directory:\n  \
depscope .",
    after_help = "\
Examples:
  depscope .                                       Check the current directory
  depscope check . --fail-on-violation             Exit code 1 on violations (CI mode)
  depscope check . --format json -o scope.json     JSON report for scripting
  depscope check . --graph target/graph.json --repository https://repo.example.org/maven2
  depscope init                                    Write a depscope.toml template"
)]
pub struct Cli {
    /// Path to the project directory (default: current directory)
    #[arg(global = true, default_value = ".")]
    pub path: PathBuf,

    /// Log level (error, warn, info, debug, trace); RUST_LOG takes precedence
    #[arg(long, global = true, default_value = "warn", value_parser = ["error", "warn", "info", "debug", "trace"])]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write a depscope.toml config file with default settings
    Init,

    /// Check the project for runtime dependencies overridden to test scope
    #[command(after_help = "\
Examples:
  depscope check .                           Warn about violations, exit 0
  depscope check . --fail-on-violation       Exit 1 if any violation is found
  depscope check . --verbose                 Print the full path of each violation
  depscope check . --no-parallel             Resolve descriptors on one thread
  depscope check . --skip                    Do nothing (e.g. toggled from CI)")]
    Check {
        /// Resolved dependency graph exported by the build (default: resolved-graph.json)
        #[arg(long, short = 'g')]
        graph: Option<PathBuf>,

        /// Descriptor repository (directory or http(s) URL); repeat to search several in order
        #[arg(long, short = 'r')]
        repository: Vec<String>,

        /// Resolve descriptors on the calling thread only
        #[arg(long)]
        no_parallel: bool,

        /// Number of resolver workers (1-64, default: min(5 x cores, 20))
        #[arg(long, value_parser = parse_workers)]
        workers: Option<usize>,

        /// Exit with code 1 when violations are found (default: warn only)
        #[arg(long)]
        fail_on_violation: bool,

        /// Print the full root-to-edge path of each violation
        #[arg(long, short = 'v')]
        verbose: bool,

        /// Skip the check entirely
        #[arg(long)]
        skip: bool,

        /// Documentation link to print under the report
        #[arg(long)]
        doc_url: Option<String>,

        /// Output format: text, json
        #[arg(long, short = 'f', value_parser = ["text", "json"])]
        format: Option<String>,

        /// Output file path (default: stdout)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },
}

/// Run the CLI with parsed arguments
pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Some(Commands::Init) => init::run(&cli.path),

        Some(Commands::Check {
            graph,
            repository,
            no_parallel,
            workers,
            fail_on_violation,
            verbose,
            skip,
            doc_url,
            format,
            output,
        }) => check::run(
            &cli.path,
            CheckOptions {
                graph,
                repositories: repository,
                no_parallel,
                workers,
                fail_on_violation,
                verbose,
                skip,
                documentation_url: doc_url,
                format,
                output,
            },
        ),

        None => check::run(&cli.path, CheckOptions::default()),
    }
}
