//! Concurrent descriptor-graph walker and scope-violation detector
//!
//! The walker starts from one [`TraversalContext`] per direct, non-test
//! dependency of the root and expands each artifact's descriptor, recursing
//! into every runtime-required edge. Along the way it checks whether the
//! build demoted a runtime-required edge's target to `test` scope.
//!
//! # Architecture
//!
//! ```text
//! seeds ──┬── expand(A) ──┬── expand(B) ── ...
//!         │               └── expand(C) ── ...
//!         └── expand(D) ── ...
//!
//! expand(c):
//!   1. claim c.artifact in the run's VisitedSet (else: empty result)
//!   2. resolve the descriptor            (the only blocking step)
//!   3. keep non-optional compile/runtime edges not excluded by c
//!   4. c' = c + every exclusion declared in the descriptor
//!   5. per edge: record a violation if overridden to test, then step into it
//!   6. fan-in: union of own violations and all children's results
//! ```
//!
//! Each fan-in waits for all of its children. The first failing child (in
//! edge order) fails the fan-in once they have all finished; partial results
//! are dropped.

pub mod context;
pub mod violation;
pub mod visited;

pub use context::{PathStep, TraversalContext};
pub use violation::{Violation, ViolationSet};
pub use visited::VisitedSet;

use crate::models::{ArtifactCoordinate, DependencyEdge};
use crate::resolver::{DescriptorResolver, Repository, ResolveError};
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Upper bound on the pooled worker count
pub const MAX_POOL_SIZE: usize = 20;

/// Workers per available core: resolution threads mostly wait on I/O
const WORKERS_PER_CORE: usize = 5;

/// Default pool size: min(5 × available parallelism, 20)
pub fn default_pool_size() -> usize {
    std::thread::available_parallelism()
        .map(|p| p.get())
        .unwrap_or(4)
        .saturating_mul(WORKERS_PER_CORE)
        .min(MAX_POOL_SIZE)
}

/// How walk steps are scheduled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    /// Every step runs inline on the calling thread
    Synchronous,
    /// Steps run on a bounded rayon pool
    Pooled { workers: usize },
}

impl ExecutionMode {
    pub fn pooled() -> Self {
        ExecutionMode::Pooled {
            workers: default_pool_size(),
        }
    }
}

impl Default for ExecutionMode {
    fn default() -> Self {
        Self::pooled()
    }
}

/// Errors that fail a walk
#[derive(Error, Debug)]
pub enum WalkError {
    #[error("Failed to resolve the descriptor of {artifact}")]
    Resolution {
        artifact: String,
        #[source]
        source: ResolveError,
    },

    #[error("Dependency walk interrupted")]
    Interrupted,

    #[error("Failed to start walker pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),

    #[error("Internal walker failure: {details}")]
    Internal { details: String },
}

pub type WalkResult<T> = Result<T, WalkError>;

/// Cooperative cancellation flag shared with the caller
#[derive(Debug, Clone, Default)]
pub struct Interrupt(Arc<AtomicBool>);

impl Interrupt {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the walk to stop before its next descriptor resolution
    pub fn raise(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_raised(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Called after each descriptor resolution with the artifact and the number
/// of descriptors resolved so far in the run
pub type ProgressCallback = Arc<dyn Fn(&ArtifactCoordinate, usize) + Send + Sync>;

/// Walks descriptor graphs and collects scope violations
pub struct GraphWalker {
    resolver: Arc<dyn DescriptorResolver>,
    repositories: Vec<Repository>,
    mode: ExecutionMode,
    interrupt: Interrupt,
    progress_callback: Option<ProgressCallback>,
}

impl GraphWalker {
    pub fn new(resolver: Arc<dyn DescriptorResolver>, repositories: Vec<Repository>) -> Self {
        Self {
            resolver,
            repositories,
            mode: ExecutionMode::default(),
            interrupt: Interrupt::new(),
            progress_callback: None,
        }
    }

    pub fn with_mode(mut self, mode: ExecutionMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_interrupt(mut self, interrupt: Interrupt) -> Self {
        self.interrupt = interrupt;
        self
    }

    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    pub fn mode(&self) -> ExecutionMode {
        self.mode
    }

    /// Walk every seed and return the union of their violations
    ///
    /// Each call is an independent run with its own visited set.
    pub fn walk(&self, seeds: Vec<TraversalContext>) -> WalkResult<ViolationSet> {
        let start = Instant::now();
        let run = WalkRun {
            walker: self,
            visited: VisitedSet::new(),
            resolved: AtomicUsize::new(0),
        };

        let outcome = match self.mode {
            ExecutionMode::Synchronous => run.join(&seeds),
            ExecutionMode::Pooled { workers } => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(workers.max(1))
                    .thread_name(|i| format!("depscope-walker-{}", i))
                    .build()?;
                pool.install(|| run.join(&seeds))
            }
        };

        match &outcome {
            Ok(violations) => info!(
                "Walked {} seeds: {} artifacts claimed, {} descriptors resolved, {} violations in {:?}",
                seeds.len(),
                run.visited.len(),
                run.resolved.load(Ordering::SeqCst),
                violations.len(),
                start.elapsed()
            ),
            Err(e) => debug!("Walk failed after {:?}: {}", start.elapsed(), e),
        }
        outcome
    }
}

/// State for a single walk
struct WalkRun<'w> {
    walker: &'w GraphWalker,
    visited: VisitedSet,
    resolved: AtomicUsize,
}

impl WalkRun<'_> {
    /// Expand every context and merge the results
    fn join(&self, contexts: &[TraversalContext]) -> WalkResult<ViolationSet> {
        let results: Vec<WalkResult<ViolationSet>> = match self.walker.mode {
            ExecutionMode::Synchronous => contexts.iter().map(|c| self.expand(c)).collect(),
            ExecutionMode::Pooled { .. } => contexts.par_iter().map(|c| self.expand(c)).collect(),
        };

        let mut merged = ViolationSet::default();
        for result in results {
            merged.extend(result?);
        }
        Ok(merged)
    }

    fn expand(&self, context: &TraversalContext) -> WalkResult<ViolationSet> {
        if self.walker.interrupt.is_raised() {
            return Err(WalkError::Interrupted);
        }
        if !self.visited.claim(context.artifact()) {
            return Ok(ViolationSet::default());
        }

        debug!(
            "Expanding {} (depth {})",
            context.artifact(),
            context.depth()
        );
        let edges = self.resolve(context.artifact())?;

        let required: Vec<&DependencyEdge> = edges
            .iter()
            .filter(|edge| edge.is_runtime_required() && !context.is_excluded(edge))
            .collect();
        if required.is_empty() {
            return Ok(ViolationSet::default());
        }

        let context = context.with_exclusions(edges.iter().flat_map(|e| e.exclusions.iter()));

        let mut violations = ViolationSet::default();
        let mut children = Vec::with_capacity(required.len());
        for edge in required {
            if context.is_overridden_to_test_scope(edge) {
                debug!(
                    "{} requires {} at {} scope but the build uses test",
                    context.artifact(),
                    edge.target,
                    edge.scope
                );
                violations.insert(Violation::new(&context, edge.clone()));
            }
            match context.step_into(edge) {
                Some(child) => children.push(child),
                None => warn!(
                    "{} declares {} which is not in the resolved graph; not descending",
                    context.artifact(),
                    edge.target
                ),
            }
        }

        violations.extend(self.join(&children)?);
        Ok(violations)
    }

    fn resolve(&self, artifact: &ArtifactCoordinate) -> WalkResult<Vec<DependencyEdge>> {
        let walker = self.walker;
        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            walker.resolver.resolve(artifact, &walker.repositories)
        }));

        match outcome {
            Ok(Ok(edges)) => {
                let done = self.resolved.fetch_add(1, Ordering::SeqCst) + 1;
                if let Some(ref callback) = walker.progress_callback {
                    callback(artifact, done);
                }
                Ok(edges)
            }
            Ok(Err(source)) => Err(WalkError::Resolution {
                artifact: artifact.to_string(),
                source,
            }),
            Err(panic_info) => {
                let panic_msg = if let Some(s) = panic_info.downcast_ref::<&str>() {
                    s.to_string()
                } else if let Some(s) = panic_info.downcast_ref::<String>() {
                    s.clone()
                } else {
                    "Unknown panic".to_string()
                };
                error!("Resolver panicked on {}: {}", artifact, panic_msg);
                Err(WalkError::Internal {
                    details: format!("resolver panicked on {}: {}", artifact, panic_msg),
                })
            }
        }
    }
}
