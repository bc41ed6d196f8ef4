//! depscope - dependency scope auditing
//!
//! Walks the dependency descriptors reachable from a project's direct
//! dependencies and reports every runtime-required edge whose target the
//! project's resolved graph placed in test scope.

pub mod cli;
pub mod config;
pub mod graph;
pub mod models;
pub mod reporters;
pub mod resolver;
pub mod walker;
