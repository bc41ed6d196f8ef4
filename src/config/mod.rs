//! Configuration module for depscope
//!
//! This module handles project-level configuration (`depscope.toml`) that
//! supplies defaults for the `check` command.

mod project_config;

pub use project_config::{
    default_repositories, load_project_config, CheckConfig, ProjectConfig, CONFIG_FILE,
    DEFAULT_CONFIG_TEMPLATE, DEFAULT_GRAPH_FILE, JSON_CONFIG_FILE,
};
